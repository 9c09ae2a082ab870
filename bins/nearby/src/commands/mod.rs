//! Subcommand implementations

pub mod bbox;
pub mod distance;
pub mod eta;
pub mod isochrone;
pub mod route;
pub mod search;

use nearby_core::{Error, ErrorCode};
use nearby_geo::GeoError;
use nearby_search::SearchError;
use nearby_travel::TravelError;

/// Maps whatever a command failed with onto a coded error for reporting.
pub fn into_core_error(err: anyhow::Error) -> Error {
    let err = match err.downcast::<Error>() {
        Ok(e) => return e,
        Err(err) => err,
    };
    let err = match err.downcast::<SearchError>() {
        Ok(e) => return e.into(),
        Err(err) => err,
    };
    let err = match err.downcast::<TravelError>() {
        Ok(e) => return e.into(),
        Err(err) => err,
    };
    let err = match err.downcast::<GeoError>() {
        Ok(e) => return e.into(),
        Err(err) => err,
    };
    let err = match err.downcast::<std::io::Error>() {
        Ok(e) => return e.into(),
        Err(err) => err,
    };
    match err.downcast::<serde_json::Error>() {
        Ok(e) => e.into(),
        Err(err) => Error::new(ErrorCode::Internal, format!("{:#}", err)),
    }
}

/// Counts one invocation of `command`.
pub fn record_command(command: &str) {
    nearby_telemetry::metrics().increment(&format!("commands.{}", command));
}
