//! Error types for the travel crate.

use nearby_geo::GeoError;
use thiserror::Error;

/// Result type alias for travel operations.
pub type Result<T> = std::result::Result<T, TravelError>;

/// Errors that can occur while estimating travel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TravelError {
    /// Hour of day outside 0..=23
    #[error("Invalid hour of day: {0} (expected 0-23)")]
    InvalidHour(u8),

    /// Negative or non-finite distance
    #[error("Invalid distance: {0} km")]
    InvalidDistance(f64),

    /// Travel mode name not recognized
    #[error("Unknown travel mode: {0}")]
    UnknownMode(String),

    /// Profile speed that is zero, negative or not finite
    #[error("Invalid speed for {mode}: {speed} km/h")]
    InvalidSpeed {
        /// Mode carrying the bad speed
        mode: String,
        /// Configured speed
        speed: f64,
    },

    /// Underlying coordinate error
    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// Error code for integration with nearby-core error handling.
/// Range: 12xxx for travel errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelErrorCode {
    /// Hour out of range
    InvalidHour = 12001,
    /// Distance out of range
    InvalidDistance = 12002,
    /// Unrecognized mode
    UnknownMode = 12003,
    /// Bad profile speed
    InvalidSpeed = 12004,
    /// Coordinate error
    Geo = 12005,
}

impl TravelError {
    /// Returns the error code for this error.
    pub fn code(&self) -> TravelErrorCode {
        match self {
            TravelError::InvalidHour(_) => TravelErrorCode::InvalidHour,
            TravelError::InvalidDistance(_) => TravelErrorCode::InvalidDistance,
            TravelError::UnknownMode(_) => TravelErrorCode::UnknownMode,
            TravelError::InvalidSpeed { .. } => TravelErrorCode::InvalidSpeed,
            TravelError::Geo(_) => TravelErrorCode::Geo,
        }
    }
}
