//! Configuration schema definitions
//!
//! ```toml
//! [search]
//! use_bounding_box_optimization = true
//! distance_precision = 2
//! max_results = 1000
//! earth_radius_km = 6371.0
//! default_radius_km = 10.0
//! latitude_field = "lat"
//! longitude_field = "lng"
//! location_key = "location"
//!
//! [travel]
//! default_mode = "walking"
//! default_hour = 12
//!
//! [travel.profile]
//! driving_kmh = 50.0
//!
//! [telemetry]
//! log_level = "debug"
//! json = false
//! ```

use crate::error::{Error, Result};
use nearby_search::{FieldCoordinates, SearchConfig, DEFAULT_RADIUS_KM};
use nearby_travel::{TravelMode, TravelProfile};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub search: SearchSection,

    #[serde(default)]
    pub travel: TravelSection,

    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl ConfigSchema {
    /// Rejects values the engine would refuse at runtime.
    pub fn validate(&self) -> Result<()> {
        self.search.to_search_config().validate().map_err(|e| {
            Error::config_validation(format!("[search] {}", e)).with_source(e)
        })?;

        let radius = self.search.default_radius_km;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::config_validation(format!(
                "[search] default_radius_km must be positive, got {}",
                radius
            )));
        }

        if let Some(hour) = self.travel.default_hour {
            if hour > 23 {
                return Err(Error::config_validation(format!(
                    "[travel] default_hour must be 0-23, got {}",
                    hour
                )));
            }
        }
        self.travel
            .profile
            .validate()
            .map_err(|e| Error::config_validation(format!("[travel.profile] {}", e)).with_source(e))?;

        if self.telemetry.log_level.trim().is_empty() {
            return Err(Error::config_validation("[telemetry] log_level must not be empty"));
        }
        Ok(())
    }
}

/// Search engine defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSection {
    /// Pre-filter candidates with a bounding box
    #[serde(default = "default_true")]
    pub use_bounding_box_optimization: bool,

    /// Decimal places in reported distances
    #[serde(default = "default_distance_precision")]
    pub distance_precision: u8,

    /// Hard cap on results per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Sphere radius for distance math
    #[serde(default = "default_earth_radius_km")]
    pub earth_radius_km: f64,

    /// Radius used when a query gives neither radius nor k
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,

    /// Entity latitude field
    #[serde(default = "default_latitude_field")]
    pub latitude_field: String,

    /// Entity longitude field
    #[serde(default = "default_longitude_field")]
    pub longitude_field: String,

    /// Key of a nested location object
    #[serde(default)]
    pub location_key: Option<String>,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            use_bounding_box_optimization: default_true(),
            distance_precision: default_distance_precision(),
            max_results: default_max_results(),
            earth_radius_km: default_earth_radius_km(),
            default_radius_km: default_radius_km(),
            latitude_field: default_latitude_field(),
            longitude_field: default_longitude_field(),
            location_key: None,
        }
    }
}

impl SearchSection {
    /// Engine options from this section.
    pub fn to_search_config(&self) -> SearchConfig {
        SearchConfig {
            use_bounding_box_optimization: self.use_bounding_box_optimization,
            distance_precision: self.distance_precision,
            max_results: self.max_results,
            earth_radius_km: self.earth_radius_km,
        }
    }

    /// Coordinate source from the configured field names.
    pub fn coordinate_fields(&self) -> FieldCoordinates {
        FieldCoordinates {
            latitude_field: self.latitude_field.clone(),
            longitude_field: self.longitude_field.clone(),
            location_key: self.location_key.clone(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_distance_precision() -> u8 {
    SearchConfig::default().distance_precision
}

fn default_max_results() -> usize {
    SearchConfig::default().max_results
}

fn default_earth_radius_km() -> f64 {
    SearchConfig::default().earth_radius_km
}

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

fn default_latitude_field() -> String {
    "latitude".to_string()
}

fn default_longitude_field() -> String {
    "longitude".to_string()
}

/// Travel estimate defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelSection {
    /// Mode used when a command does not name one
    #[serde(default)]
    pub default_mode: TravelMode,

    /// Departure hour when none is given; `None` means the current local hour
    #[serde(default)]
    pub default_hour: Option<u8>,

    /// Speed and traffic overrides
    #[serde(default)]
    pub profile: TravelProfile,
}

impl Default for TravelSection {
    fn default() -> Self {
        Self {
            default_mode: TravelMode::default(),
            default_hour: None,
            profile: TravelProfile::standard(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySection {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
