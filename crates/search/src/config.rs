//! Engine configuration.

use crate::{Result, SearchError};
use nearby_geo::EARTH_RADIUS_KM;
use serde::{Deserialize, Serialize};

/// Radius applied when a query gives neither a radius nor `k`.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Highest supported number of decimal places for reported distances.
pub const MAX_DISTANCE_PRECISION: u8 = 10;

/// Tunables for [`SearchEngine`](crate::SearchEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Discard candidates outside the radius bounding box before computing
    /// exact distances. Never changes results, only speed.
    #[serde(default = "default_true")]
    pub use_bounding_box_optimization: bool,

    /// Decimal places kept in reported distances
    #[serde(default = "default_precision")]
    pub distance_precision: u8,

    /// Hard cap on results per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Sphere radius used for all distance math
    #[serde(default = "default_earth_radius")]
    pub earth_radius_km: f64,
}

fn default_true() -> bool {
    true
}

fn default_precision() -> u8 {
    2
}

fn default_max_results() -> usize {
    1000
}

fn default_earth_radius() -> f64 {
    EARTH_RADIUS_KM
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            use_bounding_box_optimization: default_true(),
            distance_precision: default_precision(),
            max_results: default_max_results(),
            earth_radius_km: default_earth_radius(),
        }
    }
}

impl SearchConfig {
    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.distance_precision > MAX_DISTANCE_PRECISION {
            return Err(SearchError::InvalidConfig(format!(
                "distance_precision {} exceeds {}",
                self.distance_precision, MAX_DISTANCE_PRECISION
            )));
        }
        if self.max_results == 0 {
            return Err(SearchError::InvalidConfig("max_results must be positive".into()));
        }
        if !(self.earth_radius_km.is_finite() && self.earth_radius_km > 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "earth_radius_km must be positive, got {}",
                self.earth_radius_km
            )));
        }
        Ok(())
    }

    /// Rounds `distance_km` to the configured precision.
    pub fn round_distance(&self, distance_km: f64) -> f64 {
        let factor = 10f64.powi(i32::from(self.distance_precision));
        (distance_km * factor).round() / factor
    }

    /// Half a rounding unit: the furthest an exact distance can sit beyond a
    /// radius while still rounding onto it.
    pub fn rounding_slack_km(&self) -> f64 {
        0.5 / 10f64.powi(i32::from(self.distance_precision))
    }
}
