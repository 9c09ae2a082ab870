//! State shared by every subcommand

use chrono::Timelike;
use nearby_core::config::Config;
use nearby_travel::{TravelMode, TravelTimeEstimator};

/// Loaded configuration plus global flags
pub struct Context {
    pub config: Config,
    pub json: bool,
}

impl Context {
    pub fn new(config: Config, json: bool) -> Self {
        Self { config, json }
    }

    /// Estimator backed by the configured travel profile
    pub fn estimator(&self) -> TravelTimeEstimator<'_> {
        TravelTimeEstimator::new(&self.config.schema.travel.profile)
    }

    /// Requested mode, else the configured default
    pub fn mode(&self, requested: Option<TravelMode>) -> TravelMode {
        requested.unwrap_or(self.config.schema.travel.default_mode)
    }

    /// Requested hour, else the configured default, else the current local hour
    pub fn hour(&self, requested: Option<u8>) -> u8 {
        requested
            .or(self.config.schema.travel.default_hour)
            .unwrap_or_else(|| chrono::Local::now().hour() as u8)
    }
}
