//! Travel modes and the speed/traffic table.

use crate::{Result, TravelError};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Process-wide default profile, built on first use and never mutated.
static STANDARD_PROFILE: Lazy<TravelProfile> = Lazy::new(TravelProfile::standard);

/// How the traveller moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// On foot
    Walking,
    /// Bicycle
    Cycling,
    /// Car; the only mode affected by the traffic table
    #[default]
    Driving,
    /// Public transport
    Transit,
}

impl TravelMode {
    /// All modes in declaration order.
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Walking,
        TravelMode::Cycling,
        TravelMode::Driving,
        TravelMode::Transit,
    ];

    /// Lowercase name used in configuration and CLI arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
            TravelMode::Driving => "driving",
            TravelMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = TravelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" | "walk" | "foot" => Ok(TravelMode::Walking),
            "cycling" | "bike" | "bicycle" => Ok(TravelMode::Cycling),
            "driving" | "drive" | "car" => Ok(TravelMode::Driving),
            "transit" | "public" => Ok(TravelMode::Transit),
            other => Err(TravelError::UnknownMode(other.to_string())),
        }
    }
}

/// Base speeds per mode and the hour-of-day traffic table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelProfile {
    /// Walking speed in km/h
    #[serde(default = "default_walking_kmh")]
    pub walking_kmh: f64,
    /// Cycling speed in km/h
    #[serde(default = "default_cycling_kmh")]
    pub cycling_kmh: f64,
    /// Driving speed in km/h before traffic
    #[serde(default = "default_driving_kmh")]
    pub driving_kmh: f64,
    /// Transit speed in km/h
    #[serde(default = "default_transit_kmh")]
    pub transit_kmh: f64,
    /// Driving-time multiplier per hour of day (index 0 = midnight)
    #[serde(default = "default_traffic_multipliers")]
    pub traffic_multipliers: [f64; 24],
}

fn default_walking_kmh() -> f64 {
    5.0
}

fn default_cycling_kmh() -> f64 {
    15.0
}

fn default_driving_kmh() -> f64 {
    40.0
}

fn default_transit_kmh() -> f64 {
    25.0
}

fn default_traffic_multipliers() -> [f64; 24] {
    let mut table = [1.0; 24];
    // morning peak
    table[7] = 1.3;
    table[8] = 1.5;
    table[9] = 1.2;
    // evening peak
    table[16] = 1.2;
    table[17] = 1.5;
    table[18] = 1.4;
    table[19] = 1.2;
    table
}

impl Default for TravelProfile {
    fn default() -> Self {
        Self::standard()
    }
}

impl TravelProfile {
    /// Stock speeds (walking 5, cycling 15, driving 40, transit 25 km/h) with
    /// rush-hour multipliers at 07-09 and 16-19.
    pub fn standard() -> Self {
        Self {
            walking_kmh: default_walking_kmh(),
            cycling_kmh: default_cycling_kmh(),
            driving_kmh: default_driving_kmh(),
            transit_kmh: default_transit_kmh(),
            traffic_multipliers: default_traffic_multipliers(),
        }
    }

    /// Shared immutable instance of [`TravelProfile::standard`].
    pub fn global() -> &'static TravelProfile {
        &STANDARD_PROFILE
    }

    /// Checks that every speed and multiplier is positive and finite.
    pub fn validate(&self) -> Result<()> {
        for mode in TravelMode::ALL {
            let speed = self.base_speed_kmh(mode);
            if !speed.is_finite() || speed <= 0.0 {
                return Err(TravelError::InvalidSpeed { mode: mode.to_string(), speed });
            }
        }
        for (hour, multiplier) in self.traffic_multipliers.iter().enumerate() {
            if !multiplier.is_finite() || *multiplier <= 0.0 {
                return Err(TravelError::InvalidSpeed {
                    mode: format!("driving@{hour:02}"),
                    speed: self.driving_kmh / multiplier,
                });
            }
        }
        Ok(())
    }

    /// Free-flow speed for a mode.
    #[inline]
    pub fn base_speed_kmh(&self, mode: TravelMode) -> f64 {
        match mode {
            TravelMode::Walking => self.walking_kmh,
            TravelMode::Cycling => self.cycling_kmh,
            TravelMode::Driving => self.driving_kmh,
            TravelMode::Transit => self.transit_kmh,
        }
    }

    /// Traffic multiplier for a mode at an hour. Only driving is affected.
    pub fn traffic_multiplier(&self, mode: TravelMode, hour: u8) -> Result<f64> {
        let multiplier = self
            .traffic_multipliers
            .get(usize::from(hour))
            .copied()
            .ok_or(TravelError::InvalidHour(hour))?;

        Ok(if mode == TravelMode::Driving { multiplier } else { 1.0 })
    }

    /// Speed after the traffic multiplier is applied.
    pub fn effective_speed_kmh(&self, mode: TravelMode, hour: u8) -> Result<f64> {
        Ok(self.base_speed_kmh(mode) / self.traffic_multiplier(mode, hour)?)
    }
}
