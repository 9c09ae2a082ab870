//! Argument types shared by several subcommands

use nearby_geo::Coordinate;
use std::str::FromStr;

/// A `LAT,LNG` pair from the command line, validated on parse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng(pub Coordinate);

impl FromStr for LatLng {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LNG, got '{}'", s))?;

        let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
        let lng: f64 = lng.trim().parse().map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;

        Coordinate::new(lat, lng).map(LatLng).map_err(|e| e.to_string())
    }
}
