//! Geospatial primitives for the nearby proximity engine.
//!
//! This crate provides:
//! - Validated coordinates
//! - Haversine distance, initial bearing and destination points
//! - Bounding boxes with antimeridian wraparound
//! - PostGIS POINT parsing (GeoJSON and WKT)
//! - Path geometry output (GeoJSON, encoded polyline, WKT)
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use nearby_geo::{haversine_distance, BoundingBox, Coordinate};
//!
//! let riyadh = Coordinate::new(24.7116, 46.6846).unwrap();
//! let jeddah = Coordinate::new(21.6231, 39.1104).unwrap();
//!
//! let distance_km = haversine_distance(&riyadh, &jeddah);
//! assert!((distance_km - 850.0).abs() < 50.0);
//!
//! let bbox = BoundingBox::around(&riyadh, 10.0);
//! assert!(bbox.contains(&riyadh));
//! ```

mod error;
mod haversine;
mod postgis;
pub mod bbox;
pub mod geometry;

#[cfg(feature = "wasm")]
mod wasm;

pub use bbox::BoundingBox;
pub use error::{GeoError, GeoErrorCode, Result};
pub use geometry::{decode_polyline, encode_polyline, render_path, Geometry, GeometryFormat};
pub use haversine::{
    approximate_distance, bearing_degrees, destination_point, haversine_distance,
    haversine_distance_meters, haversine_distance_with_radius, EARTH_RADIUS_KM, EARTH_RADIUS_M,
};
pub use postgis::{parse_postgis_point, PostGISPoint};

/// A geographic coordinate with latitude and longitude.
///
/// Both components are range-checked at construction, so every `Coordinate`
/// in circulation lies within `[-90, 90] x [-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(serde::Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Creates a new coordinate, rejecting out-of-range or non-finite values.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    ///
    /// # Errors
    /// Returns [`GeoError::InvalidCoordinate`] when either value is out of range.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if is_valid(latitude, longitude) {
            Ok(Self { latitude, longitude })
        } else {
            Err(GeoError::InvalidCoordinate { latitude, longitude })
        }
    }

    /// Builds a coordinate from values the caller already clamped or wrapped.
    #[inline]
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude in degrees.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

/// Returns true if the pair forms a valid coordinate.
#[inline]
pub fn is_valid(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

/// Wraps a longitude into `[-180, 180]`.
#[inline]
pub fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        return longitude;
    }
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps +180 to -180; keep the sign the caller approached from
    if wrapped == -180.0 && longitude > 0.0 { 180.0 } else { wrapped }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = GeoError;

    fn try_from((lat, lng): (f64, f64)) -> Result<Self> {
        Self::new(lat, lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
