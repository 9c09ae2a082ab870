//! PostGIS POINT parsing.
//!
//! Entity location columns exported from PostGIS arrive either as GeoJSON
//! (`{"type": "Point", "coordinates": [lng, lat]}`) or as WKT (`POINT(lng lat)`).
//! Both forms use longitude-first ordering.

use crate::{Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};

/// A PostGIS Point representation that can be parsed from JSON or WKT.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostGISPoint {
    /// GeoJSON format: {"type": "Point", "coordinates": [lng, lat]}
    GeoJson(GeoJsonPoint),
    /// Raw WKT string: "POINT(lng lat)"
    Wkt(String),
}

/// GeoJSON Point format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    /// Should be "Point"
    #[serde(rename = "type")]
    pub point_type: Option<String>,
    /// [longitude, latitude] array
    pub coordinates: [f64; 2],
}

impl PostGISPoint {
    /// Converts the point into a validated coordinate.
    pub fn to_coordinate(&self) -> Result<Coordinate> {
        match self {
            PostGISPoint::GeoJson(geojson) => {
                let [lng, lat] = geojson.coordinates;
                Coordinate::new(lat, lng)
            }
            PostGISPoint::Wkt(wkt) => parse_wkt_point(wkt),
        }
    }
}

/// Parse a PostGIS point from a JSON value.
///
/// # Returns
/// * `Some(Coordinate)` if the value holds a point within valid ranges
/// * `None` if the value is null, malformed, or out of range
///
/// # Example
/// ```
/// use nearby_geo::parse_postgis_point;
/// use serde_json::json;
///
/// let geojson = json!({"type": "Point", "coordinates": [46.6753, 24.7136]});
/// let coord = parse_postgis_point(&geojson).unwrap();
/// assert!((coord.latitude() - 24.7136).abs() < 0.0001);
///
/// let wkt = json!("POINT(46.6753 24.7136)");
/// let coord = parse_postgis_point(&wkt).unwrap();
/// assert!((coord.longitude() - 46.6753).abs() < 0.0001);
/// ```
pub fn parse_postgis_point(value: &serde_json::Value) -> Option<Coordinate> {
    if let Some(coords) = value.get("coordinates").and_then(|c| c.as_array()) {
        if coords.len() >= 2 {
            let lng = coords[0].as_f64()?;
            let lat = coords[1].as_f64()?;
            return Coordinate::new(lat, lng).ok();
        }
        return None;
    }

    value.as_str().and_then(|wkt| parse_wkt_point(wkt).ok())
}

/// Parse a WKT POINT string.
///
/// Format: `POINT(longitude latitude)`, optionally with an SRID prefix
/// (`SRID=4326;POINT(...)`).
pub(crate) fn parse_wkt_point(wkt: &str) -> Result<Coordinate> {
    let wkt = wkt.trim();
    let wkt = match wkt.split_once(';') {
        Some((srid, rest)) if srid.to_ascii_uppercase().starts_with("SRID=") => rest.trim(),
        _ => wkt,
    };

    let upper = wkt.to_ascii_uppercase();
    if !upper.starts_with("POINT(") && !upper.starts_with("POINT (") {
        return Err(GeoError::InvalidWkt(format!("Expected POINT, got: {}", wkt)));
    }

    let start = wkt.find('(').ok_or_else(|| GeoError::InvalidWkt("Missing '('".into()))?;
    let end = wkt.rfind(')').ok_or_else(|| GeoError::InvalidWkt("Missing ')'".into()))?;

    if start >= end {
        return Err(GeoError::InvalidWkt("Invalid parentheses".into()));
    }

    let parts: Vec<&str> = wkt[start + 1..end].split_whitespace().collect();
    if parts.len() != 2 {
        return Err(GeoError::InvalidWkt(format!(
            "Expected 2 coordinates, got {}",
            parts.len()
        )));
    }

    let lng: f64 = parts[0]
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid longitude: {}", parts[0])))?;
    let lat: f64 = parts[1]
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid latitude: {}", parts[1])))?;

    Coordinate::new(lat, lng)
}
