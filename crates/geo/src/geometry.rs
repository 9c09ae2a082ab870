//! Path geometry output.
//!
//! A path is an ordered list of coordinates. It can be emitted as a GeoJSON
//! LineString, a Google encoded polyline, or a WKT LineString. None of these
//! recompute anything; they are pure data transforms.

use crate::{Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

/// Default encoded-polyline precision (5 decimal places).
pub const POLYLINE_PRECISION: u32 = 5;

/// Output format for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryFormat {
    /// GeoJSON LineString object
    #[default]
    GeoJson,
    /// Google encoded polyline string
    Polyline,
    /// Well-known text `LINESTRING(...)`
    Wkt,
}

impl FromStr for GeometryFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "geojson" | "json" => Ok(Self::GeoJson),
            "polyline" => Ok(Self::Polyline),
            "wkt" => Ok(Self::Wkt),
            other => Err(format!("unknown geometry format: {other}")),
        }
    }
}

/// Rendered path geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Geometry {
    /// GeoJSON LineString
    GeoJson(serde_json::Value),
    /// Encoded polyline
    Polyline(String),
    /// WKT LineString
    Wkt(String),
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Geometry::GeoJson(value) => write!(f, "{value}"),
            Geometry::Polyline(s) | Geometry::Wkt(s) => f.write_str(s),
        }
    }
}

/// Renders a path in the requested format.
pub fn render_path(path: &[Coordinate], format: GeometryFormat) -> Geometry {
    match format {
        GeometryFormat::GeoJson => Geometry::GeoJson(line_string_geojson(path)),
        GeometryFormat::Polyline => Geometry::Polyline(encode_polyline(path, POLYLINE_PRECISION)),
        GeometryFormat::Wkt => Geometry::Wkt(line_string_wkt(path)),
    }
}

/// GeoJSON LineString with `[lng, lat]` positions.
pub fn line_string_geojson(path: &[Coordinate]) -> serde_json::Value {
    let coordinates: Vec<[f64; 2]> = path
        .iter()
        .map(|c| [c.longitude(), c.latitude()])
        .collect();

    serde_json::json!({
        "type": "LineString",
        "coordinates": coordinates,
    })
}

/// WKT LineString, e.g. `LINESTRING(46.6753 24.7136, 39.1104 21.6231)`.
///
/// An empty path yields `LINESTRING EMPTY`.
pub fn line_string_wkt(path: &[Coordinate]) -> String {
    if path.is_empty() {
        return "LINESTRING EMPTY".to_string();
    }

    let points: Vec<String> = path
        .iter()
        .map(|c| format!("{} {}", c.longitude(), c.latitude()))
        .collect();
    format!("LINESTRING({})", points.join(", "))
}

/// Encodes a path with the Google polyline algorithm.
///
/// # Example
/// ```
/// use nearby_geo::{encode_polyline, Coordinate};
///
/// let path = [
///     Coordinate::new(38.5, -120.2).unwrap(),
///     Coordinate::new(40.7, -120.95).unwrap(),
///     Coordinate::new(43.252, -126.453).unwrap(),
/// ];
/// assert_eq!(encode_polyline(&path, 5), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// ```
pub fn encode_polyline(path: &[Coordinate], precision: u32) -> String {
    let factor = 10f64.powi(precision as i32);
    let mut encoded = String::with_capacity(path.len() * 8);
    let (mut prev_lat, mut prev_lng) = (0i64, 0i64);

    for coord in path {
        let lat = (coord.latitude() * factor).round() as i64;
        let lng = (coord.longitude() * factor).round() as i64;
        encode_value(lat - prev_lat, &mut encoded);
        encode_value(lng - prev_lng, &mut encoded);
        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

fn encode_value(delta: i64, out: &mut String) {
    let zigzag = if delta < 0 { !(delta << 1) } else { delta << 1 };
    let mut value = zigzag as u64;
    while value >= 0x20 {
        out.push(char::from((((value & 0x1f) | 0x20) + 63) as u8));
        value >>= 5;
    }
    out.push(char::from((value + 63) as u8));
}

/// Decodes a Google encoded polyline back into coordinates.
///
/// # Errors
/// Returns [`GeoError::InvalidPolyline`] on characters outside the encoding
/// alphabet or a truncated final value, and [`GeoError::InvalidCoordinate`] if a
/// decoded point is out of range.
pub fn decode_polyline(encoded: &str, precision: u32) -> Result<Vec<Coordinate>> {
    let factor = 10f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let (mut lat, mut lng) = (0i64, 0i64);
    let mut path = Vec::new();

    while index < bytes.len() {
        lat = accumulate(lat, decode_value(bytes, &mut index)?)?;
        lng = accumulate(lng, decode_value(bytes, &mut index)?)?;
        path.push(Coordinate::new(lat as f64 / factor, lng as f64 / factor)?);
    }

    Ok(path)
}

fn accumulate(total: i64, delta: i64) -> Result<i64> {
    total
        .checked_add(delta)
        .ok_or_else(|| GeoError::InvalidPolyline("delta overflows the running total".into()))
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64> {
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or_else(|| GeoError::InvalidPolyline("truncated value".into()))?;
        if !(63..=126).contains(&byte) {
            return Err(GeoError::InvalidPolyline(format!(
                "invalid character at offset {}",
                index
            )));
        }
        if shift > 60 {
            return Err(GeoError::InvalidPolyline("value too long".into()));
        }
        *index += 1;

        let chunk = u64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    let value = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !value } else { value })
}

/// Writes `path` as a compact `lat,lng;lat,lng` string for log lines.
pub fn summarize_path(path: &[Coordinate]) -> String {
    let mut out = String::new();
    for (i, c) in path.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        let _ = write!(out, "{:.5},{:.5}", c.latitude(), c.longitude());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_path() -> Vec<Coordinate> {
        vec![
            Coordinate::new(38.5, -120.2).unwrap(),
            Coordinate::new(40.7, -120.95).unwrap(),
            Coordinate::new(43.252, -126.453).unwrap(),
        ]
    }

    #[test]
    fn test_encode_reference_polyline() {
        assert_eq!(encode_polyline(&sample_path(), 5), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn test_decode_reference_polyline() {
        let decoded = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@", 5).unwrap();
        assert_eq!(decoded, sample_path());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_polyline("_p~iF ", 5), Err(GeoError::InvalidPolyline(_))));
        assert!(matches!(decode_polyline("_p~iF", 5), Err(GeoError::InvalidPolyline(_))));
    }

    #[test]
    fn test_decode_rejects_overflowing_delta() {
        // point (0.00001, 0), then a latitude delta of i64::MAX
        let encoded = format!("A?}}{}N?", "~".repeat(11));
        assert!(matches!(decode_polyline(&encoded, 5), Err(GeoError::InvalidPolyline(_))));
    }

    #[test]
    fn test_geojson_uses_lng_lat_order() {
        let value = line_string_geojson(&sample_path());
        assert_eq!(value["type"], "LineString");
        assert_eq!(value["coordinates"][0][0], -120.2);
        assert_eq!(value["coordinates"][0][1], 38.5);
        assert_eq!(value["coordinates"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_wkt_line_string() {
        let path = &sample_path()[..2];
        assert_eq!(line_string_wkt(path), "LINESTRING(-120.2 38.5, -120.95 40.7)");
        assert_eq!(line_string_wkt(&[]), "LINESTRING EMPTY");
    }

    #[test]
    fn test_render_path_dispatch() {
        let path = sample_path();
        assert!(matches!(render_path(&path, GeometryFormat::GeoJson), Geometry::GeoJson(_)));
        assert_eq!(
            render_path(&path, GeometryFormat::Polyline).to_string(),
            "_p~iF~ps|U_ulLnnqC_mqNvxq`@"
        );
        assert!(render_path(&path, GeometryFormat::Wkt).to_string().starts_with("LINESTRING("));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("GeoJSON".parse::<GeometryFormat>().unwrap(), GeometryFormat::GeoJson);
        assert_eq!("polyline".parse::<GeometryFormat>().unwrap(), GeometryFormat::Polyline);
        assert!("kml".parse::<GeometryFormat>().is_err());
    }

    #[test]
    fn test_summarize_path() {
        let path = &sample_path()[..2];
        assert_eq!(summarize_path(path), "38.50000,-120.20000;40.70000,-120.95000");
    }
}
