//! WASM bindings for the geo crate.
//!
//! These bindings allow the geo crate to be used from JavaScript/TypeScript
//! in both browser and Deno environments.

use crate::{
    bearing_degrees, encode_polyline, haversine_distance, parse_postgis_point, BoundingBox,
    Coordinate,
};
use wasm_bindgen::prelude::*;

fn coordinate(lat: f64, lng: f64) -> Result<Coordinate, JsValue> {
    Coordinate::new(lat, lng).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Calculate distance between two coordinates in kilometers.
#[wasm_bindgen]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64, JsValue> {
    Ok(haversine_distance(&coordinate(lat1, lng1)?, &coordinate(lat2, lng2)?))
}

/// Initial bearing in degrees from the first coordinate to the second.
#[wasm_bindgen]
pub fn bearing(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64, JsValue> {
    Ok(bearing_degrees(&coordinate(lat1, lng1)?, &coordinate(lat2, lng2)?))
}

/// Bounding box around a point as JSON `{min_lat, max_lat, min_lng, max_lng}`.
#[wasm_bindgen]
pub fn bounding_box(lat: f64, lng: f64, radius_km: f64) -> Result<String, JsValue> {
    let bbox = BoundingBox::around(&coordinate(lat, lng)?, radius_km);
    serde_json::to_string(&bbox)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Encode a JSON array of `[lat, lng]` pairs as a polyline.
#[wasm_bindgen]
pub fn polyline(points_json: &str) -> Result<String, JsValue> {
    let pairs: Vec<(f64, f64)> = serde_json::from_str(points_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;

    let path = pairs
        .into_iter()
        .map(|(lat, lng)| coordinate(lat, lng))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(encode_polyline(&path, crate::geometry::POLYLINE_PRECISION))
}

/// Parse a PostGIS location and return coordinates.
///
/// # Returns
/// JSON string with latitude/longitude, or `null` if parsing fails
#[wasm_bindgen]
pub fn parse_location(location_json: &str) -> Result<String, JsValue> {
    let value: serde_json::Value = serde_json::from_str(location_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;

    match parse_postgis_point(&value) {
        Some(coord) => Ok(serde_json::json!({
            "latitude": coord.latitude(),
            "longitude": coord.longitude()
        })
        .to_string()),
        None => Ok("null".to_string()),
    }
}
