//! Resolving an entity's position.

use nearby_geo::{parse_postgis_point, Coordinate};
use serde_json::Value;

/// Extracts a validated coordinate from an entity.
///
/// Returning `None` means the entity has no usable position; the engine logs
/// and skips it. Implemented for plain closures, so ad-hoc layouts need no type:
///
/// ```
/// use nearby_geo::Coordinate;
/// use nearby_search::CoordinateSource;
/// use serde_json::json;
///
/// let source = |v: &serde_json::Value| {
///     let pair = v["pos"].as_array()?;
///     Coordinate::new(pair[0].as_f64()?, pair[1].as_f64()?).ok()
/// };
/// assert!(source.coordinate(&json!({"pos": [24.7, 46.6]})).is_some());
/// ```
pub trait CoordinateSource: Sync {
    /// Position of `entity`, or `None` when it cannot be resolved.
    fn coordinate(&self, entity: &Value) -> Option<Coordinate>;
}

impl<F> CoordinateSource for F
where
    F: Fn(&Value) -> Option<Coordinate> + Sync,
{
    fn coordinate(&self, entity: &Value) -> Option<Coordinate> {
        self(entity)
    }
}

/// Reads coordinates from named fields.
///
/// Lookup order:
/// 1. when `location_key` is set and present, that sub-object's latitude and
///    longitude fields, or a PostGIS point (GeoJSON or WKT) stored under it
/// 2. the entity's own latitude and longitude fields
///
/// Numeric strings such as `"24.71"` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FieldCoordinates {
    /// Latitude field name
    pub latitude_field: String,
    /// Longitude field name
    pub longitude_field: String,
    /// Optional key of a nested location object
    pub location_key: Option<String>,
}

impl Default for FieldCoordinates {
    fn default() -> Self {
        Self {
            latitude_field: "latitude".to_string(),
            longitude_field: "longitude".to_string(),
            location_key: None,
        }
    }
}

impl FieldCoordinates {
    /// Reads from top-level `latitude_field` / `longitude_field`.
    pub fn new(latitude_field: impl Into<String>, longitude_field: impl Into<String>) -> Self {
        Self {
            latitude_field: latitude_field.into(),
            longitude_field: longitude_field.into(),
            location_key: None,
        }
    }

    /// Also looks inside the object stored under `key`.
    pub fn nested(mut self, key: impl Into<String>) -> Self {
        self.location_key = Some(key.into());
        self
    }

    fn from_fields(&self, container: &Value) -> Option<Coordinate> {
        let latitude = number(container.get(&self.latitude_field)?)?;
        let longitude = number(container.get(&self.longitude_field)?)?;
        Coordinate::new(latitude, longitude).ok()
    }
}

impl CoordinateSource for FieldCoordinates {
    fn coordinate(&self, entity: &Value) -> Option<Coordinate> {
        if let Some(nested) = self.location_key.as_deref().and_then(|key| entity.get(key)) {
            return self.from_fields(nested).or_else(|| parse_postgis_point(nested));
        }
        self.from_fields(entity)
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
