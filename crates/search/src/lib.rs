//! Proximity search for the nearby engine.
//!
//! This crate provides:
//! - Radius and k-nearest queries over caller-supplied JSON entities
//! - Bounding-box pre-filtering with antimeridian handling
//! - Attribute filters with dotted field paths
//! - Optional travel-time annotation of results
//! - Parallel distance computation (rayon, `parallel` feature)

mod config;
mod engine;
mod error;
mod field;
mod predicate;
mod query;
mod source;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::{SearchConfig, DEFAULT_RADIUS_KM, MAX_DISTANCE_PRECISION};
pub use engine::{SearchEngine, SearchStats};
pub use error::{PredicateError, Result, SearchError, SearchErrorCode};
pub use field::{FieldPath, FieldSource, Lookup, WithDistance, DISTANCE_FIELD};
pub use predicate::{evaluate, Condition, PredicateOp, PredicateSet};
pub use query::{SearchQuery, SearchRequest, SortSpec, TravelOptions, DEFAULT_DEPARTURE_HOUR};
pub use source::{CoordinateSource, FieldCoordinates};

use serde_json::Value;

/// Search result with its distance from the query origin.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchResult<T> {
    /// The matched entity
    pub entity: T,
    /// Great-circle distance in kilometers, rounded to the configured precision
    pub distance_km: f64,
    /// Estimated travel time, present when the query asked for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl SearchResult<&Value> {
    /// Copy of the entity with `distance_km` (and `duration_minutes`, when
    /// known) merged in. Non-object entities are wrapped under `entity`.
    pub fn to_record(&self) -> Value {
        let mut record = match self.entity {
            Value::Object(map) => Value::Object(map.clone()),
            other => serde_json::json!({ "entity": other }),
        };

        if let Value::Object(map) = &mut record {
            map.insert(DISTANCE_FIELD.to_string(), Value::from(self.distance_km));
            if let Some(minutes) = self.duration_minutes {
                map.insert("duration_minutes".to_string(), Value::from(minutes));
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_record_merges_fields() {
        let entity = json!({"name": "a", "distance_km": 99});
        let result = SearchResult { entity: &entity, distance_km: 1.5, duration_minutes: Some(7) };
        assert_eq!(
            result.to_record(),
            json!({"name": "a", "distance_km": 1.5, "duration_minutes": 7})
        );
    }

    #[test]
    fn test_to_record_wraps_scalars() {
        let entity = json!("plain");
        let result = SearchResult { entity: &entity, distance_km: 0.25, duration_minutes: None };
        assert_eq!(result.to_record(), json!({"entity": "plain", "distance_km": 0.25}));
    }
}
