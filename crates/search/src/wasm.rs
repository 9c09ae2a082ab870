//! WASM bindings for proximity search.

use crate::{SearchEngine, SearchRequest};
use wasm_bindgen::prelude::*;

/// Runs a search request over a JSON array of entities.
///
/// # Arguments
/// * `request_json` - A serialized `SearchRequest`
/// * `entities_json` - JSON array of entity objects
///
/// # Returns
/// JSON array of the matching entities, each with `distance_km` (and
/// `duration_minutes` when a travel mode was given) merged in.
#[wasm_bindgen]
pub fn search_nearby(request_json: &str, entities_json: &str) -> Result<String, JsValue> {
    let request: SearchRequest =
        serde_json::from_str(request_json).map_err(|e| JsValue::from_str(&format!("Invalid request: {e}")))?;
    let entities: Vec<serde_json::Value> =
        serde_json::from_str(entities_json).map_err(|e| JsValue::from_str(&format!("Invalid entities: {e}")))?;

    let (query, source) = request.into_parts().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let results = SearchEngine::default()
        .search(&query, &entities, &source)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let records: Vec<serde_json::Value> = results.iter().map(|r| r.to_record()).collect();
    serde_json::to_string(&records).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Returns true when `entity_json` satisfies `filter_json`.
#[wasm_bindgen]
pub fn matches_filter(filter_json: &str, entity_json: &str) -> Result<bool, JsValue> {
    let filter: serde_json::Value =
        serde_json::from_str(filter_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let entity: serde_json::Value =
        serde_json::from_str(entity_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    crate::evaluate(&filter, &entity).map_err(|e| JsValue::from_str(&e.to_string()))
}
