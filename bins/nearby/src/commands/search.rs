//! `nearby search`

use super::record_command;
use crate::args::LatLng;
use crate::context::Context;
use clap::Args;
use nearby_cli::output::{format_count, format_distance, format_elapsed, format_minutes, print_json, Status};
use nearby_cli::table::{Align, Table};
use nearby_core::{Error, ResultExt};
use nearby_search::{
    FieldCoordinates, PredicateSet, SearchEngine, SearchQuery, SearchResult, SortSpec, TravelOptions,
};
use nearby_telemetry::{metrics, Timer};
use nearby_travel::TravelMode;
use serde_json::{json, Value};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Origin as LAT,LNG
    #[arg(allow_hyphen_values = true)]
    pub origin: LatLng,

    /// JSON file holding an array of entities ("-" for stdin)
    #[arg(short, long)]
    pub entities: PathBuf,

    /// Radius in kilometers
    #[arg(short, long)]
    pub radius: Option<f64>,

    /// Keep only the k best results
    #[arg(short)]
    pub k: Option<usize>,

    /// Filter as JSON, e.g. '{"rating": {"$gte": 4}}'
    #[arg(short, long)]
    pub filter: Option<String>,

    /// "distance" (default) or a field to sort descending by
    #[arg(short, long)]
    pub sort_by: Option<String>,

    /// Result cap, bounded by the configured max_results
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Attach travel-time estimates for this mode
    #[arg(short, long)]
    pub mode: Option<TravelMode>,

    /// Hour of day for travel estimates (0-23)
    #[arg(long)]
    pub hour: Option<u8>,

    /// Latitude field name
    #[arg(long)]
    pub lat_field: Option<String>,

    /// Longitude field name
    #[arg(long)]
    pub lng_field: Option<String>,

    /// Key of a nested location object
    #[arg(long)]
    pub location_key: Option<String>,

    /// Skip the bounding-box pre-filter
    #[arg(long)]
    pub no_bbox: bool,
}

pub fn run(ctx: &Context, args: SearchArgs) -> anyhow::Result<()> {
    record_command("search");

    let entities = load_entities(&args.entities)?;
    let source = coordinate_fields(ctx, &args);
    let query = build_query(ctx, &args)?;

    let mut config = ctx.config.schema.search.to_search_config();
    if args.no_bbox {
        config.use_bounding_box_optimization = false;
    }
    let engine = SearchEngine::with_estimator(config, ctx.estimator())?;

    let timer = Timer::start("search.latency_ms");
    let (results, stats) = engine.search_with_stats(&query, &entities, &source)?;
    let elapsed = timer.stop();

    let registry = metrics();
    registry.increment_by("search.candidates", stats.candidates as u64);
    registry.increment_by("search.unresolvable", stats.unresolvable as u64);
    registry.increment_by("search.pruned_by_bbox", stats.outside_bounding_box as u64);
    registry.gauge("search.returned", stats.returned as u64);

    if ctx.json {
        let records: Vec<Value> = results.iter().map(|r| r.to_record()).collect();
        print_json(&json!({ "results": records, "stats": stats }))?;
        return Ok(());
    }

    Status::header(&format!(
        "{} around {}",
        format_count(results.len(), "result", "results"),
        args.origin.0
    ));
    if !results.is_empty() {
        print_table(&results, query.travel.is_some());
    }
    if stats.unresolvable > 0 {
        Status::warning(&format!(
            "Skipped {} without usable coordinates",
            format_count(stats.unresolvable, "entity", "entities")
        ));
    }
    Status::info(&format!(
        "Scanned {} in {}",
        format_count(stats.candidates, "entity", "entities"),
        format_elapsed(elapsed)
    ));
    Ok(())
}

fn build_query(ctx: &Context, args: &SearchArgs) -> nearby_core::Result<SearchQuery> {
    let mut query = SearchQuery::around(&args.origin.0);
    query.radius_km = args.radius;
    query.k = args.k;
    query.limit = args.limit;

    // a query with neither radius nor k falls back to the configured radius
    if query.radius_km.is_none() && query.k.is_none() {
        query.radius_km = Some(ctx.config.schema.search.default_radius_km);
    }

    if let Some(text) = &args.filter {
        let value: Value = serde_json::from_str(text)
            .map_err(Error::from)
            .context("While parsing --filter")?;
        query.filter = Some(PredicateSet::from_json(&value).map_err(nearby_search::SearchError::from)?);
    }

    query.sort = SortSpec::parse(args.sort_by.as_deref())?;

    if args.mode.is_some() || args.hour.is_some() {
        query.travel = Some(TravelOptions { mode: ctx.mode(args.mode), hour: ctx.hour(args.hour) });
    }
    Ok(query)
}

fn coordinate_fields(ctx: &Context, args: &SearchArgs) -> FieldCoordinates {
    let mut fields = ctx.config.schema.search.coordinate_fields();
    if let Some(name) = &args.lat_field {
        fields.latitude_field = name.clone();
    }
    if let Some(name) = &args.lng_field {
        fields.longitude_field = name.clone();
    }
    if let Some(key) = &args.location_key {
        fields.location_key = Some(key.clone());
    }
    fields
}

fn load_entities(path: &Path) -> nearby_core::Result<Vec<Value>> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
        std::fs::read_to_string(path)?
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(entities)) => Ok(entities),
        Ok(other) => Err(Error::malformed_entities(path, format!("top-level value is {}", kind(&other)))),
        Err(e) => Err(Error::malformed_entities(path, e.to_string())),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Best human label for an entity: `name`, then `title`, then `id`.
fn label(entity: &Value, index: usize) -> String {
    ["name", "title", "id"]
        .iter()
        .find_map(|key| match entity.get(*key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| format!("#{}", index + 1))
}

fn print_table(results: &[SearchResult<&Value>], with_duration: bool) {
    let mut headers = vec![("#", Align::Right), ("entity", Align::Left), ("distance", Align::Right)];
    if with_duration {
        headers.push(("travel", Align::Right));
    }

    let mut table = Table::new(&headers);
    for (i, result) in results.iter().enumerate() {
        let mut row = vec![(i + 1).to_string(), label(result.entity, i), format_distance(result.distance_km)];
        if let Some(minutes) = result.duration_minutes {
            row.push(format_minutes(minutes));
        }
        table.row(row);
    }
    table.print();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_label_preference() {
        assert_eq!(label(&json!({"name": "Cafe", "id": 3}), 0), "Cafe");
        assert_eq!(label(&json!({"id": 42}), 0), "42");
        assert_eq!(label(&json!({"rating": 5}), 6), "#7");
    }

    #[test]
    fn test_load_entities() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "a"}}, {{"name": "b"}}]"#).unwrap();
        assert_eq!(load_entities(file.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_load_entities_rejects_objects() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "a"}}"#).unwrap();
        let err = load_entities(file.path()).unwrap_err();
        assert_eq!(err.code, nearby_core::ErrorCode::MalformedEntities);
    }

    #[test]
    fn test_load_entities_missing_file() {
        let err = load_entities(Path::new("/nonexistent/entities.json")).unwrap_err();
        assert_eq!(err.code, nearby_core::ErrorCode::FileNotFound);
    }
}
