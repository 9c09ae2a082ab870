//! `nearby bbox`

use super::record_command;
use crate::context::Context;
use nearby_cli::output::{print_json, Status};
use nearby_core::Error;
use nearby_geo::{BoundingBox, Coordinate};
use serde_json::json;

pub fn run(ctx: &Context, center: Coordinate, radius_km: f64) -> anyhow::Result<()> {
    record_command("bbox");

    if !(radius_km.is_finite() && radius_km > 0.0) {
        return Err(Error::invalid_input(format!("radius must be positive, got {}", radius_km)).into());
    }

    let earth_radius_km = ctx.config.schema.search.earth_radius_km;
    let bbox = BoundingBox::around_with_radius(&center, radius_km, earth_radius_km);

    if ctx.json {
        print_json(&json!({
            "center": center,
            "radius_km": radius_km,
            "bbox": bbox,
            "crosses_antimeridian": bbox.crosses_antimeridian(),
        }))?;
        return Ok(());
    }

    Status::header(&format!("{} km around {}", radius_km, center));
    Status::field("Latitude", &format!("{:.6} .. {:.6}", bbox.min_lat, bbox.max_lat));
    Status::field("Longitude", &format!("{:.6} .. {:.6}", bbox.min_lng, bbox.max_lng));
    if bbox.crosses_antimeridian() {
        Status::info("Box crosses the antimeridian (min longitude > max longitude)");
    }
    Ok(())
}
