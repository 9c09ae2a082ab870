//! `nearby isochrone`

use super::record_command;
use crate::context::Context;
use nearby_cli::output::{format_distance, print_json, Status};
use nearby_cli::table::{Align, Table};
use nearby_geo::Coordinate;
use nearby_travel::{isochrone, isochrone_ring, TravelMode};
use serde_json::{json, Value};

pub fn run(
    ctx: &Context,
    center: Coordinate,
    minutes: &[u32],
    mode: Option<TravelMode>,
    hour: Option<u8>,
    ring: Option<usize>,
) -> anyhow::Result<()> {
    record_command("isochrone");

    let mode = ctx.mode(mode);
    let hour = ctx.hour(hour);
    let radii = isochrone(&ctx.estimator(), &center, minutes, mode, hour)?;

    if ctx.json {
        let budgets: Vec<Value> = radii
            .iter()
            .map(|(&budget, &radius_km)| {
                let mut entry = json!({ "minutes": budget, "radius_km": radius_km });
                if let Some(segments) = ring {
                    entry["polygon"] = polygon(&isochrone_ring(&center, radius_km, segments));
                }
                entry
            })
            .collect();
        print_json(&json!({
            "center": center,
            "mode": mode,
            "hour": hour,
            "isochrones": budgets,
        }))?;
        return Ok(());
    }

    Status::header(&format!("Reachable from {} by {} at {:02}:00", center, mode, hour));
    let mut table = Table::new(&[("minutes", Align::Right), ("radius", Align::Right)]);
    for (budget, radius_km) in &radii {
        table.row(vec![budget.to_string(), format_distance(*radius_km)]);
    }
    table.print();

    if let Some(segments) = ring {
        for (budget, radius_km) in &radii {
            println!();
            Status::info(&format!("{} min polygon", budget));
            println!("{}", polygon(&isochrone_ring(&center, *radius_km, segments)));
        }
    }
    Ok(())
}

/// GeoJSON Polygon from a closed ring.
fn polygon(ring: &[Coordinate]) -> Value {
    let positions: Vec<[f64; 2]> = ring.iter().map(|c| [c.longitude(), c.latitude()]).collect();
    json!({ "type": "Polygon", "coordinates": [positions] })
}
