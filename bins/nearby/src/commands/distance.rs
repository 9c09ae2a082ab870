//! `nearby distance`

use super::record_command;
use crate::context::Context;
use nearby_cli::output::{format_distance, print_json, Status};
use nearby_geo::{approximate_distance, bearing_degrees, haversine_distance, Coordinate};
use nearby_travel::CompassDirection;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct DistanceOutput {
    from: Coordinate,
    to: Coordinate,
    distance_km: f64,
    bearing_degrees: f64,
    direction: CompassDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    approximate_km: Option<f64>,
}

pub fn run(ctx: &Context, from: Coordinate, to: Coordinate, approximate: bool) -> anyhow::Result<()> {
    record_command("distance");

    let bearing = bearing_degrees(&from, &to);
    let output = DistanceOutput {
        from,
        to,
        distance_km: haversine_distance(&from, &to),
        bearing_degrees: bearing,
        direction: CompassDirection::from_bearing(bearing),
        approximate_km: approximate.then(|| approximate_distance(&from, &to)),
    };

    if ctx.json {
        print_json(&output)?;
        return Ok(());
    }

    Status::header(&format!("{} → {}", from, to));
    Status::field("Distance", &format_distance(output.distance_km));
    Status::field("Bearing", &format!("{:.1}° ({})", output.bearing_degrees, output.direction));
    if let Some(km) = output.approximate_km {
        Status::field("Approx.", &format_distance(km));
    }
    Ok(())
}
