//! `nearby route`

use super::record_command;
use crate::args::LatLng;
use crate::context::Context;
use clap::Args;
use nearby_cli::output::{format_distance, format_minutes, print_json, Status};
use nearby_cli::table::{Align, Table};
use nearby_geo::{Coordinate, GeometryFormat};
use nearby_travel::{optimize_waypoints, path_distance, RouteBuilder, TravelMode};
use serde_json::json;

#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Start as LAT,LNG
    #[arg(allow_hyphen_values = true)]
    pub origin: LatLng,

    /// End as LAT,LNG
    #[arg(allow_hyphen_values = true)]
    pub destination: LatLng,

    /// Intermediate stop as LAT,LNG (repeatable)
    #[arg(long = "via", allow_hyphen_values = true)]
    pub waypoints: Vec<LatLng>,

    /// Reorder stops with the nearest-neighbor heuristic
    #[arg(long)]
    pub optimize: bool,

    /// walking, cycling, driving or transit
    #[arg(short, long)]
    pub mode: Option<TravelMode>,

    /// Hour of day (0-23); defaults to the configured or current hour
    #[arg(long)]
    pub hour: Option<u8>,

    /// Geometry format: geojson, polyline or wkt
    #[arg(short, long, default_value = "geojson")]
    pub format: GeometryFormat,

    /// Print turn-by-turn directions
    #[arg(long)]
    pub steps: bool,
}

pub fn run(ctx: &Context, args: RouteArgs) -> anyhow::Result<()> {
    record_command("route");

    let origin = args.origin.0;
    let destination = args.destination.0;
    let mut stops: Vec<Coordinate> = args.waypoints.iter().map(|w| w.0).collect();
    if args.optimize && stops.len() > 1 {
        let before = stop_distance(&origin, &stops, &destination);
        stops = optimize_waypoints(&origin, &stops);
        let after = stop_distance(&origin, &stops, &destination);
        tracing::debug!(before_km = before, after_km = after, "Waypoints reordered");
    }

    let mode = ctx.mode(args.mode);
    let hour = ctx.hour(args.hour);
    let route = RouteBuilder::new(ctx.estimator()).build_route(&origin, &destination, &stops, mode, hour)?;
    let geometry = route.geometry(args.format);

    if ctx.json {
        let mut output = json!({
            "distance_km": route.distance_km,
            "duration_minutes": route.duration_minutes,
            "mode": route.mode,
            "hour": hour,
            "waypoints": stops,
            "geometry": geometry,
        });
        if args.steps {
            output["steps"] = serde_json::to_value(&route.steps)?;
        }
        print_json(&output)?;
        return Ok(());
    }

    Status::header(&format!("{} → {}", origin, destination));
    Status::field("Distance", &format_distance(route.distance_km));
    Status::field("Duration", &format!("{} by {}", format_minutes(route.duration_minutes), mode));
    if !stops.is_empty() {
        let order: Vec<String> = stops.iter().map(ToString::to_string).collect();
        Status::field("Stops", &order.join(" → "));
    }
    Status::field("Geometry", &geometry.to_string());

    if args.steps {
        println!();
        let mut table = Table::new(&[("#", Align::Right), ("instruction", Align::Left), ("min", Align::Right)]);
        for (i, step) in route.steps.iter().enumerate() {
            table.row(vec![
                (i + 1).to_string(),
                step.instruction.clone(),
                format!("{:.1}", step.duration_minutes),
            ]);
        }
        table.print();
    }
    Ok(())
}

fn stop_distance(origin: &Coordinate, stops: &[Coordinate], destination: &Coordinate) -> f64 {
    let mut all = Vec::with_capacity(stops.len() + 2);
    all.push(*origin);
    all.extend_from_slice(stops);
    all.push(*destination);
    path_distance(&all)
}
