//! `nearby eta`

use super::record_command;
use crate::context::Context;
use chrono::{DateTime, FixedOffset, Local};
use nearby_cli::output::{format_distance, format_minutes, print_json, Status};
use nearby_core::{Error, ErrorCode};
use nearby_geo::{haversine_distance, Coordinate};
use nearby_travel::TravelMode;
use serde_json::json;

pub fn run(
    ctx: &Context,
    from: Coordinate,
    to: Coordinate,
    mode: Option<TravelMode>,
    depart: Option<&str>,
) -> anyhow::Result<()> {
    record_command("eta");

    let mode = ctx.mode(mode);
    let departure = match depart {
        Some(text) => parse_departure(text)?,
        None => Local::now().fixed_offset(),
    };

    let estimator = ctx.estimator();
    let arrival = estimator.eta(&from, &to, mode, departure)?;
    let minutes = (arrival - departure).num_minutes();
    let distance_km = haversine_distance(&from, &to);

    if ctx.json {
        print_json(&json!({
            "from": from,
            "to": to,
            "mode": mode,
            "distance_km": distance_km,
            "duration_minutes": minutes,
            "departure": departure.to_rfc3339(),
            "arrival": arrival.to_rfc3339(),
        }))?;
        return Ok(());
    }

    Status::header(&format!("{} by {}", format_distance(distance_km), mode));
    Status::field("Duration", &format_minutes(u32::try_from(minutes).unwrap_or(u32::MAX)));
    Status::field("Departure", &departure.format("%Y-%m-%d %H:%M %:z").to_string());
    Status::field("Arrival", &arrival.format("%Y-%m-%d %H:%M %:z").to_string());
    Ok(())
}

fn parse_departure(text: &str) -> Result<DateTime<FixedOffset>, Error> {
    DateTime::parse_from_rfc3339(text).map_err(|e| {
        Error::new(ErrorCode::InvalidInput, format!("Invalid departure time '{}': {}", text, e))
            .with_suggestion("Use RFC 3339, e.g. 2024-05-01T08:30:00+03:00")
    })
}
