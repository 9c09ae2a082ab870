//! Straight-line route building and turn-by-turn directions.
//!
//! Routes here are visual approximations: legs are interpolated in lat/lng space
//! rather than snapped to a road network.

use crate::{Result, TravelMode, TravelTimeEstimator};
use nearby_geo::{
    bearing_degrees, geometry::summarize_path, haversine_distance, render_path, wrap_longitude,
    Coordinate, Geometry, GeometryFormat,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Legs longer than this receive interpolated points, one per step.
pub const INTERPOLATION_STEP_KM: f64 = 5.0;

/// Upper bound on interpolated points inserted into a single leg.
pub const MAX_INTERPOLATED_POINTS: usize = 10;

/// One of the eight compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompassDirection {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl CompassDirection {
    const ORDER: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::Northeast,
        CompassDirection::East,
        CompassDirection::Southeast,
        CompassDirection::South,
        CompassDirection::Southwest,
        CompassDirection::West,
        CompassDirection::Northwest,
    ];

    /// Buckets a bearing into 45-degree sectors centred on each direction.
    pub fn from_bearing(bearing: f64) -> Self {
        let sector = ((bearing.rem_euclid(360.0) + 22.5) / 45.0).floor() as usize % 8;
        Self::ORDER[sector]
    }

    /// Lowercase direction word.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompassDirection::North => "north",
            CompassDirection::Northeast => "northeast",
            CompassDirection::East => "east",
            CompassDirection::Southeast => "southeast",
            CompassDirection::South => "south",
            CompassDirection::Southwest => "southwest",
            CompassDirection::West => "west",
            CompassDirection::Northwest => "northwest",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single instruction between two consecutive path points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionStep {
    /// Human-readable instruction
    pub instruction: String,
    /// Segment length in kilometers
    pub distance_km: f64,
    /// Segment duration in minutes (one decimal)
    pub duration_minutes: f64,
    /// Segment start
    pub from: Coordinate,
    /// Segment end
    pub to: Coordinate,
}

/// A built route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Interpolated path from origin to destination
    pub path: Vec<Coordinate>,
    /// Sum of the leg distances between stops, in kilometers
    pub distance_km: f64,
    /// Estimated origin-to-destination duration
    pub duration_minutes: u32,
    /// Mode the durations were computed for
    pub mode: TravelMode,
    /// Turn-by-turn directions along `path`
    pub steps: Vec<DirectionStep>,
}

impl Route {
    /// Emits the path in the requested geometry format.
    pub fn geometry(&self, format: GeometryFormat) -> Geometry {
        render_path(&self.path, format)
    }
}

/// Builds routes through an ordered list of stops.
#[derive(Debug, Clone, Copy)]
pub struct RouteBuilder<'p> {
    estimator: TravelTimeEstimator<'p>,
}

impl Default for RouteBuilder<'static> {
    fn default() -> Self {
        Self::new(TravelTimeEstimator::default())
    }
}

impl<'p> RouteBuilder<'p> {
    /// Creates a builder that times routes with `estimator`.
    pub fn new(estimator: TravelTimeEstimator<'p>) -> Self {
        Self { estimator }
    }

    /// Builds a route `origin -> waypoints... -> destination`.
    ///
    /// The total distance sums the legs between stops; the duration is the
    /// estimator's figure for the direct origin-destination pair.
    pub fn build_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        waypoints: &[Coordinate],
        mode: TravelMode,
        hour: u8,
    ) -> Result<Route> {
        let stops: Vec<Coordinate> = std::iter::once(*origin)
            .chain(waypoints.iter().copied())
            .chain(std::iter::once(*destination))
            .collect();

        let mut path = Vec::with_capacity(stops.len());
        let mut distance_km = 0.0;
        for leg in stops.windows(2) {
            let (from, to) = (&leg[0], &leg[1]);
            distance_km += haversine_distance(from, to);
            path.push(*from);
            path.extend(interpolate_leg(from, to));
        }
        path.push(*destination);

        let duration_minutes = self.estimator.estimate_minutes(origin, destination, mode, hour)?;
        let steps = self.turn_by_turn(&path, mode, hour)?;

        tracing::debug!(
            stops = stops.len(),
            points = path.len(),
            distance_km,
            duration_minutes,
            path = %summarize_path(&stops),
            "Route built"
        );

        Ok(Route { path, distance_km, duration_minutes, mode, steps })
    }

    /// Directions for each consecutive pair of points in `path`.
    ///
    /// Zero-length segments (repeated points) produce no step.
    pub fn turn_by_turn(
        &self,
        path: &[Coordinate],
        mode: TravelMode,
        hour: u8,
    ) -> Result<Vec<DirectionStep>> {
        let speed = self.estimator.effective_speed_kmh(mode, hour)?;

        let steps = path
            .windows(2)
            .filter_map(|pair| {
                let (from, to) = (pair[0], pair[1]);
                let distance_km = haversine_distance(&from, &to);
                if distance_km <= 0.0 {
                    return None;
                }
                let direction = CompassDirection::from_bearing(bearing_degrees(&from, &to));
                Some(DirectionStep {
                    instruction: instruction(direction, distance_km),
                    distance_km: round_to(distance_km, 3),
                    duration_minutes: round_to(distance_km / speed * 60.0, 1),
                    from,
                    to,
                })
            })
            .collect();

        Ok(steps)
    }
}

/// Phrase an instruction for a segment, scaled by its length.
fn instruction(direction: CompassDirection, distance_km: f64) -> String {
    let meters = (distance_km * 1000.0).round() as u64;
    if distance_km < 0.1 {
        format!("Continue straight for {meters}m")
    } else if distance_km < 1.0 {
        format!("Head {direction} for {meters}m")
    } else {
        format!("Travel {direction} for {distance_km:.1}km")
    }
}

/// Points strictly between `from` and `to`, one per [`INTERPOLATION_STEP_KM`],
/// capped at [`MAX_INTERPOLATED_POINTS`].
///
/// Longitude is interpolated the short way round, so a leg across the
/// antimeridian does not sweep the whole globe.
fn interpolate_leg(from: &Coordinate, to: &Coordinate) -> Vec<Coordinate> {
    let distance = haversine_distance(from, to);
    if distance <= INTERPOLATION_STEP_KM {
        return Vec::new();
    }

    let count = ((distance / INTERPOLATION_STEP_KM) as usize).min(MAX_INTERPOLATED_POINTS);
    let d_lat = to.latitude() - from.latitude();
    let mut d_lng = to.longitude() - from.longitude();
    if d_lng > 180.0 {
        d_lng -= 360.0;
    } else if d_lng < -180.0 {
        d_lng += 360.0;
    }

    (1..=count)
        .filter_map(|i| {
            let t = i as f64 / (count + 1) as f64;
            let lat = from.latitude() + d_lat * t;
            let lng = wrap_longitude(from.longitude() + d_lng * t);
            Coordinate::new(lat, lng).ok()
        })
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
