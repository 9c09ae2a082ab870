//! Circular isochrone approximation.
//!
//! The reachable area for a time budget is modelled as a circle whose radius is
//! the effective speed times the budget. This ignores the road network entirely;
//! it is a planning aid, not a drive-time polygon.

use crate::{Result, TravelMode, TravelTimeEstimator};
use nearby_geo::{destination_point, Coordinate};
use std::collections::BTreeMap;

/// Reachable radius in kilometers for each budget in `minutes`, keyed by budget.
///
/// Duplicate budgets collapse into one entry.
///
/// # Example
/// ```
/// use nearby_geo::Coordinate;
/// use nearby_travel::{isochrone, TravelMode, TravelTimeEstimator};
///
/// let center = Coordinate::new(24.7136, 46.6753).unwrap();
/// let radii = isochrone(&TravelTimeEstimator::default(), &center, &[15, 30], TravelMode::Walking, 12).unwrap();
/// assert_eq!(radii[&30], 2.5);
/// ```
pub fn isochrone(
    estimator: &TravelTimeEstimator<'_>,
    center: &Coordinate,
    minutes: &[u32],
    mode: TravelMode,
    hour: u8,
) -> Result<BTreeMap<u32, f64>> {
    let speed = estimator.effective_speed_kmh(mode, hour)?;

    let radii: BTreeMap<u32, f64> = minutes
        .iter()
        .map(|&budget| (budget, speed * f64::from(budget) / 60.0))
        .collect();

    tracing::debug!(%center, %mode, hour, budgets = radii.len(), "Isochrone radii computed");
    Ok(radii)
}

/// Closed polygon of `segments` points approximating the circle of `radius_km`
/// around `center`. The first point is repeated at the end.
pub fn isochrone_ring(center: &Coordinate, radius_km: f64, segments: usize) -> Vec<Coordinate> {
    let segments = segments.max(3);
    let mut ring: Vec<Coordinate> = (0..segments)
        .map(|i| destination_point(center, 360.0 * i as f64 / segments as f64, radius_km))
        .collect();
    ring.push(ring[0]);
    ring
}
