//! Greedy waypoint ordering.

use nearby_geo::{haversine_distance, Coordinate};

/// Orders `waypoints` by repeatedly visiting the closest unvisited one, starting
/// from `origin`.
///
/// This is the nearest-neighbor heuristic: O(n²) and usually decent, but not an
/// optimal tour. Ties go to the waypoint that appears first in the input, so the
/// output is fully determined by the input.
///
/// # Example
/// ```
/// use nearby_geo::Coordinate;
/// use nearby_travel::optimize_waypoints;
///
/// let origin = Coordinate::new(0.0, 0.0).unwrap();
/// let far = Coordinate::new(0.0, 2.0).unwrap();
/// let near = Coordinate::new(0.0, 1.0).unwrap();
/// assert_eq!(optimize_waypoints(&origin, &[far, near]), vec![near, far]);
/// ```
pub fn optimize_waypoints(origin: &Coordinate, waypoints: &[Coordinate]) -> Vec<Coordinate> {
    let mut remaining: Vec<Coordinate> = waypoints.to_vec();
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut current = *origin;

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, candidate) in remaining.iter().enumerate() {
            let distance = haversine_distance(&current, candidate);
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }

        // `remove` keeps input order for the rest, which the tie rule relies on
        current = remaining.remove(best);
        ordered.push(current);
    }

    ordered
}

/// Total length of visiting `stops` in order, in kilometers.
pub fn path_distance(stops: &[Coordinate]) -> f64 {
    stops.windows(2).map(|leg| haversine_distance(&leg[0], &leg[1])).sum()
}
