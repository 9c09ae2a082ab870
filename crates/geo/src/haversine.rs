//! Great-circle math on a spherical Earth.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::{wrap_longitude, Coordinate};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// Uses the Haversine formula for accurate distance calculation on a sphere.
///
/// # Arguments
/// * `from` - Starting coordinate
/// * `to` - Ending coordinate
///
/// # Returns
/// Distance in kilometers
///
/// # Example
/// ```
/// use nearby_geo::{haversine_distance, Coordinate};
///
/// let riyadh = Coordinate::new(24.7116, 46.6846).unwrap();
/// let jeddah = Coordinate::new(21.6231, 39.1104).unwrap();
///
/// let distance = haversine_distance(&riyadh, &jeddah);
/// assert!((distance - 850.0).abs() < 50.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two coordinates in meters.
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_M)
}

/// Calculates the great-circle distance on a sphere of the given radius.
///
/// The result is in the unit of `radius`.
#[inline]
pub fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` just outside [0, 1] for identical or antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

/// Initial compass bearing from `from` to `to`, in degrees within `[0, 360)`.
///
/// # Example
/// ```
/// use nearby_geo::{bearing_degrees, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let north = Coordinate::new(1.0, 0.0).unwrap();
/// assert!(bearing_degrees(&a, &north).abs() < 1e-9);
/// ```
pub fn bearing_degrees(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();
    let d_lon = lon2 - lon1;

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if bearing >= 360.0 { 0.0 } else { bearing }
}

/// Point reached by travelling `distance_km` from `start` along `bearing` degrees.
///
/// Latitude is clamped to the poles and longitude wrapped into `[-180, 180]`.
pub fn destination_point(start: &Coordinate, bearing: f64, distance_km: f64) -> Coordinate {
    let (lat1, lon1) = start.to_radians();
    let angular = distance_km / EARTH_RADIUS_KM;
    let theta = bearing.to_radians();

    let sin_lat2 = lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * theta.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon1
        + (theta.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * sin_lat2);

    Coordinate::new_unchecked(
        lat2.to_degrees().clamp(-90.0, 90.0),
        wrap_longitude(lon2.to_degrees()),
    )
}

/// Fast approximate distance for filtering (uses equirectangular projection).
///
/// This is faster than Haversine but less accurate over long distances.
///
/// # Returns
/// Approximate distance in kilometers
#[inline]
pub fn approximate_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let x = (lon2 - lon1) * ((lat1 + lat2) / 2.0).cos();
    let y = lat2 - lat1;

    (x * x + y * y).sqrt() * EARTH_RADIUS_KM
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RIYADH: Coordinate = Coordinate::new_unchecked(24.7116, 46.6846);
    const JEDDAH: Coordinate = Coordinate::new_unchecked(21.6231, 39.1104);
    const NEW_YORK: Coordinate = Coordinate::new_unchecked(40.7128, -74.0060);
    const TOKYO: Coordinate = Coordinate::new_unchecked(35.6762, 139.6503);

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0..=90.0f64, -180.0..=180.0f64)
            .prop_map(|(lat, lng)| Coordinate::new_unchecked(lat, lng))
    }

    #[test]
    fn test_riyadh_to_jeddah() {
        let distance = haversine_distance(&RIYADH, &JEDDAH);
        assert!((distance - 850.0).abs() < 50.0, "Riyadh-Jeddah: {}", distance);
    }

    #[test]
    fn test_new_york_to_tokyo() {
        let distance = haversine_distance(&NEW_YORK, &TOKYO);
        // Expected: ~10,838 km
        assert!((distance - 10838.0).abs() < 50.0, "NYC-Tokyo: {}", distance);
    }

    #[test]
    fn test_same_point_zero_distance() {
        assert_eq!(haversine_distance(&RIYADH, &RIYADH), 0.0);
    }

    #[test]
    fn test_antipodal_points_are_finite() {
        let a = Coordinate::new_unchecked(0.0, 0.0);
        let b = Coordinate::new_unchecked(0.0, 180.0);
        let distance = haversine_distance(&a, &b);
        assert!(distance.is_finite());
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_meters_conversion() {
        let km = haversine_distance(&RIYADH, &JEDDAH);
        let meters = haversine_distance_meters(&RIYADH, &JEDDAH);
        assert!((meters - km * 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_custom_radius_scales_linearly() {
        let default = haversine_distance(&RIYADH, &JEDDAH);
        let doubled = haversine_distance_with_radius(&RIYADH, &JEDDAH, EARTH_RADIUS_KM * 2.0);
        assert!((doubled - default * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_approximate_distance_reasonable() {
        let exact = haversine_distance(&RIYADH, &JEDDAH);
        let approx = approximate_distance(&RIYADH, &JEDDAH);
        let error = ((approx - exact) / exact).abs();
        assert!(error < 0.05, "Error: {}%", error * 100.0);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Coordinate::new_unchecked(0.0, 0.0);
        let east = Coordinate::new_unchecked(0.0, 1.0);
        let south = Coordinate::new_unchecked(-1.0, 0.0);
        let west = Coordinate::new_unchecked(0.0, -1.0);

        assert!((bearing_degrees(&origin, &east) - 90.0).abs() < 1e-9);
        assert!((bearing_degrees(&origin, &south) - 180.0).abs() < 1e-9);
        assert!((bearing_degrees(&origin, &west) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_riyadh_to_jeddah_is_west_southwest() {
        let bearing = bearing_degrees(&RIYADH, &JEDDAH);
        assert!(bearing > 240.0 && bearing < 270.0, "bearing: {}", bearing);
    }

    #[test]
    fn test_destination_point_round_trip_distance() {
        let target = destination_point(&RIYADH, 45.0, 25.0);
        let distance = haversine_distance(&RIYADH, &target);
        assert!((distance - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_destination_point_wraps_antimeridian() {
        let start = Coordinate::new_unchecked(0.0, 179.9);
        let target = destination_point(&start, 90.0, 50.0);
        assert!(target.longitude() < -179.0);
    }

    proptest! {
        #[test]
        fn prop_distance_is_symmetric(a in coordinate(), b in coordinate()) {
            let d1 = haversine_distance(&a, &b);
            let d2 = haversine_distance(&b, &a);
            prop_assert!((d1 - d2).abs() < 1e-9);
        }

        #[test]
        fn prop_distance_to_self_is_zero(a in coordinate()) {
            prop_assert_eq!(haversine_distance(&a, &a), 0.0);
        }

        #[test]
        fn prop_bearing_in_range(a in coordinate(), b in coordinate()) {
            let bearing = bearing_degrees(&a, &b);
            prop_assert!((0.0..360.0).contains(&bearing));
        }
    }
}
