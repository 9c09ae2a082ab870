//! Bounding-box pre-filter.
//!
//! A box around a search circle is a cheap way to cull candidates before the exact
//! Haversine check. The box always contains the whole circle, so it may keep points
//! outside the radius but never drops one inside it.
//!
//! Longitudes past ±180 are wrapped, which leaves `min_lng > max_lng` for a box that
//! crosses the antimeridian. [`BoundingBox::contains`] branches on that case.

use crate::{Coordinate, EARTH_RADIUS_KM};
use serde::{Deserialize, Serialize};

/// Slack added to both deltas so points sitting exactly on the circle survive
/// float rounding in the trig below.
const EDGE_TOLERANCE_DEG: f64 = 1e-9;

/// Latitude/longitude rectangle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern edge
    pub min_lat: f64,
    /// Northern edge
    pub max_lat: f64,
    /// Western edge (greater than `max_lng` when crossing the antimeridian)
    pub min_lng: f64,
    /// Eastern edge
    pub max_lng: f64,
}

impl BoundingBox {
    /// Smallest box containing the circle of `radius_km` around `center`.
    ///
    /// # Example
    /// ```
    /// use nearby_geo::{BoundingBox, Coordinate};
    ///
    /// let center = Coordinate::new(0.0, 179.9).unwrap();
    /// let bbox = BoundingBox::around(&center, 50.0);
    /// assert!(bbox.crosses_antimeridian());
    /// assert!(bbox.contains(&Coordinate::new(0.0, -179.9).unwrap()));
    /// ```
    pub fn around(center: &Coordinate, radius_km: f64) -> Self {
        Self::around_with_radius(center, radius_km, EARTH_RADIUS_KM)
    }

    /// Same as [`BoundingBox::around`] on a sphere of `earth_radius_km`.
    pub fn around_with_radius(center: &Coordinate, radius_km: f64, earth_radius_km: f64) -> Self {
        let angular = (radius_km / earth_radius_km).max(0.0);
        let lat_delta = angular.to_degrees() + EDGE_TOLERANCE_DEG;

        let lat = center.latitude();
        let min_lat = (lat - lat_delta).max(-90.0);
        let max_lat = (lat + lat_delta).min(90.0);

        // A cap that touches a pole spans every meridian. Otherwise the ratio stays
        // below 1 and asin is well defined.
        let reaches_pole = lat + lat_delta >= 90.0 || lat - lat_delta <= -90.0;
        let ratio = angular.sin() / lat.to_radians().cos();
        if reaches_pole || angular >= std::f64::consts::FRAC_PI_2 || ratio >= 1.0 {
            return Self { min_lat, max_lat, min_lng: -180.0, max_lng: 180.0 };
        }

        let lng_delta = ratio.asin().to_degrees() + EDGE_TOLERANCE_DEG;
        if lng_delta >= 180.0 {
            return Self { min_lat, max_lat, min_lng: -180.0, max_lng: 180.0 };
        }

        let mut min_lng = center.longitude() - lng_delta;
        let mut max_lng = center.longitude() + lng_delta;
        if min_lng < -180.0 {
            min_lng += 360.0;
        }
        if max_lng > 180.0 {
            max_lng -= 360.0;
        }

        Self { min_lat, max_lat, min_lng, max_lng }
    }

    /// True if the box wraps past ±180 longitude.
    #[inline]
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lng > self.max_lng
    }

    /// Membership test, handling antimeridian-crossing boxes.
    #[inline]
    pub fn contains(&self, point: &Coordinate) -> bool {
        let lat = point.latitude();
        if lat < self.min_lat || lat > self.max_lat {
            return false;
        }

        let lng = point.longitude();
        if self.crosses_antimeridian() {
            lng >= self.min_lng || lng <= self.max_lng
        } else {
            lng >= self.min_lng && lng <= self.max_lng
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{destination_point, haversine_distance};
    use proptest::prelude::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_box_contains_center() {
        let center = coord(24.7136, 46.6753);
        let bbox = BoundingBox::around(&center, 10.0);
        assert!(bbox.contains(&center));
        assert!(!bbox.crosses_antimeridian());
    }

    #[test]
    fn test_latitude_delta_matches_radius() {
        let center = coord(0.0, 0.0);
        let bbox = BoundingBox::around(&center, 111.195);
        // ~1 degree of latitude per 111.195 km
        assert!((bbox.max_lat - 1.0).abs() < 1e-3);
        assert!((bbox.min_lat + 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_far_point_excluded() {
        let center = coord(24.7136, 46.6753);
        let bbox = BoundingBox::around(&center, 10.0);
        assert!(!bbox.contains(&coord(21.6231, 39.1104)));
    }

    #[test]
    fn test_antimeridian_box() {
        let center = coord(0.0, 179.9);
        let bbox = BoundingBox::around(&center, 50.0);

        assert!(bbox.min_lng > bbox.max_lng);
        assert!(bbox.contains(&coord(0.0, -179.9)));
        assert!(bbox.contains(&coord(0.0, 179.8)));
        assert!(!bbox.contains(&coord(0.0, 0.0)));
        assert!(!bbox.contains(&coord(0.0, -170.0)));
    }

    #[test]
    fn test_western_antimeridian_box() {
        let center = coord(10.0, -179.95);
        let bbox = BoundingBox::around(&center, 20.0);
        assert!(bbox.crosses_antimeridian());
        assert!(bbox.contains(&coord(10.0, 179.99)));
    }

    #[test]
    fn test_pole_clamps_to_full_longitude() {
        let center = coord(89.99, 10.0);
        let bbox = BoundingBox::around(&center, 50.0);

        assert_eq!(bbox.max_lat, 90.0);
        assert_eq!(bbox.min_lng, -180.0);
        assert_eq!(bbox.max_lng, 180.0);
        assert!(bbox.contains(&coord(89.9, -170.0)));
    }

    #[test]
    fn test_exact_pole_center() {
        let bbox = BoundingBox::around(&coord(-90.0, 0.0), 1.0);
        assert_eq!(bbox.min_lat, -90.0);
        assert!(bbox.min_lat <= bbox.max_lat);
        assert!(bbox.contains(&coord(-89.995, 123.0)));
    }

    #[test]
    fn test_huge_radius_covers_everything() {
        let bbox = BoundingBox::around(&coord(0.0, 0.0), 30_000.0);
        assert_eq!((bbox.min_lat, bbox.max_lat), (-90.0, 90.0));
        assert!(bbox.contains(&coord(45.0, 179.0)));
    }

    #[test]
    fn test_zero_radius() {
        let center = coord(12.0, 34.0);
        let bbox = BoundingBox::around(&center, 0.0);
        assert!(bbox.contains(&center));
        assert!(!bbox.contains(&coord(12.001, 34.0)));
    }

    proptest! {
        #[test]
        fn prop_box_never_drops_points_inside_radius(
            lat in -89.0..=89.0f64,
            lng in -180.0..=180.0f64,
            radius_km in 0.1..500.0f64,
            bearing in 0.0..360.0f64,
            fraction in 0.0..=1.0f64,
        ) {
            let center = Coordinate::new(lat, lng).unwrap();
            let point = destination_point(&center, bearing, radius_km * fraction);
            prop_assume!(haversine_distance(&center, &point) <= radius_km);

            let bbox = BoundingBox::around(&center, radius_km);
            prop_assert!(bbox.contains(&point), "{:?} not in {:?}", point, bbox);
        }

        #[test]
        fn prop_min_lat_not_above_max_lat(
            lat in -90.0..=90.0f64,
            lng in -180.0..=180.0f64,
            radius_km in 0.0..20_000.0f64,
        ) {
            let bbox = BoundingBox::around(&Coordinate::new(lat, lng).unwrap(), radius_km);
            prop_assert!(bbox.min_lat <= bbox.max_lat);
            prop_assert!(bbox.min_lng >= -180.0 && bbox.max_lng <= 180.0);
        }
    }
}
