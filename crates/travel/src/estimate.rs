//! Distance-to-duration estimation.

use crate::{Result, TravelError, TravelMode, TravelProfile};
use chrono::{DateTime, Duration, TimeZone, Timelike};
use nearby_geo::{haversine_distance, Coordinate};

/// Whole minutes very close below an integer are treated as that integer, so float
/// noise in `distance * 60 / speed` cannot add a spurious minute.
const MINUTE_EPSILON: f64 = 1e-9;

/// Converts straight-line distances into travel durations using a [`TravelProfile`].
///
/// Driving gets two adjustments on top of the speed model: one extra minute per
/// full 2 km for intersections and signals, and a one-minute floor.
#[derive(Debug, Clone, Copy)]
pub struct TravelTimeEstimator<'p> {
    profile: &'p TravelProfile,
}

impl Default for TravelTimeEstimator<'static> {
    fn default() -> Self {
        Self::new(TravelProfile::global())
    }
}

impl<'p> TravelTimeEstimator<'p> {
    /// Creates an estimator over the given profile.
    pub fn new(profile: &'p TravelProfile) -> Self {
        Self { profile }
    }

    /// The profile backing this estimator.
    pub fn profile(&self) -> &'p TravelProfile {
        self.profile
    }

    /// Effective speed for `mode` at `hour`, in km/h.
    pub fn effective_speed_kmh(&self, mode: TravelMode, hour: u8) -> Result<f64> {
        self.profile.effective_speed_kmh(mode, hour)
    }

    /// Minutes needed to cover `distance_km`.
    ///
    /// # Example
    /// ```
    /// use nearby_travel::{TravelMode, TravelTimeEstimator};
    ///
    /// let estimator = TravelTimeEstimator::default();
    /// // ceil(1.5 / 40 * 60) = 3, plus 1.5 // 2 = 0 minutes of signal penalty
    /// assert_eq!(estimator.estimate_minutes_for_distance(1.5, TravelMode::Driving, 12).unwrap(), 3);
    /// ```
    pub fn estimate_minutes_for_distance(
        &self,
        distance_km: f64,
        mode: TravelMode,
        hour: u8,
    ) -> Result<u32> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(TravelError::InvalidDistance(distance_km));
        }

        let speed = self.effective_speed_kmh(mode, hour)?;
        let travel = (distance_km * 60.0 / speed - MINUTE_EPSILON).ceil().max(0.0) as u32;

        if mode == TravelMode::Driving {
            let penalty = (distance_km / 2.0).floor() as u32;
            Ok(travel.saturating_add(penalty).max(1))
        } else {
            Ok(travel)
        }
    }

    /// Minutes to travel from `origin` to `destination`.
    pub fn estimate_minutes(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        mode: TravelMode,
        hour: u8,
    ) -> Result<u32> {
        self.estimate_minutes_for_distance(haversine_distance(origin, destination), mode, hour)
    }

    /// Arrival time when leaving at `departure`.
    ///
    /// The traffic hour is taken from `departure` in its own time zone, and the
    /// result stays in that zone.
    pub fn eta<Tz: TimeZone>(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        mode: TravelMode,
        departure: DateTime<Tz>,
    ) -> Result<DateTime<Tz>> {
        let hour = departure.hour() as u8;
        let minutes = self.estimate_minutes(origin, destination, mode, hour)?;
        Ok(departure + Duration::minutes(i64::from(minutes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_short_drive_off_peak() {
        let estimator = TravelTimeEstimator::default();
        assert_eq!(estimator.estimate_minutes_for_distance(1.5, TravelMode::Driving, 12).unwrap(), 3);
    }

    #[test]
    fn test_driving_penalty_and_floor() {
        let estimator = TravelTimeEstimator::default();
        // 10 km at 40 km/h = 15 min, plus 5 min of signals
        assert_eq!(estimator.estimate_minutes_for_distance(10.0, TravelMode::Driving, 12).unwrap(), 20);
        // zero distance still costs a minute behind the wheel
        assert_eq!(estimator.estimate_minutes_for_distance(0.0, TravelMode::Driving, 3).unwrap(), 1);
        assert_eq!(estimator.estimate_minutes_for_distance(0.0, TravelMode::Walking, 3).unwrap(), 0);
    }

    #[test]
    fn test_rush_hour_slows_driving() {
        let estimator = TravelTimeEstimator::default();
        let off_peak = estimator.estimate_minutes_for_distance(10.0, TravelMode::Driving, 12).unwrap();
        let peak = estimator.estimate_minutes_for_distance(10.0, TravelMode::Driving, 8).unwrap();
        // 10 km at 40/1.5 km/h = 22.5 -> 23, plus 5
        assert_eq!(peak, 28);
        assert!(peak > off_peak);
    }

    #[test]
    fn test_other_modes_ignore_traffic() {
        let estimator = TravelTimeEstimator::default();
        for mode in [TravelMode::Walking, TravelMode::Cycling, TravelMode::Transit] {
            assert_eq!(
                estimator.estimate_minutes_for_distance(3.0, mode, 8).unwrap(),
                estimator.estimate_minutes_for_distance(3.0, mode, 12).unwrap()
            );
        }
        // 2 km walking = 24 min exactly, no rounding up
        assert_eq!(estimator.estimate_minutes_for_distance(2.0, TravelMode::Walking, 8).unwrap(), 24);
        assert_eq!(estimator.estimate_minutes_for_distance(2.0, TravelMode::Cycling, 8).unwrap(), 8);
    }

    #[test]
    fn test_crawling_profile_saturates() {
        let profile = TravelProfile { driving_kmh: 1e-9, ..TravelProfile::standard() };
        assert!(profile.validate().is_ok());
        let estimator = TravelTimeEstimator::new(&profile);
        assert_eq!(
            estimator.estimate_minutes_for_distance(10.0, TravelMode::Driving, 12).unwrap(),
            u32::MAX
        );
    }

    #[test]
    fn test_invalid_inputs() {
        let estimator = TravelTimeEstimator::default();
        assert!(matches!(
            estimator.estimate_minutes_for_distance(-1.0, TravelMode::Walking, 0),
            Err(TravelError::InvalidDistance(_))
        ));
        assert!(matches!(
            estimator.estimate_minutes_for_distance(1.0, TravelMode::Walking, 25),
            Err(TravelError::InvalidHour(25))
        ));
    }

    #[test]
    fn test_estimate_between_points() {
        let estimator = TravelTimeEstimator::default();
        let a = coord(24.7136, 46.6753);
        let b = coord(24.7136, 46.6753);
        assert_eq!(estimator.estimate_minutes(&a, &b, TravelMode::Driving, 12).unwrap(), 1);

        let riyadh = coord(24.7116, 46.6846);
        let jeddah = coord(21.6231, 39.1104);
        let minutes = estimator.estimate_minutes(&riyadh, &jeddah, TravelMode::Driving, 12).unwrap();
        // ~850 km: ~1275 min of driving plus ~425 min of penalties
        assert!(minutes > 1500 && minutes < 1900, "minutes: {minutes}");
    }

    #[test]
    fn test_eta_adds_minutes() {
        let estimator = TravelTimeEstimator::default();
        let a = coord(0.0, 0.0);
        let departure = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let arrival = estimator.eta(&a, &a, TravelMode::Driving, departure).unwrap();
        assert_eq!(arrival - departure, Duration::minutes(1));
    }

    #[test]
    fn test_eta_uses_local_hour() {
        let estimator = TravelTimeEstimator::default();
        let a = coord(24.7136, 46.6753);
        let b = nearby_geo::destination_point(&a, 90.0, 10.0);

        // 08:00 at UTC+3 is rush hour locally even though it is 05:00 UTC
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let local_peak = tz.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let utc_peak = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let noon = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let local = (estimator.eta(&a, &b, TravelMode::Driving, local_peak).unwrap() - local_peak)
            .num_minutes();
        let utc = (estimator.eta(&a, &b, TravelMode::Driving, utc_peak).unwrap() - utc_peak).num_minutes();
        let off_peak = (estimator.eta(&a, &b, TravelMode::Driving, noon).unwrap() - noon).num_minutes();

        assert_eq!(local, utc);
        assert!(local > off_peak);
    }
}
