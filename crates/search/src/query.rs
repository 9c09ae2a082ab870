//! Query description and its serialized request form.

use crate::field::FieldPath;
use crate::predicate::PredicateSet;
use crate::source::FieldCoordinates;
use crate::Result;
use nearby_geo::Coordinate;
use nearby_travel::TravelMode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hour of day assumed when travel estimates are requested without one.
pub const DEFAULT_DEPARTURE_HOUR: u8 = 12;

/// Result ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SortSpec {
    /// Nearest first
    #[default]
    Distance,
    /// Highest value of the field first; absent or non-numeric values count as zero
    FieldDescending(FieldPath),
}

impl SortSpec {
    /// `None`, `"distance"` and `"distance_km"` sort by distance; anything else
    /// is a field path sorted descending.
    pub fn parse(sort_by: Option<&str>) -> Result<Self> {
        match sort_by {
            None | Some("distance") => Ok(SortSpec::Distance),
            Some(field) => {
                let path = FieldPath::parse(field)?;
                if path.is_distance() {
                    Ok(SortSpec::Distance)
                } else {
                    Ok(SortSpec::FieldDescending(path))
                }
            }
        }
    }
}

/// Travel-time annotation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelOptions {
    /// Mode to estimate for
    pub mode: TravelMode,
    /// Departure hour (0-23)
    pub hour: u8,
}

/// A proximity query. Origin values are validated when the query runs.
///
/// # Example
/// ```
/// use nearby_search::SearchQuery;
///
/// let query = SearchQuery::at(24.7136, 46.6753).within_km(5.0).nearest(10);
/// assert_eq!(query.radius_km, Some(5.0));
/// assert_eq!(query.k, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Origin latitude
    pub latitude: f64,
    /// Origin longitude
    pub longitude: f64,
    /// Radius in kilometers
    pub radius_km: Option<f64>,
    /// Keep only the first `k` after sorting
    pub k: Option<usize>,
    /// Attribute filter
    pub filter: Option<PredicateSet>,
    /// Ordering
    pub sort: SortSpec,
    /// Per-query cap, further bounded by the engine's `max_results`
    pub limit: Option<usize>,
    /// Attach travel-time estimates to results
    pub travel: Option<TravelOptions>,
}

impl SearchQuery {
    /// Query around raw latitude/longitude.
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km: None,
            k: None,
            filter: None,
            sort: SortSpec::Distance,
            limit: None,
            travel: None,
        }
    }

    /// Query around an already validated coordinate.
    pub fn around(origin: &Coordinate) -> Self {
        Self::at(origin.latitude(), origin.longitude())
    }

    /// Restricts results to `radius_km`.
    pub fn within_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    /// Keeps only the `k` best results.
    pub fn nearest(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    /// Adds an attribute filter.
    pub fn filter(mut self, filter: PredicateSet) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the ordering.
    pub fn sort_by(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Caps the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Annotates results with travel-time estimates.
    pub fn with_travel(mut self, mode: TravelMode, hour: u8) -> Self {
        self.travel = Some(TravelOptions { mode, hour });
        self
    }
}

/// Serialized query, as accepted by the CLI and the WASM bindings.
///
/// ```json
/// {
///   "latitude": 24.7136,
///   "longitude": 46.6753,
///   "radius_km": 5,
///   "filter": {"category": "cafe"},
///   "sort_by": "rating",
///   "mode": "walking"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    /// Origin latitude
    pub latitude: f64,
    /// Origin longitude
    pub longitude: f64,
    /// Radius in kilometers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<f64>,
    /// Nearest-k cardinality
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<usize>,
    /// Filter object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    /// `distance` or a field path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Result cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Travel mode for duration estimates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TravelMode>,
    /// Departure hour, defaults to [`DEFAULT_DEPARTURE_HOUR`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<u8>,
    /// Coordinate field names
    #[serde(flatten)]
    pub fields: FieldCoordinates,
}

impl SearchRequest {
    /// Builds the query and the coordinate source it names.
    ///
    /// # Errors
    /// Fails when the filter or the sort field cannot be parsed.
    pub fn into_parts(self) -> Result<(SearchQuery, FieldCoordinates)> {
        let filter = self.filter.as_ref().map(PredicateSet::from_json).transpose()?;
        let sort = SortSpec::parse(self.sort_by.as_deref())?;

        let query = SearchQuery {
            latitude: self.latitude,
            longitude: self.longitude,
            radius_km: self.radius_km,
            k: self.k,
            filter,
            sort,
            limit: self.limit,
            travel: self.mode.map(|mode| TravelOptions {
                mode,
                hour: self.hour.unwrap_or(DEFAULT_DEPARTURE_HOUR),
            }),
        };
        Ok((query, self.fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_spec_parse() {
        assert_eq!(SortSpec::parse(None).unwrap(), SortSpec::Distance);
        assert_eq!(SortSpec::parse(Some("distance")).unwrap(), SortSpec::Distance);
        assert_eq!(SortSpec::parse(Some("distance_km")).unwrap(), SortSpec::Distance);
        assert_eq!(
            SortSpec::parse(Some("stats.rating")).unwrap(),
            SortSpec::FieldDescending(FieldPath::parse("stats.rating").unwrap())
        );
        assert!(SortSpec::parse(Some("")).is_err());
    }

    #[test]
    fn test_request_into_parts() {
        let request: SearchRequest = serde_json::from_value(json!({
            "latitude": 24.7,
            "longitude": 46.6,
            "k": 3,
            "filter": {"open": true},
            "sort_by": "rating",
            "mode": "walking",
            "latitude_field": "lat",
            "longitude_field": "lng",
            "location_key": "place"
        }))
        .unwrap();

        let (query, fields) = request.into_parts().unwrap();
        assert_eq!(query.k, Some(3));
        assert_eq!(query.radius_km, None);
        assert_eq!(query.filter.unwrap().len(), 1);
        assert!(matches!(query.sort, SortSpec::FieldDescending(_)));
        assert_eq!(
            query.travel,
            Some(TravelOptions { mode: TravelMode::Walking, hour: DEFAULT_DEPARTURE_HOUR })
        );
        assert_eq!(fields, FieldCoordinates::new("lat", "lng").nested("place"));
    }

    #[test]
    fn test_request_bad_filter() {
        let request = SearchRequest { filter: Some(json!({"a": {"$like": "x"}})), ..Default::default() };
        assert!(request.into_parts().is_err());
    }
}
