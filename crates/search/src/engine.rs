//! The proximity search pipeline.
//!
//! For each query:
//! 1. validate the origin, radius and `k`; default the radius when both are absent
//! 2. drop candidates outside the radius bounding box (optional, never changes results)
//! 3. compute great-circle distances, round them and apply the radius
//! 4. apply the attribute filter, with `distance_km` visible to it
//! 5. sort on the rounded distance or a field, keep the first `k`, then apply the cap
//! 6. attach travel-time estimates when requested

use crate::config::{SearchConfig, DEFAULT_RADIUS_KM};
use crate::field::{FieldSource, WithDistance};
use crate::predicate::PredicateSet;
use crate::query::{SearchQuery, SortSpec, TravelOptions};
use crate::source::CoordinateSource;
use crate::{Result, SearchError, SearchResult};
use nearby_geo::{haversine_distance_with_radius, BoundingBox, Coordinate};
use nearby_travel::TravelTimeEstimator;
use serde::Serialize;
use serde_json::Value;

/// Per-query counters, useful for tuning and the CLI `--stats` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Entities supplied
    pub candidates: usize,
    /// Skipped for lacking a usable coordinate
    pub unresolvable: usize,
    /// Rejected by the bounding box
    pub outside_bounding_box: usize,
    /// Rejected by the exact radius check
    pub outside_radius: usize,
    /// Rejected by the attribute filter
    pub filtered: usize,
    /// Passed every stage before sorting and truncation
    pub matched: usize,
    /// Returned to the caller
    pub returned: usize,
}

/// Validated form of a [`SearchQuery`].
struct Plan<'q> {
    origin: Coordinate,
    radius_km: Option<f64>,
    bounding_box: Option<BoundingBox>,
    k: Option<usize>,
    filter: Option<&'q PredicateSet>,
    cap: usize,
}

enum Outcome<'a> {
    Hit(Hit<'a>),
    Unresolvable,
    OutsideBoundingBox,
    OutsideRadius,
    Filtered,
}

struct Hit<'a> {
    entity: &'a Value,
    exact_km: f64,
    rounded_km: f64,
}

/// Runs proximity queries over caller-supplied entity slices.
///
/// The engine holds no entity data; every call works on the slice it is given
/// and returns borrowed results.
#[derive(Debug, Clone)]
pub struct SearchEngine<'p> {
    config: SearchConfig,
    estimator: TravelTimeEstimator<'p>,
}

impl Default for SearchEngine<'static> {
    fn default() -> Self {
        Self { config: SearchConfig::default(), estimator: TravelTimeEstimator::default() }
    }
}

impl SearchEngine<'static> {
    /// Creates an engine with the standard travel profile.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidConfig`] when `config` is out of range.
    pub fn new(config: SearchConfig) -> Result<Self> {
        Self::with_estimator(config, TravelTimeEstimator::default())
    }
}

impl<'p> SearchEngine<'p> {
    /// Creates an engine that estimates travel times with `estimator`.
    pub fn with_estimator(config: SearchConfig, estimator: TravelTimeEstimator<'p>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, estimator })
    }

    /// Active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs `query` over `entities`.
    ///
    /// # Errors
    /// Fails on an invalid origin, radius, `k` or travel hour. Entities without
    /// a usable coordinate are skipped, never reported as errors.
    ///
    /// # Example
    /// ```
    /// use nearby_search::{FieldCoordinates, SearchEngine, SearchQuery};
    /// use serde_json::json;
    ///
    /// let shops = vec![
    ///     json!({"name": "near", "latitude": 24.7140, "longitude": 46.6760}),
    ///     json!({"name": "far", "latitude": 25.5000, "longitude": 47.5000}),
    /// ];
    ///
    /// let engine = SearchEngine::default();
    /// let query = SearchQuery::at(24.7136, 46.6753).within_km(5.0);
    /// let results = engine.search(&query, &shops, &FieldCoordinates::default()).unwrap();
    ///
    /// assert_eq!(results.len(), 1);
    /// assert_eq!(results[0].entity["name"], "near");
    /// ```
    pub fn search<'a, S>(
        &self,
        query: &SearchQuery,
        entities: &'a [Value],
        source: &S,
    ) -> Result<Vec<SearchResult<&'a Value>>>
    where
        S: CoordinateSource + ?Sized,
    {
        self.search_with_stats(query, entities, source).map(|(results, _)| results)
    }

    /// Like [`search`](Self::search), also returning per-stage counters.
    pub fn search_with_stats<'a, S>(
        &self,
        query: &SearchQuery,
        entities: &'a [Value],
        source: &S,
    ) -> Result<(Vec<SearchResult<&'a Value>>, SearchStats)>
    where
        S: CoordinateSource + ?Sized,
    {
        let plan = self.plan(query)?;
        let outcomes = self.classify_all(&plan, entities, source);

        let mut stats = SearchStats { candidates: entities.len(), ..SearchStats::default() };
        let mut hits = Vec::new();
        for outcome in outcomes {
            match outcome {
                Outcome::Hit(hit) => hits.push(hit),
                Outcome::Unresolvable => stats.unresolvable += 1,
                Outcome::OutsideBoundingBox => stats.outside_bounding_box += 1,
                Outcome::OutsideRadius => stats.outside_radius += 1,
                Outcome::Filtered => stats.filtered += 1,
            }
        }
        stats.matched = hits.len();

        sort_hits(&mut hits, &query.sort);

        if let Some(k) = plan.k {
            hits.truncate(k);
        }
        hits.truncate(plan.cap);

        let results = hits
            .into_iter()
            .map(|hit| self.finish(hit, query.travel))
            .collect::<Result<Vec<_>>>()?;
        stats.returned = results.len();

        tracing::debug!(
            origin = %plan.origin,
            radius_km = ?plan.radius_km,
            k = ?plan.k,
            candidates = stats.candidates,
            unresolvable = stats.unresolvable,
            pruned = stats.outside_bounding_box,
            matched = stats.matched,
            returned = stats.returned,
            "Search complete"
        );

        Ok((results, stats))
    }

    /// Everything within `radius_km` of the origin, nearest first.
    pub fn within_radius<'a, S>(
        &self,
        origin: &Coordinate,
        radius_km: f64,
        entities: &'a [Value],
        source: &S,
    ) -> Result<Vec<SearchResult<&'a Value>>>
    where
        S: CoordinateSource + ?Sized,
    {
        self.search(&SearchQuery::around(origin).within_km(radius_km), entities, source)
    }

    /// The `k` entities closest to the origin, at any distance.
    pub fn nearest<'a, S>(
        &self,
        origin: &Coordinate,
        k: usize,
        entities: &'a [Value],
        source: &S,
    ) -> Result<Vec<SearchResult<&'a Value>>>
    where
        S: CoordinateSource + ?Sized,
    {
        self.search(&SearchQuery::around(origin).nearest(k), entities, source)
    }

    fn plan<'q>(&self, query: &'q SearchQuery) -> Result<Plan<'q>> {
        let origin = Coordinate::new(query.latitude, query.longitude).map_err(|_| {
            SearchError::InvalidCoordinate { latitude: query.latitude, longitude: query.longitude }
        })?;

        if let Some(radius) = query.radius_km {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(SearchError::InvalidRadius(radius));
            }
        }
        if query.k == Some(0) {
            return Err(SearchError::InvalidK(0));
        }
        if let Some(travel) = query.travel {
            // reject a bad hour before doing any work
            self.estimator.effective_speed_kmh(travel.mode, travel.hour)?;
        }

        let radius_km = match (query.radius_km, query.k) {
            (None, None) => Some(DEFAULT_RADIUS_KM),
            (radius, _) => radius,
        };

        // widened by half a rounding unit so the box never drops an entity whose
        // rounded distance lands exactly on the radius
        let bounding_box = match radius_km {
            Some(radius) if self.config.use_bounding_box_optimization => Some(
                BoundingBox::around_with_radius(
                    &origin,
                    radius + self.config.rounding_slack_km(),
                    self.config.earth_radius_km,
                ),
            ),
            _ => None,
        };

        let cap = query
            .limit
            .map_or(self.config.max_results, |limit| limit.min(self.config.max_results));

        Ok(Plan { origin, radius_km, bounding_box, k: query.k, filter: query.filter.as_ref(), cap })
    }

    fn classify_all<'a, S>(&self, plan: &Plan<'_>, entities: &'a [Value], source: &S) -> Vec<Outcome<'a>>
    where
        S: CoordinateSource + ?Sized,
    {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            entities
                .par_iter()
                .enumerate()
                .map(|(index, entity)| self.classify(plan, index, entity, source))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            entities
                .iter()
                .enumerate()
                .map(|(index, entity)| self.classify(plan, index, entity, source))
                .collect()
        }
    }

    #[inline]
    fn classify<'a, S>(&self, plan: &Plan<'_>, index: usize, entity: &'a Value, source: &S) -> Outcome<'a>
    where
        S: CoordinateSource + ?Sized,
    {
        let Some(position) = source.coordinate(entity) else {
            tracing::debug!(index, "Skipping entity without a resolvable coordinate");
            return Outcome::Unresolvable;
        };

        if let Some(bbox) = &plan.bounding_box {
            if !bbox.contains(&position) {
                return Outcome::OutsideBoundingBox;
            }
        }

        let exact_km = haversine_distance_with_radius(&plan.origin, &position, self.config.earth_radius_km);
        let rounded_km = self.config.round_distance(exact_km);
        if let Some(radius) = plan.radius_km {
            if rounded_km > radius {
                return Outcome::OutsideRadius;
            }
        }

        if let Some(filter) = plan.filter {
            if !filter.matches(&WithDistance { record: entity, distance_km: rounded_km }) {
                return Outcome::Filtered;
            }
        }

        Outcome::Hit(Hit { entity, exact_km, rounded_km })
    }

    fn finish<'a>(&self, hit: Hit<'a>, travel: Option<TravelOptions>) -> Result<SearchResult<&'a Value>> {
        let duration_minutes = travel
            .map(|t| self.estimator.estimate_minutes_for_distance(hit.exact_km, t.mode, t.hour))
            .transpose()?;

        Ok(SearchResult { entity: hit.entity, distance_km: hit.rounded_km, duration_minutes })
    }
}

/// Stable sort on reported (rounded) distances, so ties keep input order.
fn sort_hits(hits: &mut [Hit<'_>], sort: &SortSpec) {
    fn view<'h>(hit: &Hit<'h>) -> WithDistance<'h> {
        WithDistance { record: hit.entity, distance_km: hit.rounded_km }
    }

    match sort {
        SortSpec::Distance => hits.sort_by(|a, b| a.rounded_km.total_cmp(&b.rounded_km)),
        SortSpec::FieldDescending(path) => {
            let key = |hit: &Hit<'_>| view(hit).lookup(path).as_number().unwrap_or(0.0);

            if !hits.is_empty() && !hits.iter().any(|hit| view(hit).lookup(path).is_present()) {
                tracing::warn!(field = %path, "Sort field absent on every result; order falls back to input order");
            }

            hits.sort_by(|a, b| key(b).total_cmp(&key(a)));
        }
    }
}
