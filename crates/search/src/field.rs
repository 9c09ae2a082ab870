//! Dotted field paths and lookup over JSON records.

use crate::PredicateError;
use serde_json::Value;
use std::fmt;

/// Name of the computed distance field exposed to filters and sorting.
pub const DISTANCE_FIELD: &str = "distance_km";

/// A field reference such as `price` or `location.city`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path. Empty paths and empty segments (`a..b`) are rejected.
    pub fn parse(dotted: &str) -> Result<Self, PredicateError> {
        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PredicateError::EmptyFieldPath(dotted.to_string()));
        }
        Ok(Self { segments })
    }

    /// Path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True for the single-segment path `distance_km`.
    pub fn is_distance(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == DISTANCE_FIELD
    }

    /// Walks `record` along this path.
    pub fn resolve<'a>(&self, record: &'a Value) -> Lookup<'a> {
        let (last, parents) = match self.segments.split_last() {
            Some(split) => split,
            None => return Lookup::Missing,
        };

        let mut current = record;
        for segment in parents {
            match current.as_object().and_then(|map| map.get(segment)) {
                Some(next) => current = next,
                None => return Lookup::Unreachable,
            }
        }

        match current.as_object() {
            Some(map) => map.get(last).map_or(Lookup::Missing, Lookup::Value),
            None => Lookup::Unreachable,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl std::str::FromStr for FieldPath {
    type Err = PredicateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Outcome of resolving a [`FieldPath`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// Value stored in the record
    Value(&'a Value),
    /// Computed number that is not stored in the record
    Number(f64),
    /// Final segment absent from an otherwise reachable object
    Missing,
    /// An intermediate segment is absent or not an object
    Unreachable,
}

impl Lookup<'_> {
    /// Numeric view used for ordering. Absent leaves count as zero.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Lookup::Value(value) => value.as_f64(),
            Lookup::Number(n) => Some(*n),
            Lookup::Missing => Some(0.0),
            Lookup::Unreachable => None,
        }
    }

    /// True when the path resolved to something present.
    pub fn is_present(&self) -> bool {
        matches!(self, Lookup::Value(_) | Lookup::Number(_))
    }
}

/// Anything a [`FieldPath`] can be resolved against.
pub trait FieldSource {
    /// Resolves `path` against this source.
    fn lookup(&self, path: &FieldPath) -> Lookup<'_>;
}

impl FieldSource for Value {
    fn lookup(&self, path: &FieldPath) -> Lookup<'_> {
        path.resolve(self)
    }
}

/// A record seen together with its computed distance.
///
/// `distance_km` shadows any field of the same name stored in the record.
#[derive(Debug, Clone, Copy)]
pub struct WithDistance<'a> {
    /// Underlying record
    pub record: &'a Value,
    /// Distance from the query origin, already rounded
    pub distance_km: f64,
}

impl FieldSource for WithDistance<'_> {
    fn lookup(&self, path: &FieldPath) -> Lookup<'_> {
        if path.is_distance() {
            Lookup::Number(self.distance_km)
        } else {
            path.resolve(self.record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(path("location.city").segments(), ["location", "city"]);
        assert_eq!(path("location.city").to_string(), "location.city");
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse(".a").is_err());
    }

    #[test]
    fn test_resolve_nested() {
        let record = json!({"location": {"city": "Riyadh"}, "price": 10});
        assert_eq!(path("location.city").resolve(&record), Lookup::Value(&json!("Riyadh")));
        assert_eq!(path("price").resolve(&record), Lookup::Value(&json!(10)));
    }

    #[test]
    fn test_missing_vs_unreachable() {
        let record = json!({"location": {"city": "Riyadh"}, "tags": "x"});
        assert_eq!(path("rating").resolve(&record), Lookup::Missing);
        assert_eq!(path("location.zip").resolve(&record), Lookup::Missing);
        assert_eq!(path("owner.name").resolve(&record), Lookup::Unreachable);
        assert_eq!(path("tags.first").resolve(&record), Lookup::Unreachable);
    }

    #[test]
    fn test_distance_overlay() {
        let record = json!({"distance_km": 999.0, "name": "a"});
        let view = WithDistance { record: &record, distance_km: 1.25 };
        assert_eq!(view.lookup(&path("distance_km")), Lookup::Number(1.25));
        assert_eq!(view.lookup(&path("name")), Lookup::Value(&json!("a")));
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Lookup::Value(&json!(4.5)).as_number(), Some(4.5));
        assert_eq!(Lookup::Value(&json!("4.5")).as_number(), None);
        assert_eq!(Lookup::Missing.as_number(), Some(0.0));
        assert_eq!(Lookup::Unreachable.as_number(), None);
    }
}
