//! Attribute filters evaluated against candidate records.
//!
//! A filter is an AND of conditions. Each condition names a field (dotted paths
//! reach into nested objects), an operator and an operand:
//!
//! ```json
//! {
//!   "category": "cafe",
//!   "rating": {"$gte": 4},
//!   "location.city": {"$in": ["Riyadh", "Jeddah"]},
//!   "distance_km": {"$lt": 2}
//! }
//! ```
//!
//! A bare operand means equality. Operators may be written with or without a
//! leading `$` and in any case (`$gt`, `gt`, `Gt`). Unknown operators are
//! rejected when the filter is parsed.
//!
//! Evaluation rules:
//! - a missing leaf field reads as `null` for equality and membership, and as
//!   `0` for ordering comparisons
//! - a path whose intermediate segment is missing never matches
//! - numbers compare by value, so `18` equals `18.0`
//! - an ordering comparison on a non-number fails the condition

use crate::field::{FieldPath, FieldSource, Lookup};
use crate::PredicateError;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateOp {
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Member of the operand array
    In,
    /// Not a member of the operand array
    NotIn,
}

impl PredicateOp {
    /// Canonical name, as written after the `$`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PredicateOp::Eq => "eq",
            PredicateOp::Ne => "ne",
            PredicateOp::Gt => "gt",
            PredicateOp::Gte => "gte",
            PredicateOp::Lt => "lt",
            PredicateOp::Lte => "lte",
            PredicateOp::In => "in",
            PredicateOp::NotIn => "not_in",
        }
    }
}

impl fmt::Display for PredicateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.as_str())
    }
}

impl FromStr for PredicateOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix('$').unwrap_or(s).to_ascii_lowercase();
        match name.as_str() {
            "eq" => Ok(PredicateOp::Eq),
            "ne" | "neq" => Ok(PredicateOp::Ne),
            "gt" => Ok(PredicateOp::Gt),
            "gte" | "ge" => Ok(PredicateOp::Gte),
            "lt" => Ok(PredicateOp::Lt),
            "lte" | "le" => Ok(PredicateOp::Lte),
            "in" => Ok(PredicateOp::In),
            "nin" | "not_in" | "notin" => Ok(PredicateOp::NotIn),
            _ => Err(()),
        }
    }
}

/// One `field op operand` test.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Field under test
    pub field: FieldPath,
    /// Operator
    pub op: PredicateOp,
    /// Right-hand operand
    pub operand: Value,
}

impl Condition {
    /// Creates a condition.
    pub fn new(field: FieldPath, op: PredicateOp, operand: impl Into<Value>) -> Self {
        Self { field, op, operand: operand.into() }
    }

    /// Tests this condition against `source`.
    pub fn matches<S: FieldSource + ?Sized>(&self, source: &S) -> bool {
        let actual = source.lookup(&self.field);
        if actual == Lookup::Unreachable {
            return false;
        }

        match self.op {
            PredicateOp::Eq => equals(&actual, &self.operand),
            PredicateOp::Ne => !equals(&actual, &self.operand),
            PredicateOp::Gt => compare(&actual, &self.operand, |a, b| a > b),
            PredicateOp::Gte => compare(&actual, &self.operand, |a, b| a >= b),
            PredicateOp::Lt => compare(&actual, &self.operand, |a, b| a < b),
            PredicateOp::Lte => compare(&actual, &self.operand, |a, b| a <= b),
            PredicateOp::In => match self.operand.as_array() {
                Some(items) => items.iter().any(|item| equals(&actual, item)),
                None => false,
            },
            PredicateOp::NotIn => match self.operand.as_array() {
                Some(items) => !items.iter().any(|item| equals(&actual, item)),
                None => false,
            },
        }
    }
}

fn equals(actual: &Lookup<'_>, expected: &Value) -> bool {
    match actual {
        Lookup::Value(value) => json_equals(value, expected),
        Lookup::Number(n) => expected.as_f64() == Some(*n),
        Lookup::Missing => expected.is_null(),
        Lookup::Unreachable => false,
    }
}

fn json_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn compare(actual: &Lookup<'_>, operand: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (actual.as_number(), operand.as_f64()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// Conjunction of [`Condition`]s. An empty set matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    conditions: Vec<Condition>,
}

impl PredicateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition, builder style.
    ///
    /// # Example
    /// ```
    /// use nearby_search::{FieldPath, PredicateOp, PredicateSet};
    /// use serde_json::json;
    ///
    /// let filter = PredicateSet::new()
    ///     .with(FieldPath::parse("rating").unwrap(), PredicateOp::Gte, 4)
    ///     .with(FieldPath::parse("category").unwrap(), PredicateOp::Eq, "cafe");
    ///
    /// assert!(filter.matches(&json!({"rating": 4.5, "category": "cafe"})));
    /// assert!(!filter.matches(&json!({"rating": 3, "category": "cafe"})));
    /// ```
    pub fn with(mut self, field: FieldPath, op: PredicateOp, operand: impl Into<Value>) -> Self {
        self.conditions.push(Condition::new(field, op, operand));
        self
    }

    /// Parses a JSON filter object.
    ///
    /// # Errors
    /// Returns [`PredicateError`] for a non-object root, an empty field name,
    /// an empty operator map or an unknown operator.
    pub fn from_json(filter: &Value) -> Result<Self, PredicateError> {
        let fields = filter
            .as_object()
            .ok_or_else(|| PredicateError::Malformed(format!("filter must be an object, got {filter}")))?;

        let mut conditions = Vec::with_capacity(fields.len());
        for (key, spec) in fields {
            let field = FieldPath::parse(key)?;
            match spec {
                Value::Object(operators) => parse_operators(&field, operators, &mut conditions)?,
                operand => conditions.push(Condition::new(field, PredicateOp::Eq, operand.clone())),
            }
        }

        Ok(Self { conditions })
    }

    /// True when every condition holds.
    pub fn matches<S: FieldSource + ?Sized>(&self, source: &S) -> bool {
        self.conditions.iter().all(|condition| condition.matches(source))
    }

    /// The parsed conditions, in filter order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// True for the match-everything filter.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Parses `filter` and tests it against `record` in one step.
///
/// # Errors
/// Same as [`PredicateSet::from_json`].
pub fn evaluate(filter: &Value, record: &Value) -> Result<bool, PredicateError> {
    Ok(PredicateSet::from_json(filter)?.matches(record))
}

fn parse_operators(
    field: &FieldPath,
    operators: &Map<String, Value>,
    out: &mut Vec<Condition>,
) -> Result<(), PredicateError> {
    if operators.is_empty() {
        return Err(PredicateError::Malformed(format!("empty operator map for field '{field}'")));
    }

    for (name, operand) in operators {
        let op = name.parse::<PredicateOp>().map_err(|_| PredicateError::UnknownOperator {
            field: field.to_string(),
            operator: name.clone(),
        })?;
        out.push(Condition::new(field.clone(), op, operand.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::WithDistance;
    use serde_json::json;

    fn filter(value: Value) -> PredicateSet {
        PredicateSet::from_json(&value).unwrap()
    }

    #[test]
    fn test_operator_spellings() {
        for spelling in ["$gt", "gt", "Gt", "GT"] {
            assert_eq!(spelling.parse::<PredicateOp>(), Ok(PredicateOp::Gt));
        }
        assert_eq!("$nin".parse::<PredicateOp>(), Ok(PredicateOp::NotIn));
        assert_eq!("not_in".parse::<PredicateOp>(), Ok(PredicateOp::NotIn));
        assert!("$regex".parse::<PredicateOp>().is_err());
    }

    #[test]
    fn test_gt_excludes_boundary() {
        let adults = filter(json!({"age": {"Gt": 18}}));
        assert!(!adults.matches(&json!({"age": 18})));
        assert!(adults.matches(&json!({"age": 25})));
        assert!(!adults.matches(&json!({"age": 17})));
    }

    #[test]
    fn test_bare_value_is_equality() {
        let cafes = filter(json!({"category": "cafe"}));
        assert!(cafes.matches(&json!({"category": "cafe"})));
        assert!(!cafes.matches(&json!({"category": "bakery"})));
        assert!(!cafes.matches(&json!({})));
    }

    #[test]
    fn test_numeric_equality_by_value() {
        let f = filter(json!({"age": 18.0}));
        assert!(f.matches(&json!({"age": 18})));
    }

    #[test]
    fn test_missing_field() {
        // missing reads as null for equality
        assert!(filter(json!({"deleted_at": null})).matches(&json!({"id": 1})));
        assert!(filter(json!({"deleted_at": {"$ne": "x"}})).matches(&json!({"id": 1})));
        // and as zero for ordering
        assert!(filter(json!({"stock": {"$lt": 1}})).matches(&json!({"id": 1})));
        assert!(!filter(json!({"stock": {"$gt": 0}})).matches(&json!({"id": 1})));
    }

    #[test]
    fn test_unreachable_path_never_matches() {
        let record = json!({"id": 1});
        assert!(!filter(json!({"owner.name": {"$ne": "x"}})).matches(&record));
        assert!(!filter(json!({"owner.name": {"$nin": ["x"]}})).matches(&record));
        assert!(!filter(json!({"owner.age": {"$lt": 5}})).matches(&record));
    }

    #[test]
    fn test_nested_in() {
        let f = filter(json!({"location.city": {"$in": ["Riyadh", "Jeddah"]}}));
        assert!(f.matches(&json!({"location": {"city": "Jeddah"}})));
        assert!(!f.matches(&json!({"location": {"city": "Dammam"}})));
    }

    #[test]
    fn test_not_in() {
        let f = filter(json!({"status": {"$nin": ["closed", "hidden"]}}));
        assert!(f.matches(&json!({"status": "open"})));
        assert!(!f.matches(&json!({"status": "closed"})));
        // type mismatch fails the condition
        assert!(!filter(json!({"status": {"$nin": "closed"}})).matches(&json!({"status": "open"})));
    }

    #[test]
    fn test_ordering_on_strings_fails() {
        assert!(!filter(json!({"name": {"$gt": 1}})).matches(&json!({"name": "zed"})));
        assert!(!filter(json!({"rating": {"$gt": "a"}})).matches(&json!({"rating": 5})));
    }

    #[test]
    fn test_and_combination() {
        let f = filter(json!({"rating": {"$gte": 4, "$lt": 5}, "open": true}));
        assert_eq!(f.len(), 3);
        assert!(f.matches(&json!({"rating": 4.2, "open": true})));
        assert!(!f.matches(&json!({"rating": 5, "open": true})));
        assert!(!f.matches(&json!({"rating": 4.2, "open": false})));
    }

    #[test]
    fn test_distance_field() {
        let f = filter(json!({"distance_km": {"$lte": 2}}));
        let record = json!({"name": "a"});
        assert!(f.matches(&WithDistance { record: &record, distance_km: 1.99 }));
        assert!(!f.matches(&WithDistance { record: &record, distance_km: 2.01 }));
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let f = filter(json!({}));
        assert!(f.is_empty());
        assert!(f.matches(&json!({"anything": 1})));
    }

    #[test]
    fn test_evaluate_scenario() {
        let adults = json!({"age": {"Gt": 18}});
        assert!(!evaluate(&adults, &json!({"age": 17})).unwrap());
        assert!(evaluate(&adults, &json!({"age": 19})).unwrap());
        assert!(!evaluate(&adults, &json!({"name": "no age"})).unwrap());
        assert!(evaluate(&json!({"age": {"$like": 1}}), &json!({})).is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            PredicateSet::from_json(&json!({"age": {"$between": [1, 2]}})),
            Err(PredicateError::UnknownOperator { .. })
        ));
        assert!(matches!(PredicateSet::from_json(&json!([1])), Err(PredicateError::Malformed(_))));
        assert!(matches!(PredicateSet::from_json(&json!({"age": {}})), Err(PredicateError::Malformed(_))));
        assert!(matches!(PredicateSet::from_json(&json!({"": 1})), Err(PredicateError::EmptyFieldPath(_))));
    }
}
