//! Error types for the search crate.

use nearby_travel::TravelError;
use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that fail a whole query.
///
/// Per-entity data problems (missing or out-of-range coordinates) never surface
/// here; those entities are logged and skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Query origin outside `[-90, 90] x [-180, 180]`
    #[error("Invalid origin coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// Supplied latitude
        latitude: f64,
        /// Supplied longitude
        longitude: f64,
    },

    /// Radius that is zero, negative or not finite
    #[error("Invalid radius: {0} km (must be positive)")]
    InvalidRadius(f64),

    /// `k` of zero
    #[error("Invalid k: {0} (must be positive)")]
    InvalidK(usize),

    /// Filter expression could not be parsed
    #[error("Invalid filter: {0}")]
    InvalidPredicate(#[from] PredicateError),

    /// Engine configuration out of range
    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),

    /// Travel-time options rejected by the estimator
    #[error(transparent)]
    Travel(#[from] TravelError),
}

/// Errors raised while parsing a filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    /// Operator name not in the supported set
    #[error("unknown operator '{operator}' on field '{field}'")]
    UnknownOperator {
        /// Field the operator was attached to
        field: String,
        /// Operator as written
        operator: String,
    },

    /// Filter root is not an object, or a field carries an empty operator map
    #[error("{0}")]
    Malformed(String),

    /// Empty field name or empty path segment
    #[error("empty field path in '{0}'")]
    EmptyFieldPath(String),
}

/// Error code for integration with nearby-core error handling.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Bad origin
    InvalidCoordinate = 11001,
    /// Bad radius
    InvalidRadius = 11002,
    /// Bad k
    InvalidK = 11003,
    /// Bad filter
    InvalidPredicate = 11004,
    /// Bad configuration
    InvalidConfig = 11005,
    /// Travel estimation failure
    Travel = 11006,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::InvalidCoordinate { .. } => SearchErrorCode::InvalidCoordinate,
            SearchError::InvalidRadius(_) => SearchErrorCode::InvalidRadius,
            SearchError::InvalidK(_) => SearchErrorCode::InvalidK,
            SearchError::InvalidPredicate(_) => SearchErrorCode::InvalidPredicate,
            SearchError::InvalidConfig(_) => SearchErrorCode::InvalidConfig,
            SearchError::Travel(_) => SearchErrorCode::Travel,
        }
    }
}
