//! Application-level error handling with codes, context and recovery suggestions
//!
//! Library crates raise their own `thiserror` enums; this module folds them into
//! one coded [`Error`] for the command line:
//! - Stable error codes for programmatic handling
//! - Optional context and recovery suggestions
//! - Serializable error reports for `--json` output
//! - Process exit codes

use nearby_geo::GeoError;
use nearby_search::{PredicateError, SearchError};
use nearby_travel::TravelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,

    // Query input errors (4xxx)
    InvalidInput = 4000,
    InvalidCoordinate = 4001,
    InvalidRadius = 4002,
    InvalidK = 4003,
    InvalidFilter = 4004,
    InvalidHour = 4005,
    UnknownTravelMode = 4006,
    InvalidGeometry = 4007,

    // Entity data errors (5xxx)
    DataError = 5000,
    MalformedEntities = 5001,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Input",
            5 => "Data",
            _ => "Unknown",
        }
    }

    /// Process exit code for errors in this category
    pub fn exit_code(&self) -> i32 {
        match self.code() / 1000 {
            2 => exit_codes::IO_ERROR,
            3 => exit_codes::CONFIG_ERROR,
            4 | 5 => exit_codes::INVALID_INPUT,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Exit code the CLI should terminate with
    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    /// Generic input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Entity file that is not a JSON array of records
    pub fn malformed_entities(path: impl AsRef<std::path::Path>, detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MalformedEntities,
            format!("Cannot read entities from {}: {}", path.as_ref().display(), detail.into()),
        )
        .with_suggestion("Entities must be a JSON array of objects")
    }

    /// Missing file
    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the file exists and you have read permissions")
    }

    /// Generic configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Explicitly requested configuration file is missing
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .nearby.toml file or pass --config with an existing path")
    }

    /// Configuration value out of range
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigValidationError, message)
    }
}

/// Serializable error report for logging and `--json` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const INVALID_INPUT: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const IO_ERROR: i32 = 4;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::InvalidInput, format!("JSON parse error: {}", err)).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

impl From<GeoError> for Error {
    fn from(err: GeoError) -> Self {
        let code = match err {
            GeoError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            GeoError::InvalidWkt(_) | GeoError::InvalidPolyline(_) => ErrorCode::InvalidGeometry,
        };
        let origin = err.code() as u32;
        Error::new(code, err.to_string())
            .with_context(format!("geo error {origin}"))
            .with_source(err)
    }
}

impl From<TravelError> for Error {
    fn from(err: TravelError) -> Self {
        let code = match &err {
            TravelError::InvalidHour(_) => ErrorCode::InvalidHour,
            TravelError::UnknownMode(_) => ErrorCode::UnknownTravelMode,
            TravelError::InvalidSpeed { .. } => ErrorCode::ConfigValidationError,
            TravelError::InvalidDistance(_) => ErrorCode::InvalidInput,
            TravelError::Geo(GeoError::InvalidCoordinate { .. }) => ErrorCode::InvalidCoordinate,
            TravelError::Geo(_) => ErrorCode::InvalidGeometry,
        };
        let origin = err.code() as u32;
        let error = Error::new(code, err.to_string()).with_context(format!("travel error {origin}"));
        let error = match code {
            ErrorCode::UnknownTravelMode => {
                error.with_suggestion("Use one of: walking, cycling, driving, transit")
            }
            ErrorCode::InvalidHour => error.with_suggestion("Hours run from 0 to 23"),
            _ => error,
        };
        error.with_source(err)
    }
}

impl From<SearchError> for Error {
    fn from(err: SearchError) -> Self {
        if let SearchError::Travel(inner) = err {
            return inner.into();
        }

        let code = match &err {
            SearchError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            SearchError::InvalidRadius(_) => ErrorCode::InvalidRadius,
            SearchError::InvalidK(_) => ErrorCode::InvalidK,
            SearchError::InvalidPredicate(_) => ErrorCode::InvalidFilter,
            SearchError::InvalidConfig(_) => ErrorCode::ConfigValidationError,
            SearchError::Travel(_) => ErrorCode::InvalidInput,
        };
        let origin = err.code() as u32;
        let error = Error::new(code, err.to_string()).with_context(format!("search error {origin}"));
        let error = match &err {
            SearchError::InvalidPredicate(PredicateError::UnknownOperator { .. }) => error
                .with_suggestion("Supported operators: $eq, $ne, $gt, $gte, $lt, $lte, $in, $nin"),
            _ => error,
        };
        error.with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}
