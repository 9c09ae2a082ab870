//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude or longitude outside the valid range, or not finite
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },

    /// Invalid WKT format
    #[error("Invalid WKT format: {0}")]
    InvalidWkt(String),

    /// Malformed encoded polyline
    #[error("Invalid polyline: {0}")]
    InvalidPolyline(String),
}

/// Error code for integration with nearby-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid coordinate values
    InvalidCoordinate = 10001,
    /// Invalid WKT format
    InvalidWkt = 10002,
    /// Invalid encoded polyline
    InvalidPolyline = 10003,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidCoordinate { .. } => GeoErrorCode::InvalidCoordinate,
            GeoError::InvalidWkt(_) => GeoErrorCode::InvalidWkt,
            GeoError::InvalidPolyline(_) => GeoErrorCode::InvalidPolyline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = GeoError::InvalidCoordinate { latitude: 91.0, longitude: 0.0 };
        assert_eq!(err.code() as u32, 10001);
        assert_eq!(GeoError::InvalidWkt("x".into()).code() as u32, 10002);
    }

    #[test]
    fn test_display_includes_values() {
        let err = GeoError::InvalidCoordinate { latitude: 91.0, longitude: 12.5 };
        let message = err.to_string();
        assert!(message.contains("91"));
        assert!(message.contains("12.5"));
    }
}
