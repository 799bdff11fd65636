//! # Error Types
//!
//! Structured error types for estimate_core. Each variant carries enough
//! context to understand and fix the problem programmatically, and every
//! error is serializable so frontends can relay it verbatim.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::errors::{EstimateError, EstimateResult};
//!
//! fn validate_length(length_ft: f64) -> EstimateResult<()> {
//!     if length_ft <= 0.0 {
//!         return Err(EstimateError::invalid_input(
//!             "length_ft",
//!             length_ft.to_string(),
//!             "Length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for estimate_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for estimation operations.
///
/// Errors are per-request: none of them is fatal to the process, and none
/// leaves the static rate/coefficient tables in a modified state.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// An input value is invalid (non-positive dimension, out-of-range wastage)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The requested construction type has no coefficient profile
    #[error("Unknown construction type: {name}")]
    UnknownConstructionType { name: String },

    /// Material has no rate table entry
    #[error("No rate entry for material: {material}")]
    RateNotFound { material: String },

    /// JSON/CSV serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Data-file I/O error (rate or coefficient table loading, report export)
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },
}

impl EstimateError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownConstructionType error
    pub fn unknown_construction_type(name: impl Into<String>) -> Self {
        EstimateError::UnknownConstructionType { name: name.into() }
    }

    /// Create a RateNotFound error
    pub fn rate_not_found(material: impl Into<String>) -> Self {
        EstimateError::RateNotFound {
            material: material.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
            EstimateError::UnknownConstructionType { .. } => "UNKNOWN_CONSTRUCTION_TYPE",
            EstimateError::RateNotFound { .. } => "RATE_NOT_FOUND",
            EstimateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EstimateError::FileError { .. } => "FILE_ERROR",
        }
    }
}

impl From<serde_json::Error> for EstimateError {
    fn from(err: serde_json::Error) -> Self {
        EstimateError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = EstimateError::invalid_input("width_ft", "-5", "Width must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: EstimateError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EstimateError::unknown_construction_type("Mud Hut").error_code(),
            "UNKNOWN_CONSTRUCTION_TYPE"
        );
        assert_eq!(
            EstimateError::rate_not_found("cement").error_code(),
            "RATE_NOT_FOUND"
        );
    }

    #[test]
    fn test_display_includes_context() {
        let error = EstimateError::invalid_input("wastage_percent", "21", "Must be 0-20");
        let text = error.to_string();
        assert!(text.contains("wastage_percent"));
        assert!(text.contains("21"));
    }
}
