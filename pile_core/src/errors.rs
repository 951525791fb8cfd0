//! # Error Types
//!
//! Structured error types for pile_core. Malformed inputs are rejected with
//! one of these variants as soon as they are detected.
//!
//! Numerical non-convergence is *not* an error: local and global solvers
//! return flagged best-effort results (see [`crate::calculations::root_finder::RootStatus`]
//! and [`crate::calculations::equilibrium::EquilibriumStatus`]).
//!
//! ## Example
//!
//! ```rust
//! use pile_core::errors::{CalcError, CalcResult};
//!
//! fn validate_diameter(diameter: f64) -> CalcResult<()> {
//!     if diameter <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "bearing_diameter",
//!             diameter.to_string(),
//!             "Diameter must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pile_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for pile analysis operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, inconsistent geometry, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A mobilization law was given a zero slope
    #[error("Invalid stiffness for {law}: {parameter} = {value}")]
    InvalidStiffness {
        law: String,
        parameter: String,
        value: f64,
    },

    /// A load sweep was requested with an empty range
    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidStiffness error
    pub fn invalid_stiffness(law: impl Into<String>, parameter: impl Into<String>, value: f64) -> Self {
        CalcError::InvalidStiffness {
            law: law.into(),
            parameter: parameter.into(),
            value,
        }
    }

    /// Create an InvalidRange error
    pub fn invalid_range(min: f64, max: f64) -> Self {
        CalcError::InvalidRange { min, max }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidStiffness { .. } => "INVALID_STIFFNESS",
            CalcError::InvalidRange { .. } => "INVALID_RANGE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}
