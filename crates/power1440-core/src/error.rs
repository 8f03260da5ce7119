//! Core error types for power1440-core.
//!
//! Nothing in the planner fails transiently: there is no network and the
//! only I/O is the configuration file. The hierarchy is therefore small,
//! but follows the same thiserror layout as the rest of the workspace.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for power1440-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Task admission was refused by the ledger
    #[error("Task rejected: {0}")]
    Admission(#[from] AdmissionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The three zone budgets do not cover the whole day
    #[error("Zone budgets must sum to {expected} minutes, got {actual}")]
    DayNotCovered { expected: u32, actual: u64 },

    /// A zone name that does not match any zone
    #[error("Unknown zone '{0}' (expected sleep, livelihood or on-time)")]
    UnknownZone(String),
}

/// Reasons the task ledger refuses a new task.
///
/// Only [`AdmissionError::BudgetExceeded`] is surfaced to the user as a
/// blocking notice; the other two mean the add-task form is incomplete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("task name must not be empty")]
    EmptyName,

    #[error("task duration must be greater than zero")]
    ZeroDuration,

    #[error(
        "Total task duration exceeds On-Time allocation! \
         ({committed} committed + {requested} requested > {budget} available)"
    )]
    BudgetExceeded {
        requested: u32,
        committed: u64,
        budget: u32,
    },
}

impl AdmissionError {
    /// Text shown in the blocking notice, if this rejection warrants one.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            AdmissionError::BudgetExceeded { .. } => {
                Some("Total task duration exceeds On-Time allocation!")
            }
            AdmissionError::EmptyName | AdmissionError::ZeroDuration => None,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_budget_overflow_carries_a_notice() {
        let overflow = AdmissionError::BudgetExceeded {
            requested: 21,
            committed: 400,
            budget: 420,
        };
        assert_eq!(
            overflow.notice(),
            Some("Total task duration exceeds On-Time allocation!")
        );
        assert_eq!(AdmissionError::EmptyName.notice(), None);
        assert_eq!(AdmissionError::ZeroDuration.notice(), None);
    }

    #[test]
    fn admission_error_converts_into_core_error() {
        let err: CoreError = AdmissionError::ZeroDuration.into();
        assert!(matches!(err, CoreError::Admission(AdmissionError::ZeroDuration)));
        assert!(err.to_string().contains("greater than zero"));
    }
}
