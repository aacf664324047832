//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures (validation and identifiers).
/// Storage concerns, including duplicate names and missing records, belong to
/// the infra and api layers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (missing field, failed cast, empty name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was malformed (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Validation error for a required field that was not supplied.
    pub fn required(path: &str) -> Self {
        Self::Validation(format!("Path `{path}` is required."))
    }

    /// Validation error for a value that could not be coerced to the field type.
    pub fn cast(kind: &str, value: &serde_json::Value, path: &str) -> Self {
        let shown = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self::Validation(format!(
            "Cast to {kind} failed for value \"{shown}\" at path \"{path}\""
        ))
    }
}
