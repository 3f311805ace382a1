//! Configuration error types.

use std::fmt;

use thiserror::Error;

/// A single validation failure.
///
/// `field` is an option key, or the name of a cross-field rule such as
/// `adapter/jdbc_url options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: &'static str,
    message: String,
}

impl FieldError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// The field or rule this error is bound to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The full human-readable message, e.g. `username must be filled`.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors produced while turning raw options into pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// One or more options failed validation.
    ///
    /// The display form joins every message, in schema order, with `", "`.
    #[error("{}", join_messages(.errors))]
    InvalidConfiguration {
        /// Every violation, in schema order. Never empty.
        errors: Vec<FieldError>,
    },
}

impl ConfigError {
    /// The individual violations.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::InvalidConfiguration { errors } => errors,
        }
    }

    /// The aggregated message.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether a violation is recorded for `field`.
    #[must_use]
    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors().iter().any(|e| e.field == field)
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::message)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
