//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only deterministic, request-caused failures live here. Infrastructure
/// failures (database, IO) belong to the infra crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more fields failed their constraint checks.
    #[error("validation failed: {0}")]
    Validation(Violations),

    /// A record with the same identifier already exists.
    #[error("already exists")]
    AlreadyExists,

    /// The requested record does not exist.
    #[error("not found")]
    NotFound,
}

impl DomainError {
    /// Single-field validation failure.
    pub fn invalid_field(field: &str, msg: impl Into<String>) -> Self {
        let mut v = Violations::new();
        v.push(field, msg);
        Self::Validation(v)
    }

    /// Validation failure with a message not tied to a field.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(Violations::from_messages([msg.into()]))
    }
}

/// Accumulated per-field constraint violations.
///
/// Messages are human-readable, formatted as `"<field>: <message>"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_messages(messages: impl IntoIterator<Item = String>) -> Self {
        Self(messages.into_iter().collect())
    }

    pub fn push(&mut self, field: &str, msg: impl Into<String>) {
        self.0.push(format!("{field}: {}", msg.into()));
    }

    /// Absorb the messages of a nested validation error.
    pub fn extend(&mut self, other: Violations) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }

    /// `Ok(value)` when nothing was recorded, otherwise a validation error.
    pub fn into_result<T>(self, value: T) -> DomainResult<T> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl core::fmt::Display for Violations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_violations_pass_value_through() {
        assert_eq!(Violations::new().into_result(7), Ok(7));
    }

    #[test]
    fn recorded_violations_become_validation_error() {
        let mut v = Violations::new();
        v.push("name", "must not be empty");
        v.push("price", "must be greater than or equal to 0");

        let err = v.into_result(()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: name: must not be empty; price: must be greater than or equal to 0"
        );
    }
}
