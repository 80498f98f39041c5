//! Unified error types for the domain layer
//!
//! Provides a common error type that can be used across all domain operations,
//! enabling consistent error handling without forcing adapters to use String or anyhow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A request against an aggregate is malformed or out of range
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for malformed field values.
    ///
    /// Use this when a value object cannot be constructed:
    /// - Required fields are empty or missing
    /// - Values are outside allowed ranges
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Character name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates an invalid request error.
    ///
    /// Use this when an operation's preconditions are not met by the
    /// current aggregate state (bad die index, SP investment below 1, ...).
    /// No state is changed when this error is returned.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Returns true when the error should be reported as a client error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidRequest(_) | Self::Parse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("name cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: name cannot be empty");
    }

    #[test]
    fn test_invalid_request_error() {
        let err = DomainError::invalid_request("die index 3 out of range");
        assert!(matches!(err, DomainError::InvalidRequest(_)));
        assert_eq!(err.to_string(), "Invalid request: die index 3 out of range");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("SpEffectTier", "3");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("SpEffectTier"));
        assert!(!err.is_client_error());
    }
}
