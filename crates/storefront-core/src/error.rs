//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A value object or event invariant was violated during construction.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required argument was absent or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A record with the same business identifier already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A record could not be found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A handler callback failed while processing an event.
    #[error("handler {handler} failed: {reason}")]
    Handler {
        /// Name of the failing handler.
        handler: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` for the recoverable duplicate-key case.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_message_names_handler() {
        let err = DomainError::Handler {
            handler: "audit".to_owned(),
            reason: "disk full".to_owned(),
        };

        assert_eq!(err.to_string(), "handler audit failed: disk full");
    }

    #[test]
    fn test_is_already_exists_only_matches_duplicate_key() {
        assert!(DomainError::AlreadyExists("order-1".into()).is_already_exists());
        assert!(!DomainError::NotFound("order-1".into()).is_already_exists());
    }
}
