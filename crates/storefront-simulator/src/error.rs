//! Storefront simulator — error types.

use storefront_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the simulator binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable holds an invalid value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A domain operation failed while building events.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = AppError::Config("SIMULATION_EVENTS must be a number".into());

        assert_eq!(
            err.to_string(),
            "configuration error: SIMULATION_EVENTS must be a number"
        );
    }

    #[test]
    fn test_domain_error_converts() {
        let err: AppError = DomainError::Validation("order_id must not be empty".into()).into();

        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
    }
}
