//! Structured outcome of a single dispatch.

use storefront_core::error::DomainError;
use uuid::Uuid;

/// A handler callback that returned an error during dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// Name of the failing handler.
    pub handler: String,
    /// The error it returned.
    pub error: DomainError,
}

/// What happened when one event was dispatched.
///
/// Failures are collected here instead of being propagated to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// The dispatched event, or `None` when no event was supplied.
    pub event_id: Option<Uuid>,
    /// Event type name, empty when no event was supplied.
    pub event_type: &'static str,
    /// Handlers whose callback was invoked, in invocation order. Includes
    /// handlers that then failed.
    pub invoked: Vec<String>,
    /// Number of handlers without a matching capability.
    pub skipped: usize,
    /// Callbacks that returned an error.
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    /// Report for an absent event: nothing invoked, nothing failed.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if no callback failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of handlers whose callback was invoked.
    #[must_use]
    pub fn invoked_count(&self) -> usize {
        self.invoked.len()
    }

    /// Names of the failed handlers, in invocation order.
    #[must_use]
    pub fn failed_handlers(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.handler.as_str()).collect()
    }
}
