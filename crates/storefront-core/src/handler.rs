//! Handler capability model.
//!
//! Every event kind has exactly one capability trait. A handler opts into a
//! capability by implementing its trait and returning itself from the
//! matching probe on [`EventHandler`]. The probes are how an event finds
//! out, at runtime, whether a given handler understands it.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;

use crate::error::DomainError;
use crate::event::{EventMetadata, OrderPlaced, PaymentReceived, UserRegistered};

/// The declared ability to process one event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Handles `UserRegistered`.
    UserRegistered,
    /// Handles `OrderPlaced`.
    OrderPlaced,
    /// Handles `PaymentReceived`.
    PaymentReceived,
}

impl Capability {
    /// Every capability, in event-kind declaration order.
    pub const ALL: [Self; 3] = [Self::UserRegistered, Self::OrderPlaced, Self::PaymentReceived];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UserRegistered => "handles UserRegistered",
            Self::OrderPlaced => "handles OrderPlaced",
            Self::PaymentReceived => "handles PaymentReceived",
        };
        f.write_str(name)
    }
}

/// Outcome of offering one event to one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The handler has no capability for the event's kind.
    Skipped,
    /// The matching callback ran to completion.
    Completed,
    /// The matching callback returned an error.
    Failed(DomainError),
}

impl Delivery {
    /// Wraps the result of an invoked callback.
    #[must_use]
    pub fn from_result(result: Result<(), DomainError>) -> Self {
        match result {
            Ok(()) => Self::Completed,
            Err(err) => Self::Failed(err),
        }
    }

    /// Returns `true` if a callback was invoked, whether or not it succeeded.
    #[must_use]
    pub fn was_invoked(&self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

/// Runtime type access for handlers, used by the type-switch strategy.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any` so callers can downcast to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Capability: handles `UserRegistered`.
#[async_trait]
pub trait UserRegisteredHandler: Send + Sync {
    /// Processes a `UserRegistered` event.
    async fn on_user_registered(
        &self,
        metadata: &EventMetadata,
        event: &UserRegistered,
    ) -> Result<(), DomainError>;
}

/// Capability: handles `OrderPlaced`.
#[async_trait]
pub trait OrderPlacedHandler: Send + Sync {
    /// Processes an `OrderPlaced` event.
    async fn on_order_placed(
        &self,
        metadata: &EventMetadata,
        event: &OrderPlaced,
    ) -> Result<(), DomainError>;
}

/// Capability: handles `PaymentReceived`.
#[async_trait]
pub trait PaymentReceivedHandler: Send + Sync {
    /// Processes a `PaymentReceived` event.
    async fn on_payment_received(
        &self,
        metadata: &EventMetadata,
        event: &PaymentReceived,
    ) -> Result<(), DomainError>;
}

/// Base trait every registered handler implements.
///
/// The probe methods default to `None`; a handler overrides exactly the
/// ones for the capabilities it has.
pub trait EventHandler: AsAny + Send + Sync {
    /// Name used in diagnostics and dispatch reports.
    fn handler_name(&self) -> &str;

    /// Probe for the `UserRegistered` capability.
    fn as_user_registered(&self) -> Option<&dyn UserRegisteredHandler> {
        None
    }

    /// Probe for the `OrderPlaced` capability.
    fn as_order_placed(&self) -> Option<&dyn OrderPlacedHandler> {
        None
    }

    /// Probe for the `PaymentReceived` capability.
    fn as_payment_received(&self) -> Option<&dyn PaymentReceivedHandler> {
        None
    }

    /// Returns `true` if the handler declares `capability`.
    fn has_capability(&self, capability: Capability) -> bool {
        match capability {
            Capability::UserRegistered => self.as_user_registered().is_some(),
            Capability::OrderPlaced => self.as_order_placed().is_some(),
            Capability::PaymentReceived => self.as_payment_received().is_some(),
        }
    }

    /// The declared capability set, in event-kind declaration order.
    fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|capability| self.has_capability(*capability))
            .collect()
    }
}
