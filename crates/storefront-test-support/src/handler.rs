//! Test handlers — configurable `EventHandler` implementations that record
//! every invocation into a shared trace.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use storefront_core::error::DomainError;
use storefront_core::event::{
    EventMetadata, ORDER_PLACED_EVENT_TYPE, OrderPlaced, PAYMENT_RECEIVED_EVENT_TYPE,
    PaymentReceived, USER_REGISTERED_EVENT_TYPE, UserRegistered,
};
use storefront_core::handler::{
    Capability, EventHandler, OrderPlacedHandler, PaymentReceivedHandler, UserRegisteredHandler,
};

/// Shared, ordered log of `"<handler>:<event type>"` entries.
#[derive(Debug, Clone, Default)]
pub struct InvocationTrace(Arc<Mutex<Vec<String>>>);

impl InvocationTrace {
    /// Creates an empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one invocation.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn record(&self, handler: &str, event_type: &str) {
        self.0.lock().unwrap().push(format!("{handler}:{event_type}"));
    }

    /// Returns every entry in invocation order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Returns only the handler names, in invocation order.
    pub fn handlers(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|entry| entry.split(':').next().unwrap_or_default().to_owned())
            .collect()
    }
}

/// A handler with a configurable capability set that records each callback
/// into an [`InvocationTrace`]. Optionally fails every callback after
/// recording it.
#[derive(Debug)]
pub struct TraceHandler {
    name: String,
    capabilities: Vec<Capability>,
    trace: InvocationTrace,
    failing: bool,
}

impl TraceHandler {
    /// Creates a handler declaring exactly `capabilities`.
    #[must_use]
    pub fn new(name: &str, capabilities: &[Capability], trace: &InvocationTrace) -> Self {
        Self {
            name: name.to_owned(),
            capabilities: capabilities.to_vec(),
            trace: trace.clone(),
            failing: false,
        }
    }

    /// Creates a handler declaring every capability.
    #[must_use]
    pub fn all(name: &str, trace: &InvocationTrace) -> Self {
        Self::new(name, &Capability::ALL, trace)
    }

    /// Makes every callback return `DomainError::Handler` after recording.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn invoke(&self, event_type: &str) -> Result<(), DomainError> {
        self.trace.record(&self.name, event_type);
        if self.failing {
            return Err(DomainError::Handler {
                handler: self.name.clone(),
                reason: format!("scripted failure on {event_type}"),
            });
        }
        Ok(())
    }

    fn declares(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

#[async_trait]
impl UserRegisteredHandler for TraceHandler {
    async fn on_user_registered(
        &self,
        _metadata: &EventMetadata,
        _event: &UserRegistered,
    ) -> Result<(), DomainError> {
        self.invoke(USER_REGISTERED_EVENT_TYPE)
    }
}

#[async_trait]
impl OrderPlacedHandler for TraceHandler {
    async fn on_order_placed(
        &self,
        _metadata: &EventMetadata,
        _event: &OrderPlaced,
    ) -> Result<(), DomainError> {
        self.invoke(ORDER_PLACED_EVENT_TYPE)
    }
}

#[async_trait]
impl PaymentReceivedHandler for TraceHandler {
    async fn on_payment_received(
        &self,
        _metadata: &EventMetadata,
        _event: &PaymentReceived,
    ) -> Result<(), DomainError> {
        self.invoke(PAYMENT_RECEIVED_EVENT_TYPE)
    }
}

impl EventHandler for TraceHandler {
    fn handler_name(&self) -> &str {
        &self.name
    }

    fn as_user_registered(&self) -> Option<&dyn UserRegisteredHandler> {
        self.declares(Capability::UserRegistered)
            .then_some(self as &dyn UserRegisteredHandler)
    }

    fn as_order_placed(&self) -> Option<&dyn OrderPlacedHandler> {
        self.declares(Capability::OrderPlaced)
            .then_some(self as &dyn OrderPlacedHandler)
    }

    fn as_payment_received(&self) -> Option<&dyn PaymentReceivedHandler> {
        self.declares(Capability::PaymentReceived)
            .then_some(self as &dyn PaymentReceivedHandler)
    }
}
