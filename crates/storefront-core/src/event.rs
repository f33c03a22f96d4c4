//! Domain event model.
//!
//! Events are immutable envelopes: metadata assigned at construction plus a
//! validated payload. There is no way to build a `DomainEvent` whose payload
//! violates its invariants.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::DomainError;
use crate::handler::{Capability, Delivery, EventHandler};
use crate::model::{OrderItem, PaymentStatus, require_non_empty, require_non_negative};

/// Event type name for [`UserRegistered`].
pub const USER_REGISTERED_EVENT_TYPE: &str = "user.registered";
/// Event type name for [`OrderPlaced`].
pub const ORDER_PLACED_EVENT_TYPE: &str = "order.placed";
/// Event type name for [`PaymentReceived`].
pub const PAYMENT_RECEIVED_EVENT_TYPE: &str = "payment.received";

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventMetadata {
    event_id: Uuid,
    occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Assigns a fresh event identifier and the current time of `clock`.
    #[must_use]
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: clock.now(),
        }
    }

    /// Unique event identifier.
    #[must_use]
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    /// Timestamp of event creation (UTC).
    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// A user has signed up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRegistered {
    user_id: String,
    email: String,
}

impl UserRegistered {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if either field is blank.
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self {
            user_id: require_non_empty("user_id", user_id)?,
            email: require_non_empty("email", email)?,
        })
    }

    /// The new user's identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The new user's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// A user has placed an order.
///
/// `total_amount` is supplied by the caller and is not recomputed from the
/// items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderPlaced {
    order_id: String,
    user_id: String,
    total_amount: f64,
    items: Vec<OrderItem>,
}

impl OrderPlaced {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if an identifier is blank,
    /// `total_amount` is negative or not finite, or `items` is empty.
    pub fn new(
        order_id: impl Into<String>,
        user_id: impl Into<String>,
        total_amount: f64,
        items: impl IntoIterator<Item = OrderItem>,
    ) -> Result<Self, DomainError> {
        let order_id = require_non_empty("order_id", order_id)?;
        let user_id = require_non_empty("user_id", user_id)?;
        let total_amount = require_non_negative("total_amount", total_amount)?;
        let items: Vec<OrderItem> = items.into_iter().collect();
        if items.is_empty() {
            return Err(DomainError::Validation(
                "order must contain at least one item".to_owned(),
            ));
        }
        Ok(Self {
            order_id,
            user_id,
            total_amount,
            items,
        })
    }

    /// Business order identifier.
    #[must_use]
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// The ordering user.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Caller-supplied order total.
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    /// Order lines, in input order.
    #[must_use]
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }
}

/// The payment provider reported a result for an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceived {
    order_id: String,
    payment_id: String,
    amount: f64,
    status: PaymentStatus,
}

impl PaymentReceived {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if an identifier is blank or
    /// `amount` is negative or not finite.
    pub fn new(
        order_id: impl Into<String>,
        payment_id: impl Into<String>,
        amount: f64,
        status: PaymentStatus,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            order_id: require_non_empty("order_id", order_id)?,
            payment_id: require_non_empty("payment_id", payment_id)?,
            amount: require_non_negative("amount", amount)?,
            status,
        })
    }

    /// Business order identifier the payment belongs to.
    #[must_use]
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Payment provider reference.
    #[must_use]
    pub fn payment_id(&self) -> &str {
        &self.payment_id
    }

    /// Amount paid.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Outcome of the payment.
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        self.status
    }
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventKind {
    /// A user has signed up.
    UserRegistered(UserRegistered),
    /// A user has placed an order.
    OrderPlaced(OrderPlaced),
    /// A payment result has arrived.
    PaymentReceived(PaymentReceived),
}

impl EventKind {
    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserRegistered(_) => USER_REGISTERED_EVENT_TYPE,
            Self::OrderPlaced(_) => ORDER_PLACED_EVENT_TYPE,
            Self::PaymentReceived(_) => PAYMENT_RECEIVED_EVENT_TYPE,
        }
    }

    /// Returns the capability a handler needs to process this kind.
    #[must_use]
    pub fn capability(&self) -> Capability {
        match self {
            Self::UserRegistered(_) => Capability::UserRegistered,
            Self::OrderPlaced(_) => Capability::OrderPlaced,
            Self::PaymentReceived(_) => Capability::PaymentReceived,
        }
    }
}

/// Domain event envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainEvent {
    metadata: EventMetadata,
    kind: EventKind,
}

impl DomainEvent {
    /// Wraps an already validated payload with fresh metadata.
    #[must_use]
    pub fn new(kind: EventKind, clock: &dyn Clock) -> Self {
        Self {
            metadata: EventMetadata::new(clock),
            kind,
        }
    }

    /// Builds a `UserRegistered` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the payload is invalid.
    pub fn user_registered(
        user_id: impl Into<String>,
        email: impl Into<String>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let payload = UserRegistered::new(user_id, email)?;
        Ok(Self::new(EventKind::UserRegistered(payload), clock))
    }

    /// Builds an `OrderPlaced` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the payload is invalid.
    pub fn order_placed(
        order_id: impl Into<String>,
        user_id: impl Into<String>,
        total_amount: f64,
        items: impl IntoIterator<Item = OrderItem>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let payload = OrderPlaced::new(order_id, user_id, total_amount, items)?;
        Ok(Self::new(EventKind::OrderPlaced(payload), clock))
    }

    /// Builds a `PaymentReceived` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the payload is invalid.
    pub fn payment_received(
        order_id: impl Into<String>,
        payment_id: impl Into<String>,
        amount: f64,
        status: PaymentStatus,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let payload = PaymentReceived::new(order_id, payment_id, amount, status)?;
        Ok(Self::new(EventKind::PaymentReceived(payload), clock))
    }

    /// Event metadata.
    #[must_use]
    pub fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    /// Event-specific payload.
    #[must_use]
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Shorthand for `metadata().event_id()`.
    #[must_use]
    pub fn event_id(&self) -> Uuid {
        self.metadata.event_id
    }

    /// Shorthand for `metadata().occurred_at()`.
    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.metadata.occurred_at
    }

    /// Shorthand for `kind().event_type()`.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    /// Offers this event to `handler`.
    ///
    /// The event probes the handler for the one capability matching its own
    /// kind and invokes that callback. Handlers lacking the capability are
    /// skipped without error.
    pub async fn accept(&self, handler: &dyn EventHandler) -> Delivery {
        let metadata = &self.metadata;
        let result = match &self.kind {
            EventKind::UserRegistered(payload) => match handler.as_user_registered() {
                Some(capable) => capable.on_user_registered(metadata, payload).await,
                None => return self.skip(handler),
            },
            EventKind::OrderPlaced(payload) => match handler.as_order_placed() {
                Some(capable) => capable.on_order_placed(metadata, payload).await,
                None => return self.skip(handler),
            },
            EventKind::PaymentReceived(payload) => match handler.as_payment_received() {
                Some(capable) => capable.on_payment_received(metadata, payload).await,
                None => return self.skip(handler),
            },
        };
        Delivery::from_result(result)
    }

    fn skip(&self, handler: &dyn EventHandler) -> Delivery {
        trace!(
            event_id = %self.metadata.event_id,
            event_type = self.event_type(),
            handler = handler.handler_name(),
            "handler lacks capability"
        );
        Delivery::Skipped
    }
}
