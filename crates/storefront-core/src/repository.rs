//! Storage collaborator abstractions.
//!
//! The dispatch engine never persists anything itself. Handlers that need
//! storage depend on these traits; implementations live outside the core.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::DomainError;

/// Audit record as handed to the repository, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditLogEntry {
    /// Identifier of the event being audited.
    pub event_id: Uuid,
    /// Timestamp of the audited event.
    pub occurred_at: DateTime<Utc>,
    /// Event type name.
    pub event_type: String,
    /// Free-form or JSON details.
    pub details: String,
}

/// Persisted audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditLogEntry {
    /// Surrogate key assigned by storage.
    pub id: i64,
    /// Identifier of the event being audited.
    pub event_id: Uuid,
    /// Timestamp of the audited event.
    pub occurred_at: DateTime<Utc>,
    /// Event type name.
    pub event_type: String,
    /// Free-form or JSON details.
    pub details: String,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    /// Created, waiting for a payment result.
    PendingPayment,
    /// Payment succeeded.
    Processing,
    /// Payment failed.
    PaymentFailed,
}

impl OrderStatus {
    /// Stable textual form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingPayment => "PendingPayment",
            Self::Processing => "Processing",
            Self::PaymentFailed => "PaymentFailed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order as handed to the repository, before an id is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// Business order identifier.
    pub order_id: String,
    /// The ordering user.
    pub user_id: String,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Order total.
    pub total_amount: f64,
    /// Initial status.
    pub status: OrderStatus,
}

/// Persisted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    /// Surrogate key assigned by storage.
    pub id: i64,
    /// Business order identifier, unique.
    pub order_id: String,
    /// The ordering user.
    pub user_id: String,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Order total.
    pub total_amount: f64,
    /// Current status.
    pub status: OrderStatus,
}

/// Append-only audit log storage.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Appends an audit record and returns it with its assigned id.
    async fn add_entry(&self, entry: NewAuditLogEntry) -> Result<AuditLogEntry, DomainError>;
}

/// Order storage keyed by business order id.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts a new order.
    ///
    /// Fails with `DomainError::AlreadyExists` if the business id is taken.
    async fn add_order(&self, order: NewOrder) -> Result<OrderRecord, DomainError>;

    /// Looks an order up by business id. Blank ids yield `None`.
    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<OrderRecord>, DomainError>;

    /// Overwrites a previously stored order.
    ///
    /// Fails with `DomainError::NotFound` if no order has `order.id`.
    async fn update_order(&self, order: &OrderRecord) -> Result<(), DomainError>;
}
