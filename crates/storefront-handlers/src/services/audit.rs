//! Audit log handler: one audit record per event, for every event kind.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use storefront_core::error::DomainError;
use storefront_core::event::{
    EventMetadata, ORDER_PLACED_EVENT_TYPE, OrderPlaced, PAYMENT_RECEIVED_EVENT_TYPE,
    PaymentReceived, USER_REGISTERED_EVENT_TYPE, UserRegistered,
};
use storefront_core::handler::{
    EventHandler, OrderPlacedHandler, PaymentReceivedHandler, UserRegisteredHandler,
};
use storefront_core::repository::{AuditLogRepository, NewAuditLogEntry};
use tracing::{error, info, instrument};

/// Structured details stored for `OrderPlaced`.
#[derive(Debug, Serialize)]
struct OrderPlacedDetails<'a> {
    order_id: &'a str,
    user_id: &'a str,
    total_amount: f64,
    item_count: usize,
}

/// Writes an audit record for every event it sees.
///
/// Storage failures are logged and swallowed; auditing never fails a
/// dispatch.
pub struct AuditLogService {
    repository: Arc<dyn AuditLogRepository>,
}

impl AuditLogService {
    /// Handler name used in diagnostics.
    pub const NAME: &'static str = "audit-log";

    /// Creates the service over `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditLogRepository>) -> Self {
        Self { repository }
    }

    async fn record(&self, metadata: &EventMetadata, event_type: &str, details: String) {
        let entry = NewAuditLogEntry {
            event_id: metadata.event_id(),
            occurred_at: metadata.occurred_at(),
            event_type: event_type.to_owned(),
            details,
        };
        match self.repository.add_entry(entry).await {
            Ok(stored) => {
                info!(entry_id = stored.id, details = %stored.details, "audit entry stored");
            }
            Err(err) => {
                error!(
                    event_id = %metadata.event_id(),
                    event_type,
                    error = %err,
                    "failed to store audit entry"
                );
            }
        }
    }
}

impl fmt::Debug for AuditLogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLogService").finish_non_exhaustive()
    }
}

#[async_trait]
impl UserRegisteredHandler for AuditLogService {
    #[instrument(skip_all, fields(handler = Self::NAME, event_id = %metadata.event_id()))]
    async fn on_user_registered(
        &self,
        metadata: &EventMetadata,
        event: &UserRegistered,
    ) -> Result<(), DomainError> {
        let details = format!(
            "User Registered: ID={}, Email={}",
            event.user_id(),
            event.email()
        );
        self.record(metadata, USER_REGISTERED_EVENT_TYPE, details).await;
        Ok(())
    }
}

#[async_trait]
impl OrderPlacedHandler for AuditLogService {
    #[instrument(skip_all, fields(handler = Self::NAME, event_id = %metadata.event_id()))]
    async fn on_order_placed(
        &self,
        metadata: &EventMetadata,
        event: &OrderPlaced,
    ) -> Result<(), DomainError> {
        let details = OrderPlacedDetails {
            order_id: event.order_id(),
            user_id: event.user_id(),
            total_amount: event.total_amount(),
            item_count: event.items().len(),
        };
        match serde_json::to_string(&details) {
            Ok(details) => self.record(metadata, ORDER_PLACED_EVENT_TYPE, details).await,
            Err(err) => error!(error = %err, "failed to serialize audit details"),
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentReceivedHandler for AuditLogService {
    #[instrument(skip_all, fields(handler = Self::NAME, event_id = %metadata.event_id()))]
    async fn on_payment_received(
        &self,
        metadata: &EventMetadata,
        event: &PaymentReceived,
    ) -> Result<(), DomainError> {
        let details = format!(
            "Payment Received: OrderID={}, PaymentID={}, Amount={:.2}, Status={}",
            event.order_id(),
            event.payment_id(),
            event.amount(),
            event.status()
        );
        self.record(metadata, PAYMENT_RECEIVED_EVENT_TYPE, details).await;
        Ok(())
    }
}

impl EventHandler for AuditLogService {
    fn handler_name(&self) -> &str {
        Self::NAME
    }

    fn as_user_registered(&self) -> Option<&dyn UserRegisteredHandler> {
        Some(self)
    }

    fn as_order_placed(&self) -> Option<&dyn OrderPlacedHandler> {
        Some(self)
    }

    fn as_payment_received(&self) -> Option<&dyn PaymentReceivedHandler> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::event::{DomainEvent, EventKind};
    use storefront_core::model::{OrderItem, PaymentStatus};
    use storefront_test_support::{
        FailingAuditLogRepository, RecordingAuditLogRepository, fixed_clock,
    };

    #[tokio::test]
    async fn test_user_registered_writes_one_entry() {
        // Arrange
        let repo = Arc::new(RecordingAuditLogRepository::new());
        let service = AuditLogService::new(repo.clone());
        let event = DomainEvent::user_registered("user-1", "u1@example.com", &fixed_clock())
            .unwrap();
        let EventKind::UserRegistered(payload) = event.kind() else {
            panic!("expected UserRegistered");
        };

        // Act
        service
            .on_user_registered(event.metadata(), payload)
            .await
            .unwrap();

        // Assert
        let entries = repo.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event_id, event.event_id());
        assert_eq!(entries[0].occurred_at, event.occurred_at());
        assert_eq!(entries[0].event_type, USER_REGISTERED_EVENT_TYPE);
        assert_eq!(
            entries[0].details,
            "User Registered: ID=user-1, Email=u1@example.com"
        );
    }

    #[tokio::test]
    async fn test_order_placed_details_are_json() {
        // Arrange
        let repo = Arc::new(RecordingAuditLogRepository::new());
        let service = AuditLogService::new(repo.clone());
        let items = vec![
            OrderItem::new("p1", 2, 9.99).unwrap(),
            OrderItem::new("p2", 1, 5.00).unwrap(),
        ];
        let event =
            DomainEvent::order_placed("order-1", "user-1", 24.98, items, &fixed_clock()).unwrap();
        let EventKind::OrderPlaced(payload) = event.kind() else {
            panic!("expected OrderPlaced");
        };

        // Act
        service.on_order_placed(event.metadata(), payload).await.unwrap();

        // Assert
        let entries = repo.entries();
        assert_eq!(entries.len(), 1);
        let details: serde_json::Value = serde_json::from_str(&entries[0].details).unwrap();
        assert_eq!(details["order_id"], "order-1");
        assert_eq!(details["user_id"], "user-1");
        assert_eq!(details["item_count"], 2);
        assert!((details["total_amount"].as_f64().unwrap() - 24.98).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_payment_received_details_include_status() {
        let repo = Arc::new(RecordingAuditLogRepository::new());
        let service = AuditLogService::new(repo.clone());
        let event = DomainEvent::payment_received(
            "order-1",
            "pay-1",
            19.98,
            PaymentStatus::Failure,
            &fixed_clock(),
        )
        .unwrap();
        let EventKind::PaymentReceived(payload) = event.kind() else {
            panic!("expected PaymentReceived");
        };

        service
            .on_payment_received(event.metadata(), payload)
            .await
            .unwrap();

        assert_eq!(
            repo.entries()[0].details,
            "Payment Received: OrderID=order-1, PaymentID=pay-1, Amount=19.98, Status=Failure"
        );
    }

    #[tokio::test]
    async fn test_storage_failure_is_swallowed() {
        let service = AuditLogService::new(Arc::new(FailingAuditLogRepository));
        let event = DomainEvent::user_registered("user-1", "u1@example.com", &fixed_clock())
            .unwrap();
        let EventKind::UserRegistered(payload) = event.kind() else {
            panic!("expected UserRegistered");
        };

        let result = service.on_user_registered(event.metadata(), payload).await;

        assert!(result.is_ok());
    }

    #[test]
    fn test_declares_every_capability() {
        let service = AuditLogService::new(Arc::new(RecordingAuditLogRepository::new()));

        assert_eq!(service.capabilities().len(), 3);
        assert_eq!(service.handler_name(), "audit-log");
    }
}
