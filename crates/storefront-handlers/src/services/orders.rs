//! Order management: creates orders and moves them through payment states.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use storefront_core::error::DomainError;
use storefront_core::event::{EventMetadata, OrderPlaced, PaymentReceived};
use storefront_core::handler::{EventHandler, OrderPlacedHandler, PaymentReceivedHandler};
use storefront_core::model::PaymentStatus;
use storefront_core::repository::{NewOrder, OrderRepository, OrderStatus};
use tracing::{error, info, instrument, warn};

/// Persists placed orders and applies payment results to them.
///
/// Repository errors are logged and swallowed.
pub struct OrderManagementService {
    repository: Arc<dyn OrderRepository>,
}

impl OrderManagementService {
    /// Handler name used in diagnostics.
    pub const NAME: &'static str = "order-management";

    /// Creates the service over `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    async fn apply_payment(&self, event: &PaymentReceived) -> Result<(), DomainError> {
        let Some(mut order) = self.repository.find_by_order_id(event.order_id()).await? else {
            warn!(order_id = event.order_id(), "order not found for payment");
            return Ok(());
        };

        let target = status_after(event.status());
        if order.status == target {
            info!(
                order_id = %order.order_id,
                status = %order.status,
                "order already in target status, no update needed"
            );
            return Ok(());
        }

        let previous = order.status;
        order.status = target;
        self.repository.update_order(&order).await?;
        info!(
            order_id = %order.order_id,
            from = %previous,
            to = %target,
            "order status updated"
        );
        Ok(())
    }
}

fn status_after(payment: PaymentStatus) -> OrderStatus {
    match payment {
        PaymentStatus::Success => OrderStatus::Processing,
        PaymentStatus::Failure => OrderStatus::PaymentFailed,
    }
}

impl fmt::Debug for OrderManagementService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderManagementService").finish_non_exhaustive()
    }
}

#[async_trait]
impl OrderPlacedHandler for OrderManagementService {
    #[instrument(skip_all, fields(handler = Self::NAME, order_id = event.order_id()))]
    async fn on_order_placed(
        &self,
        metadata: &EventMetadata,
        event: &OrderPlaced,
    ) -> Result<(), DomainError> {
        let order = NewOrder {
            order_id: event.order_id().to_owned(),
            user_id: event.user_id().to_owned(),
            placed_at: metadata.occurred_at(),
            total_amount: event.total_amount(),
            status: OrderStatus::PendingPayment,
        };
        match self.repository.add_order(order).await {
            Ok(stored) => info!(id = stored.id, status = %stored.status, "order created"),
            Err(err) if err.is_already_exists() => {
                warn!(error = %err, "order already exists, ignoring");
            }
            Err(err) => error!(error = %err, "failed to create order"),
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentReceivedHandler for OrderManagementService {
    #[instrument(
        skip_all,
        fields(handler = Self::NAME, order_id = event.order_id(), payment_id = event.payment_id())
    )]
    async fn on_payment_received(
        &self,
        _metadata: &EventMetadata,
        event: &PaymentReceived,
    ) -> Result<(), DomainError> {
        if let Err(err) = self.apply_payment(event).await {
            error!(error = %err, "failed to apply payment to order");
        }
        Ok(())
    }
}

impl EventHandler for OrderManagementService {
    fn handler_name(&self) -> &str {
        Self::NAME
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
    use storefront_core::handler::Capability;
    use storefront_core::model::OrderItem;
    use storefront_core::repository::OrderRecord;
    use storefront_test_support::{
        FailingOrderRepository, OrderCall, RecordingOrderRepository, fixed_clock,
    };

    fn stored_order(status: OrderStatus) -> OrderRecord {
        OrderRecord {
            id: 1,
            order_id: "order-1".into(),
            user_id: "user-1".into(),
            placed_at: fixed_clock().0,
            total_amount: 19.98,
            status,
        }
    }

    fn order_placed() -> DomainEvent {
        DomainEvent::order_placed(
            "order-1",
            "user-1",
            19.98,
            vec![OrderItem::new("p1", 2, 9.99).unwrap()],
            &fixed_clock(),
        )
        .unwrap()
    }

    fn payment(status: PaymentStatus) -> DomainEvent {
        DomainEvent::payment_received("order-1", "pay-1", 19.98, status, &fixed_clock()).unwrap()
    }

    async fn handle_order(service: &OrderManagementService, event: &DomainEvent) {
        let EventKind::OrderPlaced(payload) = event.kind() else {
            panic!("expected OrderPlaced");
        };
        service
            .on_order_placed(event.metadata(), payload)
            .await
            .unwrap();
    }

    async fn handle_payment(service: &OrderManagementService, event: &DomainEvent) {
        let EventKind::PaymentReceived(payload) = event.kind() else {
            panic!("expected PaymentReceived");
        };
        service
            .on_payment_received(event.metadata(), payload)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_order_placed_creates_pending_order() {
        // Arrange
        let repo = Arc::new(RecordingOrderRepository::new());
        let service = OrderManagementService::new(repo.clone());
        let event = order_placed();

        // Act
        handle_order(&service, &event).await;

        // Assert
        let added = repo.added();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].order_id, "order-1");
        assert_eq!(added[0].user_id, "user-1");
        assert_eq!(added[0].status, OrderStatus::PendingPayment);
        assert_eq!(added[0].placed_at, event.occurred_at());
        assert!((added[0].total_amount - 19.98).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_duplicate_order_is_ignored() {
        // Arrange
        let repo = Arc::new(RecordingOrderRepository::with_orders(vec![stored_order(
            OrderStatus::Processing,
        )]));
        let service = OrderManagementService::new(repo.clone());

        // Act
        handle_order(&service, &order_placed()).await;

        // Assert
        assert_eq!(repo.orders().len(), 1);
        assert_eq!(repo.orders()[0].status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn test_successful_payment_moves_order_to_processing() {
        // Arrange
        let repo = Arc::new(RecordingOrderRepository::with_orders(vec![stored_order(
            OrderStatus::PendingPayment,
        )]));
        let service = OrderManagementService::new(repo.clone());

        // Act
        handle_payment(&service, &payment(PaymentStatus::Success)).await;

        // Assert
        let updated = repo.updated();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].status, OrderStatus::Processing);
        assert_eq!(updated[0].id, 1);
    }

    #[tokio::test]
    async fn test_failed_payment_moves_order_to_payment_failed() {
        let repo = Arc::new(RecordingOrderRepository::with_orders(vec![stored_order(
            OrderStatus::PendingPayment,
        )]));
        let service = OrderManagementService::new(repo.clone());

        handle_payment(&service, &payment(PaymentStatus::Failure)).await;

        assert_eq!(repo.orders()[0].status, OrderStatus::PaymentFailed);
    }

    #[tokio::test]
    async fn test_payment_for_unknown_order_does_not_update() {
        // Arrange
        let repo = Arc::new(RecordingOrderRepository::new());
        let service = OrderManagementService::new(repo.clone());

        // Act
        handle_payment(&service, &payment(PaymentStatus::Success)).await;

        // Assert
        assert_eq!(repo.calls(), vec![OrderCall::Find("order-1".into())]);
    }

    #[tokio::test]
    async fn test_repeated_payment_updates_once() {
        // Arrange
        let repo = Arc::new(RecordingOrderRepository::with_orders(vec![stored_order(
            OrderStatus::PendingPayment,
        )]));
        let service = OrderManagementService::new(repo.clone());
        let event = payment(PaymentStatus::Success);

        // Act
        handle_payment(&service, &event).await;
        handle_payment(&service, &event).await;

        // Assert
        assert_eq!(repo.updated().len(), 1);
        assert_eq!(repo.orders()[0].status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn test_repository_errors_are_swallowed() {
        let service = OrderManagementService::new(Arc::new(FailingOrderRepository));

        handle_order(&service, &order_placed()).await;
        handle_payment(&service, &payment(PaymentStatus::Success)).await;
    }

    #[test]
    fn test_declares_order_and_payment_capabilities() {
        let service = OrderManagementService::new(Arc::new(RecordingOrderRepository::new()));

        assert_eq!(
            service.capabilities(),
            vec![Capability::OrderPlaced, Capability::PaymentReceived]
        );
    }
}
