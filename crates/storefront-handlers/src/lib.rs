//! Storefront — reference event handlers.
//!
//! The audit, order-management and notification services that the
//! surrounding application registers with the dispatcher, plus the
//! type-switch routing strategy, which has to know these concrete types.

pub mod services;
pub mod type_switch;

use std::sync::Arc;

use storefront_core::repository::{AuditLogRepository, OrderRepository};
use storefront_dispatch::{CapabilityProbe, DispatchStrategy, HandlerRegistry, RoutingStrategy};

pub use services::{AuditLogService, NotificationService, OrderManagementService};
pub use type_switch::TypeSwitch;

/// Builds the routing strategy selected by configuration.
#[must_use]
pub fn strategy_for(kind: DispatchStrategy) -> Arc<dyn RoutingStrategy> {
    match kind {
        DispatchStrategy::CapabilityProbe => Arc::new(CapabilityProbe),
        DispatchStrategy::TypeSwitch => Arc::new(TypeSwitch),
    }
}

/// The three reference handlers, wired to their storage collaborators.
#[derive(Debug, Clone)]
pub struct ReferenceHandlers {
    /// Audit handler (all event kinds).
    pub audit: Arc<AuditLogService>,
    /// Order-management handler (orders and payments).
    pub orders: Arc<OrderManagementService>,
    /// Notification handler (registrations and payments).
    pub notification: Arc<NotificationService>,
}

impl ReferenceHandlers {
    /// Creates the handlers over the given repositories.
    #[must_use]
    pub fn new(
        audit_repository: Arc<dyn AuditLogRepository>,
        order_repository: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            audit: Arc::new(AuditLogService::new(audit_repository)),
            orders: Arc::new(OrderManagementService::new(order_repository)),
            notification: Arc::new(NotificationService),
        }
    }

    /// Registers audit, order management and notification, in that order.
    pub fn register_all(&self, registry: &mut HandlerRegistry) {
        registry.register(self.audit.clone());
        registry.register(self.orders.clone());
        registry.register(self.notification.clone());
    }
}
