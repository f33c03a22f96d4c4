//! Conditional dispatch over concrete handler types.
//!
//! [`TypeSwitch`] does not consult capability probes. It downcasts each
//! handler to one of the reference service types and looks the
//! (event kind, handler type) pair up in a fixed table. Pairs missing from
//! the table, including every handler type it does not know, are skipped
//! without a diagnostic beyond `trace!`.

use async_trait::async_trait;
use storefront_core::event::{DomainEvent, EventKind};
use storefront_core::handler::{
    AsAny, Delivery, EventHandler, OrderPlacedHandler, PaymentReceivedHandler,
    UserRegisteredHandler,
};
use storefront_dispatch::{DispatchStrategy, RoutingStrategy};
use tracing::trace;

use crate::services::{AuditLogService, NotificationService, OrderManagementService};

/// Routing strategy that enumerates every valid (event kind, handler type)
/// pair explicitly.
///
/// A new handler type or event kind needs a new row here.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeSwitch;

/// A handler resolved to its concrete reference type.
#[derive(Clone, Copy)]
enum Known<'a> {
    Audit(&'a AuditLogService),
    Orders(&'a OrderManagementService),
    Notification(&'a NotificationService),
    Unknown,
}

fn classify(handler: &dyn EventHandler) -> Known<'_> {
    let any = handler.as_any();
    if let Some(audit) = any.downcast_ref::<AuditLogService>() {
        Known::Audit(audit)
    } else if let Some(orders) = any.downcast_ref::<OrderManagementService>() {
        Known::Orders(orders)
    } else if let Some(notification) = any.downcast_ref::<NotificationService>() {
        Known::Notification(notification)
    } else {
        Known::Unknown
    }
}

fn routed(kind: &EventKind, known: Known<'_>) -> bool {
    match kind {
        EventKind::UserRegistered(_) => matches!(known, Known::Audit(_) | Known::Notification(_)),
        EventKind::OrderPlaced(_) => matches!(known, Known::Audit(_) | Known::Orders(_)),
        EventKind::PaymentReceived(_) => !matches!(known, Known::Unknown),
    }
}

#[async_trait]
impl RoutingStrategy for TypeSwitch {
    fn name(&self) -> &'static str {
        DispatchStrategy::TypeSwitch.as_str()
    }

    fn matches(&self, event: &DomainEvent, handler: &dyn EventHandler) -> bool {
        routed(event.kind(), classify(handler))
    }

    async fn deliver(&self, event: &DomainEvent, handler: &dyn EventHandler) -> Delivery {
        let metadata = event.metadata();
        let result = match (event.kind(), classify(handler)) {
            (EventKind::UserRegistered(payload), Known::Audit(audit)) => {
                audit.on_user_registered(metadata, payload).await
            }
            (EventKind::UserRegistered(payload), Known::Notification(notification)) => {
                notification.on_user_registered(metadata, payload).await
            }
            (EventKind::OrderPlaced(payload), Known::Audit(audit)) => {
                audit.on_order_placed(metadata, payload).await
            }
            (EventKind::OrderPlaced(payload), Known::Orders(orders)) => {
                orders.on_order_placed(metadata, payload).await
            }
            (EventKind::PaymentReceived(payload), Known::Audit(audit)) => {
                audit.on_payment_received(metadata, payload).await
            }
            (EventKind::PaymentReceived(payload), Known::Orders(orders)) => {
                orders.on_payment_received(metadata, payload).await
            }
            (EventKind::PaymentReceived(payload), Known::Notification(notification)) => {
                notification.on_payment_received(metadata, payload).await
            }
            _ => {
                trace!(
                    event_type = event.event_type(),
                    handler = handler.handler_name(),
                    "no type-switch entry for handler"
                );
                return Delivery::Skipped;
            }
        };
        Delivery::from_result(result)
    }
}
