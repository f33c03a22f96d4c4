//! End-to-end routing through the dispatcher with the reference handlers,
//! exercised under both strategies.

use std::sync::Arc;

use storefront_core::event::DomainEvent;
use storefront_core::model::{OrderItem, PaymentStatus};
use storefront_core::repository::{OrderRecord, OrderStatus};
use storefront_dispatch::{DispatchStrategy, Dispatcher, HandlerRegistry};
use storefront_handlers::{
    AuditLogService, NotificationService, OrderManagementService, ReferenceHandlers, strategy_for,
};
use storefront_test_support::{
    FixedClock, InvocationTrace, OrderCall, RecordingAuditLogRepository, RecordingOrderRepository,
    TraceHandler, fixed_clock,
};

const STRATEGIES: [DispatchStrategy; 2] =
    [DispatchStrategy::CapabilityProbe, DispatchStrategy::TypeSwitch];

struct Fixture {
    audit_repo: Arc<RecordingAuditLogRepository>,
    order_repo: Arc<RecordingOrderRepository>,
    dispatcher: Dispatcher,
    clock: FixedClock,
}

fn fixture(strategy: DispatchStrategy, orders: Vec<OrderRecord>) -> Fixture {
    let audit_repo = Arc::new(RecordingAuditLogRepository::new());
    let order_repo = Arc::new(RecordingOrderRepository::with_orders(orders));
    let handlers = ReferenceHandlers::new(audit_repo.clone(), order_repo.clone());
    let mut registry = HandlerRegistry::new();
    handlers.register_all(&mut registry);
    Fixture {
        audit_repo,
        order_repo,
        dispatcher: Dispatcher::new(registry, strategy_for(strategy)),
        clock: fixed_clock(),
    }
}

fn pending_order() -> OrderRecord {
    OrderRecord {
        id: 1,
        order_id: "order-1".into(),
        user_id: "user-1".into(),
        placed_at: fixed_clock().0,
        total_amount: 19.98,
        status: OrderStatus::PendingPayment,
    }
}

fn order_placed(clock: &FixedClock) -> DomainEvent {
    DomainEvent::order_placed(
        "order-1",
        "user-1",
        19.98,
        vec![OrderItem::new("p1", 2, 9.99).unwrap()],
        clock,
    )
    .unwrap()
}

fn successful_payment(clock: &FixedClock) -> DomainEvent {
    DomainEvent::payment_received("order-1", "pay-1", 19.98, PaymentStatus::Success, clock)
        .unwrap()
}

#[test]
fn test_both_strategies_route_identically() {
    let clock = fixed_clock();
    let events = [
        DomainEvent::user_registered("user-1", "user1@example.com", &clock).unwrap(),
        order_placed(&clock),
        successful_payment(&clock),
    ];
    let expected: [&[&str]; 3] = [
        &[AuditLogService::NAME, NotificationService::NAME],
        &[AuditLogService::NAME, OrderManagementService::NAME],
        &[
            AuditLogService::NAME,
            OrderManagementService::NAME,
            NotificationService::NAME,
        ],
    ];

    for strategy in STRATEGIES {
        let f = fixture(strategy, Vec::new());
        for (event, expected) in events.iter().zip(expected) {
            assert_eq!(
                f.dispatcher.matching_handlers(event),
                expected,
                "{strategy} routing for {}",
                event.event_type()
            );
        }
    }
}

#[tokio::test]
async fn test_order_placed_creates_one_order_and_one_audit_entry() {
    for strategy in STRATEGIES {
        // Arrange
        let f = fixture(strategy, Vec::new());

        // Act
        let report = f.dispatcher.dispatch(&order_placed(&f.clock)).await;

        // Assert
        let added = f.order_repo.added();
        assert_eq!(added.len(), 1, "{strategy}");
        assert_eq!(added[0].status, OrderStatus::PendingPayment);
        assert_eq!(f.audit_repo.entries().len(), 1, "{strategy}");
        assert_eq!(
            report.invoked,
            vec![AuditLogService::NAME, OrderManagementService::NAME]
        );
        assert_eq!(report.skipped, 1);
        assert!(report.is_clean());
    }
}

#[tokio::test]
async fn test_successful_payment_marks_order_processing() {
    for strategy in STRATEGIES {
        // Arrange
        let f = fixture(strategy, vec![pending_order()]);

        // Act
        let report = f.dispatcher.dispatch(&successful_payment(&f.clock)).await;

        // Assert
        let updated = f.order_repo.updated();
        assert_eq!(updated.len(), 1, "{strategy}");
        assert_eq!(updated[0].status, OrderStatus::Processing);
        assert_eq!(report.invoked_count(), 3);
    }
}

#[tokio::test]
async fn test_payment_for_absent_order_updates_nothing() {
    for strategy in STRATEGIES {
        let f = fixture(strategy, Vec::new());

        let report = f.dispatcher.dispatch(&successful_payment(&f.clock)).await;

        assert_eq!(
            f.order_repo.calls(),
            vec![OrderCall::Find("order-1".into())],
            "{strategy}"
        );
        assert!(report.is_clean());
    }
}

#[tokio::test]
async fn test_repeated_payment_updates_order_once() {
    for strategy in STRATEGIES {
        // Arrange
        let f = fixture(strategy, vec![pending_order()]);
        let payment = successful_payment(&f.clock);

        // Act
        f.dispatcher.dispatch(&payment).await;
        f.dispatcher.dispatch(&payment).await;

        // Assert
        assert_eq!(f.order_repo.updated().len(), 1, "{strategy}");
        assert_eq!(f.audit_repo.entries().len(), 2);
    }
}

#[tokio::test]
async fn test_registering_reference_handlers_twice_keeps_one_entry_each() {
    // Arrange
    let audit_repo = Arc::new(RecordingAuditLogRepository::new());
    let handlers = ReferenceHandlers::new(
        audit_repo.clone(),
        Arc::new(RecordingOrderRepository::new()),
    );
    let mut registry = HandlerRegistry::new();
    handlers.register_all(&mut registry);
    handlers.register_all(&mut registry);
    let dispatcher = Dispatcher::new(registry, strategy_for(DispatchStrategy::CapabilityProbe));
    let event = DomainEvent::user_registered("user-1", "user1@example.com", &fixed_clock()).unwrap();

    // Act
    dispatcher.dispatch(&event).await;

    // Assert
    assert_eq!(dispatcher.registry().len(), 3);
    assert_eq!(audit_repo.entries().len(), 1);
}

#[tokio::test]
async fn test_type_switch_ignores_handlers_it_does_not_know() {
    // Arrange
    let trace = InvocationTrace::new();
    let audit_repo = Arc::new(RecordingAuditLogRepository::new());
    let handlers = ReferenceHandlers::new(
        audit_repo.clone(),
        Arc::new(RecordingOrderRepository::new()),
    );
    let mut registry = HandlerRegistry::new();
    registry.register(Arc::new(TraceHandler::all("custom", &trace)));
    handlers.register_all(&mut registry);
    let probe = Dispatcher::new(
        registry.clone(),
        strategy_for(DispatchStrategy::CapabilityProbe),
    );
    let switch = Dispatcher::new(registry, strategy_for(DispatchStrategy::TypeSwitch));
    let event = order_placed(&fixed_clock());

    // Act
    let switch_report = switch.dispatch(&event).await;
    let probe_report = probe.dispatch(&event).await;

    // Assert
    assert_eq!(
        switch_report.invoked,
        vec![AuditLogService::NAME, OrderManagementService::NAME]
    );
    assert_eq!(switch_report.skipped, 2);
    assert_eq!(probe_report.invoked[0], "custom");
    assert_eq!(trace.handlers(), vec!["custom"]);
}
