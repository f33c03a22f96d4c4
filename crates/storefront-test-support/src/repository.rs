//! Test repositories — mock storage collaborator implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use storefront_core::error::DomainError;
use storefront_core::repository::{
    AuditLogEntry, AuditLogRepository, NewAuditLogEntry, NewOrder, OrderRecord, OrderRepository,
};

/// An audit log repository that records every appended entry and always
/// succeeds.
#[derive(Debug, Default)]
pub struct RecordingAuditLogRepository {
    entries: Mutex<Vec<AuditLogEntry>>,
}

impl RecordingAuditLogRepository {
    /// Creates an empty recording repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all entries that were appended.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLogRepository for RecordingAuditLogRepository {
    async fn add_entry(&self, entry: NewAuditLogEntry) -> Result<AuditLogEntry, DomainError> {
        let mut entries = self.entries.lock().unwrap();
        let stored = AuditLogEntry {
            id: next_id(entries.len()),
            event_id: entry.event_id,
            occurred_at: entry.occurred_at,
            event_type: entry.event_type,
            details: entry.details,
        };
        entries.push(stored.clone());
        Ok(stored)
    }
}

/// An audit log repository that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingAuditLogRepository;

#[async_trait]
impl AuditLogRepository for FailingAuditLogRepository {
    async fn add_entry(&self, _entry: NewAuditLogEntry) -> Result<AuditLogEntry, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// One call observed by [`RecordingOrderRepository`].
#[derive(Debug, Clone, PartialEq)]
pub enum OrderCall {
    /// `add_order` was called with this order.
    Add(NewOrder),
    /// `find_by_order_id` was called with this id.
    Find(String),
    /// `update_order` was called with this record.
    Update(OrderRecord),
}

/// An order repository backed by a vector that records every call.
///
/// Enforces unique business ids on `add_order` and fails `update_order`
/// for unknown records, like a real store would.
#[derive(Debug, Default)]
pub struct RecordingOrderRepository {
    orders: Mutex<Vec<OrderRecord>>,
    calls: Mutex<Vec<OrderCall>>,
}

impl RecordingOrderRepository {
    /// Creates an empty recording repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `orders`.
    #[must_use]
    pub fn with_orders(orders: Vec<OrderRecord>) -> Self {
        Self {
            orders: Mutex::new(orders),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns every call in the order it was made.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<OrderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the orders passed to `add_order`.
    pub fn added(&self) -> Vec<NewOrder> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                OrderCall::Add(order) => Some(order),
                _ => None,
            })
            .collect()
    }

    /// Returns the records passed to `update_order`.
    pub fn updated(&self) -> Vec<OrderRecord> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                OrderCall::Update(order) => Some(order),
                _ => None,
            })
            .collect()
    }

    /// Returns the current stored orders.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn orders(&self) -> Vec<OrderRecord> {
        self.orders.lock().unwrap().clone()
    }

    fn record(&self, call: OrderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl OrderRepository for RecordingOrderRepository {
    async fn add_order(&self, order: NewOrder) -> Result<OrderRecord, DomainError> {
        self.record(OrderCall::Add(order.clone()));
        let mut orders = self.orders.lock().unwrap();
        if orders.iter().any(|o| o.order_id == order.order_id) {
            return Err(DomainError::AlreadyExists(format!(
                "order {} already exists",
                order.order_id
            )));
        }
        let stored = OrderRecord {
            id: next_id(orders.len()),
            order_id: order.order_id,
            user_id: order.user_id,
            placed_at: order.placed_at,
            total_amount: order.total_amount,
            status: order.status,
        };
        orders.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<OrderRecord>, DomainError> {
        self.record(OrderCall::Find(order_id.to_owned()));
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned())
    }

    async fn update_order(&self, order: &OrderRecord) -> Result<(), DomainError> {
        self.record(OrderCall::Update(order.clone()));
        let mut orders = self.orders.lock().unwrap();
        match orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(())
            }
            None => Err(DomainError::NotFound(format!("order record {}", order.id))),
        }
    }
}

/// An order repository that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingOrderRepository;

#[async_trait]
impl OrderRepository for FailingOrderRepository {
    async fn add_order(&self, _order: NewOrder) -> Result<OrderRecord, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn find_by_order_id(&self, _order_id: &str) -> Result<Option<OrderRecord>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn update_order(&self, _order: &OrderRecord) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

#[allow(clippy::cast_possible_wrap)]
fn next_id(len: usize) -> i64 {
    len as i64 + 1
}
