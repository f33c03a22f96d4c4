//! `InMemoryStore`: both repositories over `tokio::sync::RwLock`-guarded tables.

use async_trait::async_trait;
use storefront_core::error::DomainError;
use storefront_core::repository::{
    AuditLogEntry, AuditLogRepository, NewAuditLogEntry, NewOrder, OrderRecord, OrderRepository,
};
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local audit log and order tables.
///
/// Surrogate ids are assigned sequentially per table, starting at 1.
/// Business order ids are unique.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    audit_log: RwLock<Vec<AuditLogEntry>>,
    orders: RwLock<Vec<OrderRecord>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every audit entry, in insertion order.
    pub async fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.audit_log.read().await.clone()
    }

    /// Copy of every order, in insertion order.
    pub async fn orders(&self) -> Vec<OrderRecord> {
        self.orders.read().await.clone()
    }
}

fn next_id(len: usize) -> Result<i64, DomainError> {
    i64::try_from(len)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| DomainError::Infrastructure("surrogate id space exhausted".to_owned()))
}

#[async_trait]
impl AuditLogRepository for InMemoryStore {
    async fn add_entry(&self, entry: NewAuditLogEntry) -> Result<AuditLogEntry, DomainError> {
        let mut table = self.audit_log.write().await;
        let stored = AuditLogEntry {
            id: next_id(table.len())?,
            event_id: entry.event_id,
            occurred_at: entry.occurred_at,
            event_type: entry.event_type,
            details: entry.details,
        };
        debug!(id = stored.id, event_type = %stored.event_type, "audit entry inserted");
        table.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn add_order(&self, order: NewOrder) -> Result<OrderRecord, DomainError> {
        let mut table = self.orders.write().await;
        if table.iter().any(|o| o.order_id == order.order_id) {
            return Err(DomainError::AlreadyExists(format!(
                "order {} already exists",
                order.order_id
            )));
        }
        let stored = OrderRecord {
            id: next_id(table.len())?,
            order_id: order.order_id,
            user_id: order.user_id,
            placed_at: order.placed_at,
            total_amount: order.total_amount,
            status: order.status,
        };
        debug!(id = stored.id, order_id = %stored.order_id, "order inserted");
        table.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<OrderRecord>, DomainError> {
        if order_id.trim().is_empty() {
            return Ok(None);
        }
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned())
    }

    async fn update_order(&self, order: &OrderRecord) -> Result<(), DomainError> {
        let mut table = self.orders.write().await;
        let existing = table
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or_else(|| DomainError::NotFound(format!("order record {}", order.id)))?;
        *existing = order.clone();
        debug!(id = order.id, status = %order.status, "order updated");
        Ok(())
    }
}
