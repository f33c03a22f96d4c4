//! Ordered handler registry.

use std::fmt;
use std::sync::Arc;

use storefront_core::error::DomainError;
use storefront_core::handler::EventHandler;
use tracing::{debug, info};

/// Ordered set of handlers, unique by identity.
///
/// Identity is the shared allocation behind the `Arc`: registering a clone
/// of an already registered `Arc` is a no-op, while two separately
/// constructed handlers of the same type are distinct entries.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` unless the same instance is already registered.
    ///
    /// Returns `true` if the handler was inserted.
    pub fn register(&mut self, handler: Arc<dyn EventHandler>) -> bool {
        if self.contains(&handler) {
            debug!(
                handler = handler.handler_name(),
                "handler already registered, ignoring"
            );
            return false;
        }
        info!(
            handler = handler.handler_name(),
            capabilities = ?handler.capabilities(),
            position = self.handlers.len(),
            "handler registered"
        );
        self.handlers.push(handler);
        true
    }

    /// Nullable form of [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if `handler` is `None`; the
    /// registry is left unchanged.
    pub fn try_register(
        &mut self,
        handler: Option<Arc<dyn EventHandler>>,
    ) -> Result<bool, DomainError> {
        let handler =
            handler.ok_or_else(|| DomainError::InvalidArgument("handler is required".to_owned()))?;
        Ok(self.register(handler))
    }

    /// Returns `true` if this exact handler instance is registered.
    #[must_use]
    pub fn contains(&self, handler: &Arc<dyn EventHandler>) -> bool {
        self.handlers
            .iter()
            .any(|registered| same_instance(registered, handler))
    }

    /// Registered handlers in registration order.
    #[must_use]
    pub fn snapshot(&self) -> &[Arc<dyn EventHandler>] {
        &self.handlers
    }

    /// Iterates handlers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn EventHandler>> {
        self.handlers.iter()
    }

    /// Handler names in registration order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.handler_name()).collect()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

// Compare data pointers only; vtable pointers for the same type may differ
// across codegen units.
fn same_instance(a: &Arc<dyn EventHandler>, b: &Arc<dyn EventHandler>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
