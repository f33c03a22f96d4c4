//! The dispatcher.
//!
//! For one event, walks the registry in registration order and asks the
//! active strategy to deliver the event to each handler. Each matching
//! callback is awaited before the next handler is tried. Callback errors
//! are logged, collected into the [`DispatchReport`] and never returned.

use std::fmt;
use std::sync::Arc;

use storefront_core::event::DomainEvent;
use storefront_core::handler::Delivery;
use tracing::{debug, error, info, instrument};

use crate::registry::HandlerRegistry;
use crate::report::{DispatchReport, HandlerFailure};
use crate::strategy::RoutingStrategy;

/// Routes events to the handlers of an owned registry.
pub struct Dispatcher {
    registry: HandlerRegistry,
    strategy: Arc<dyn RoutingStrategy>,
}

impl Dispatcher {
    /// Creates a dispatcher over a fully populated registry.
    #[must_use]
    pub fn new(registry: HandlerRegistry, strategy: Arc<dyn RoutingStrategy>) -> Self {
        info!(
            strategy = strategy.name(),
            handlers = ?registry.handler_names(),
            "dispatcher ready"
        );
        Self { registry, strategy }
    }

    /// The registry this dispatcher routes to.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Name of the active routing strategy.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Dispatches `event` to every matching handler, in registration order.
    ///
    /// Always completes; handler failures are reported, not returned.
    #[instrument(
        skip_all,
        fields(
            event_id = %event.event_id(),
            event_type = event.event_type(),
            strategy = self.strategy.name(),
        )
    )]
    pub async fn dispatch(&self, event: &DomainEvent) -> DispatchReport {
        info!("processing event");

        let mut report = DispatchReport {
            event_id: Some(event.event_id()),
            event_type: event.event_type(),
            ..DispatchReport::default()
        };

        for handler in self.registry.iter() {
            let name = handler.handler_name();
            match self.strategy.deliver(event, handler.as_ref()).await {
                Delivery::Skipped => {
                    report.skipped += 1;
                }
                Delivery::Completed => {
                    debug!(handler = name, "handler completed");
                    report.invoked.push(name.to_owned());
                }
                Delivery::Failed(err) => {
                    error!(handler = name, error = %err, "handler failed processing event");
                    report.invoked.push(name.to_owned());
                    report.failures.push(HandlerFailure {
                        handler: name.to_owned(),
                        error: err,
                    });
                }
            }
        }

        info!(
            invoked = report.invoked_count(),
            skipped = report.skipped,
            failed = report.failures.len(),
            "finished processing event"
        );
        report
    }

    /// Dispatches an event that may be absent.
    ///
    /// `None` is ignored: no handler runs and an empty report is returned.
    pub async fn dispatch_optional(&self, event: Option<&DomainEvent>) -> DispatchReport {
        match event {
            Some(event) => self.dispatch(event).await,
            None => {
                debug!("received no event, ignoring");
                DispatchReport::empty()
            }
        }
    }

    /// Names of the handlers `dispatch` would invoke for `event`, in order,
    /// without invoking anything.
    #[must_use]
    pub fn matching_handlers(&self, event: &DomainEvent) -> Vec<&str> {
        self.registry
            .iter()
            .filter(|&handler| self.strategy.matches(event, handler.as_ref()))
            .map(|handler| handler.handler_name())
            .collect()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
