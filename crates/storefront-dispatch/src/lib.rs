//! Storefront — in-process event dispatch.
//!
//! Routes immutable domain events to an ordered set of registered handlers.
//! Handlers for one event run strictly one after another; a failing handler
//! is recorded and never stops the rest. Which handlers match an event is
//! decided by a pluggable [`strategy::RoutingStrategy`].

pub mod dispatcher;
pub mod registry;
pub mod report;
pub mod strategy;

pub use dispatcher::Dispatcher;
pub use registry::HandlerRegistry;
pub use report::{DispatchReport, HandlerFailure};
pub use strategy::{CapabilityProbe, DispatchStrategy, RoutingStrategy};
