//! Shared test mocks and utilities for the Storefront event dispatch engine.

mod clock;
mod handler;
mod repository;
mod rng;

pub use clock::{FixedClock, fixed_clock};
pub use handler::{InvocationTrace, TraceHandler};
pub use repository::{
    FailingAuditLogRepository, FailingOrderRepository, OrderCall, RecordingAuditLogRepository,
    RecordingOrderRepository,
};
pub use rng::SequenceRng;
