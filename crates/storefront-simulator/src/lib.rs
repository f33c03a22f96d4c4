//! Storefront — frontend simulator.
//!
//! Produces a stream of random storefront events, pushes each one through
//! the dispatcher and waits for it before producing the next.

pub mod config;
pub mod error;
pub mod rng;
pub mod simulator;

pub use config::{LogFormat, SimulatorConfig};
pub use error::AppError;
pub use rng::StdDeterministicRng;
pub use simulator::{FrontendSimulator, PRODUCT_CATALOGUE, SimulationSummary};
