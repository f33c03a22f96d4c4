//! Storefront simulator entry point.

use std::error::Error;
use std::sync::Arc;

use storefront_core::clock::SystemClock;
use storefront_dispatch::{Dispatcher, HandlerRegistry};
use storefront_handlers::{ReferenceHandlers, strategy_for};
use storefront_simulator::{FrontendSimulator, LogFormat, SimulatorConfig, StdDeterministicRng};
use storefront_store::InMemoryStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Read configuration from environment.
    let config = SimulatorConfig::from_env()?;

    // Initialize tracing subscriber.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        strategy = %config.strategy,
        events = config.events,
        delay_ms = u64::try_from(config.delay.as_millis()).unwrap_or(u64::MAX),
        seed = ?config.seed,
        "Starting storefront simulation"
    );

    // Wire storage, handlers and the dispatcher.
    let store = Arc::new(InMemoryStore::new());
    let handlers = ReferenceHandlers::new(store.clone(), store.clone());
    let mut registry = HandlerRegistry::new();
    handlers.register_all(&mut registry);
    let dispatcher = Dispatcher::new(registry, strategy_for(config.strategy));

    // Run the simulation.
    let mut simulator = FrontendSimulator::new(
        dispatcher,
        Box::new(StdDeterministicRng::from_seed_option(config.seed)),
        Arc::new(SystemClock),
    );
    let summary = simulator.run(config.events, config.delay).await?;

    // Dump storage contents.
    let entries = store.audit_entries().await;
    if entries.is_empty() {
        tracing::info!("no audit log entries");
    }
    for entry in &entries {
        tracing::info!(
            id = entry.id,
            time = %entry.occurred_at.format("%Y-%m-%d %H:%M:%S"),
            event_id = %entry.event_id,
            event_type = %entry.event_type,
            details = %entry.details,
            "audit log entry"
        );
    }

    let orders = store.orders().await;
    if orders.is_empty() {
        tracing::info!("no orders");
    }
    for order in &orders {
        let amount = format!("{:.2}", order.total_amount);
        tracing::info!(
            id = order.id,
            order_id = %order.order_id,
            user_id = %order.user_id,
            status = %order.status,
            amount = %amount,
            time = %order.placed_at.format("%Y-%m-%d %H:%M:%S"),
            "order"
        );
    }

    tracing::info!(
        dispatched = summary.dispatched,
        skipped = summary.skipped,
        handler_failures = summary.handler_failures,
        audit_entries = entries.len(),
        orders = orders.len(),
        "Simulation complete"
    );

    Ok(())
}
