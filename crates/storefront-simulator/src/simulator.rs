//! Random storefront traffic.
//!
//! Each tick picks one of the three event kinds at random. Orders need at
//! least one registered user and payments need at least one placed order;
//! when the precondition is missing the tick produces nothing.

use std::sync::Arc;
use std::time::Duration;

use storefront_core::clock::Clock;
use storefront_core::error::DomainError;
use storefront_core::event::DomainEvent;
use storefront_core::model::{OrderItem, PaymentStatus};
use storefront_core::rng::DeterministicRng;
use storefront_dispatch::Dispatcher;
use tracing::{info, instrument, warn};

/// Products an order line can reference.
pub const PRODUCT_CATALOGUE: [&str; 5] =
    ["prod-abc", "prod-xyz", "prod-def", "prod-123", "prod-789"];

/// Aggregate outcome of a simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationSummary {
    /// Events generated and dispatched.
    pub dispatched: u32,
    /// Ticks that produced no event.
    pub skipped: u32,
    /// Handler failures across all dispatches.
    pub handler_failures: usize,
}

/// Generates events and pushes them through a dispatcher, one at a time.
pub struct FrontendSimulator {
    dispatcher: Dispatcher,
    rng: Box<dyn DeterministicRng>,
    clock: Arc<dyn Clock>,
    user_ids: Vec<String>,
    user_counter: u32,
    order_counter: u32,
    payment_counter: u32,
}

impl FrontendSimulator {
    /// Creates a simulator that owns `dispatcher`.
    #[must_use]
    pub fn new(
        dispatcher: Dispatcher,
        rng: Box<dyn DeterministicRng>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            dispatcher,
            rng,
            clock,
            user_ids: Vec::new(),
            user_counter: 0,
            order_counter: 0,
            payment_counter: 0,
        }
    }

    /// The dispatcher events are sent through.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Runs `events` ticks, awaiting each dispatch and sleeping `delay`
    /// after every tick.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a generated event is malformed.
    #[instrument(skip(self), fields(strategy = self.dispatcher.strategy_name()))]
    pub async fn run(
        &mut self,
        events: u32,
        delay: Duration,
    ) -> Result<SimulationSummary, DomainError> {
        info!("starting frontend simulation");
        let mut summary = SimulationSummary::default();

        for tick in 0..events {
            match self.next_event()? {
                Some(event) => {
                    info!(
                        tick,
                        event_id = %event.event_id(),
                        event_type = event.event_type(),
                        "generated event"
                    );
                    let report = self.dispatcher.dispatch(&event).await;
                    summary.dispatched += 1;
                    summary.handler_failures += report.failures.len();
                }
                None => {
                    info!(tick, "skipped event generation");
                    summary.skipped += 1;
                }
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        info!(
            dispatched = summary.dispatched,
            skipped = summary.skipped,
            handler_failures = summary.handler_failures,
            "frontend simulation complete"
        );
        Ok(summary)
    }

    /// Produces the next event, or `None` when the drawn kind cannot be
    /// generated yet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the generated payload is invalid.
    pub fn next_event(&mut self) -> Result<Option<DomainEvent>, DomainError> {
        match self.rng.next_u32_range(0, 2) {
            0 => self.user_registered().map(Some),
            1 => self.order_placed(),
            _ => self.payment_received(),
        }
    }

    fn user_registered(&mut self) -> Result<DomainEvent, DomainError> {
        self.user_counter += 1;
        let user_id = format!("user-{}", self.user_counter);
        let email = format!("user{}@example.com", self.user_counter);
        self.user_ids.push(user_id.clone());
        DomainEvent::user_registered(user_id, email, &self.clock)
    }

    fn order_placed(&mut self) -> Result<Option<DomainEvent>, DomainError> {
        if self.user_ids.is_empty() {
            warn!("no registered users, cannot place an order");
            return Ok(None);
        }
        self.order_counter += 1;
        let order_id = format!("order-{}", self.order_counter);
        let user_id = self.user_ids[self.rng.next_index(self.user_ids.len())].clone();

        let item_count = self.rng.next_u32_range(1, 3);
        let mut items = Vec::new();
        let mut total = 0.0;
        for _ in 0..item_count {
            let product = PRODUCT_CATALOGUE[self.rng.next_index(PRODUCT_CATALOGUE.len())];
            let quantity = self.rng.next_u32_range(1, 5);
            let price = self.random_amount(999);
            total += f64::from(quantity) * price;
            items.push(OrderItem::new(product, quantity, price)?);
        }

        DomainEvent::order_placed(order_id, user_id, round_cents(total), items, &self.clock)
            .map(Some)
    }

    fn payment_received(&mut self) -> Result<Option<DomainEvent>, DomainError> {
        if self.order_counter == 0 {
            warn!("no placed orders, cannot receive a payment");
            return Ok(None);
        }
        self.payment_counter += 1;
        let order_id = format!("order-{}", self.order_counter);
        let payment_id = format!(
            "pay-{}-{}",
            self.payment_counter,
            self.rng.next_u32_range(1000, 9998)
        );
        let amount = self.random_amount(1499);
        let status = if self.rng.next_u32_range(0, 9) < 8 {
            PaymentStatus::Success
        } else {
            PaymentStatus::Failure
        };

        DomainEvent::payment_received(order_id, payment_id, amount, status, &self.clock).map(Some)
    }

    /// A whole-number scale in `[10, max_scale]` times a fraction, rounded to cents.
    fn random_amount(&mut self, max_scale: u32) -> f64 {
        let scale = self.rng.next_u32_range(10, max_scale);
        round_cents(f64::from(scale) * self.rng.next_f64())
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
