//! Routing strategies.
//!
//! A strategy answers one question for the dispatcher: given this event and
//! this handler, is there a matching callback, and if so, run it. Two
//! interchangeable strategies exist:
//!
//! - [`CapabilityProbe`] (double dispatch): the event probes the handler for
//!   the capability matching its own kind. Open for new handlers.
//! - a type switch, which enumerates (event kind, concrete handler type)
//!   pairs. It lives next to the concrete handlers it knows about, see
//!   `storefront_handlers::TypeSwitch`.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use storefront_core::error::DomainError;
use storefront_core::event::DomainEvent;
use storefront_core::handler::{Delivery, EventHandler};

/// Decides whether a handler matches an event and invokes it.
#[async_trait]
pub trait RoutingStrategy: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Returns `true` if `deliver` would invoke a callback on `handler`.
    fn matches(&self, event: &DomainEvent, handler: &dyn EventHandler) -> bool;

    /// Invokes the matching callback, if any, and awaits it.
    async fn deliver(&self, event: &DomainEvent, handler: &dyn EventHandler) -> Delivery;
}

/// Double-dispatch strategy: delegates to [`DomainEvent::accept`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityProbe;

#[async_trait]
impl RoutingStrategy for CapabilityProbe {
    fn name(&self) -> &'static str {
        DispatchStrategy::CapabilityProbe.as_str()
    }

    fn matches(&self, event: &DomainEvent, handler: &dyn EventHandler) -> bool {
        handler.has_capability(event.kind().capability())
    }

    async fn deliver(&self, event: &DomainEvent, handler: &dyn EventHandler) -> Delivery {
        event.accept(handler).await
    }
}

/// Configuration choice between the two strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchStrategy {
    /// Double dispatch through capability probes.
    #[default]
    CapabilityProbe,
    /// Explicit (event kind, handler type) table.
    TypeSwitch,
}

impl DispatchStrategy {
    /// Canonical configuration value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CapabilityProbe => "capability-probe",
            Self::TypeSwitch => "type-switch",
        }
    }
}

impl fmt::Display for DispatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "capability-probe" | "capability_probe" | "visitor" | "double-dispatch" => {
                Ok(Self::CapabilityProbe)
            }
            "type-switch" | "type_switch" | "conditional" => Ok(Self::TypeSwitch),
            other => Err(DomainError::InvalidArgument(format!(
                "unknown dispatch strategy '{other}', expected 'capability-probe' or 'type-switch'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::handler::Capability;
    use storefront_test_support::{InvocationTrace, TraceHandler, fixed_clock};

    #[test]
    fn test_parse_accepts_aliases_case_insensitively() {
        assert_eq!(
            "Capability-Probe".parse::<DispatchStrategy>().unwrap(),
            DispatchStrategy::CapabilityProbe
        );
        assert_eq!(
            "visitor".parse::<DispatchStrategy>().unwrap(),
            DispatchStrategy::CapabilityProbe
        );
        assert_eq!(
            " TYPE-SWITCH ".parse::<DispatchStrategy>().unwrap(),
            DispatchStrategy::TypeSwitch
        );
        assert_eq!(
            "conditional".parse::<DispatchStrategy>().unwrap(),
            DispatchStrategy::TypeSwitch
        );
    }

    #[test]
    fn test_parse_rejects_unknown_strategy() {
        let result = "round-robin".parse::<DispatchStrategy>();

        match result.unwrap_err() {
            DomainError::InvalidArgument(msg) => assert!(msg.contains("round-robin")),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for strategy in [DispatchStrategy::CapabilityProbe, DispatchStrategy::TypeSwitch] {
            assert_eq!(strategy.to_string().parse::<DispatchStrategy>().unwrap(), strategy);
        }
    }

    #[tokio::test]
    async fn test_capability_probe_matches_only_declared_capability() {
        // Arrange
        let trace = InvocationTrace::new();
        let notifier = TraceHandler::new("notifier", &[Capability::UserRegistered], &trace);
        let clock = fixed_clock();
        let registered = DomainEvent::user_registered("user-1", "u1@example.com", &clock).unwrap();
        let payment = DomainEvent::payment_received(
            "order-1",
            "pay-1",
            1.0,
            storefront_core::model::PaymentStatus::Success,
            &clock,
        )
        .unwrap();

        // Act
        let matched = CapabilityProbe.matches(&registered, &notifier);
        let unmatched = CapabilityProbe.matches(&payment, &notifier);
        let delivery = CapabilityProbe.deliver(&payment, &notifier).await;

        // Assert
        assert!(matched);
        assert!(!unmatched);
        assert_eq!(delivery, Delivery::Skipped);
        assert!(trace.entries().is_empty());
    }
}
