//! Customer notifications. Messages are logged, not sent.

use async_trait::async_trait;
use storefront_core::error::DomainError;
use storefront_core::event::{EventMetadata, PaymentReceived, UserRegistered};
use storefront_core::handler::{EventHandler, PaymentReceivedHandler, UserRegisteredHandler};
use tracing::{info, instrument};

/// Greets new users and tells customers how their payment went.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationService;

impl NotificationService {
    /// Handler name used in diagnostics.
    pub const NAME: &'static str = "notification";
}

#[async_trait]
impl UserRegisteredHandler for NotificationService {
    #[instrument(skip_all, fields(handler = Self::NAME, user_id = event.user_id()))]
    async fn on_user_registered(
        &self,
        _metadata: &EventMetadata,
        event: &UserRegistered,
    ) -> Result<(), DomainError> {
        info!(email = event.email(), "sending welcome email");
        Ok(())
    }
}

#[async_trait]
impl PaymentReceivedHandler for NotificationService {
    #[instrument(skip_all, fields(handler = Self::NAME, order_id = event.order_id()))]
    async fn on_payment_received(
        &self,
        _metadata: &EventMetadata,
        event: &PaymentReceived,
    ) -> Result<(), DomainError> {
        if event.status().is_success() {
            info!(
                payment_id = event.payment_id(),
                amount = event.amount(),
                "sending payment confirmation"
            );
        } else {
            info!(
                payment_id = event.payment_id(),
                "sending payment failure notice"
            );
        }
        Ok(())
    }
}

impl EventHandler for NotificationService {
    fn handler_name(&self) -> &str {
        Self::NAME
    }

    fn as_user_registered(&self) -> Option<&dyn UserRegisteredHandler> {
        Some(self)
    }

    fn as_payment_received(&self) -> Option<&dyn PaymentReceivedHandler> {
        Some(self)
    }
}
