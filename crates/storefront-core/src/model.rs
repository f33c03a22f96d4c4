//! Value objects carried by domain events.

use std::fmt;

use serde::Serialize;

use crate::error::DomainError;

/// Rejects empty or whitespace-only identifiers.
pub(crate) fn require_non_empty(
    field: &str,
    value: impl Into<String>,
) -> Result<String, DomainError> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    Ok(value)
}

/// Rejects negative, NaN and infinite amounts.
pub(crate) fn require_non_negative(field: &str, value: f64) -> Result<f64, DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::Validation(format!(
            "{field} must be a non-negative amount, got {value}"
        )));
    }
    Ok(value)
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    product_id: String,
    quantity: u32,
    unit_price: f64,
}

impl OrderItem {
    /// Creates an order line.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `product_id` is blank, `quantity`
    /// is zero, or `unit_price` is negative or not finite.
    pub fn new(
        product_id: impl Into<String>,
        quantity: u32,
        unit_price: f64,
    ) -> Result<Self, DomainError> {
        let product_id = require_non_empty("product_id", product_id)?;
        if quantity == 0 {
            return Err(DomainError::Validation("quantity must be positive".to_owned()));
        }
        let unit_price = require_non_negative("unit_price", unit_price)?;
        Ok(Self {
            product_id,
            quantity,
            unit_price,
        })
    }

    /// The product identifier.
    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Number of units ordered.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of a single unit.
    #[must_use]
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

impl fmt::Display for OrderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Product: {}, Qty: {}, Price: {:.2}",
            self.product_id, self.quantity, self.unit_price
        )
    }
}

/// Outcome reported by the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentStatus {
    /// The payment was captured.
    Success,
    /// The payment was declined or errored.
    Failure,
}

impl PaymentStatus {
    /// Returns `true` for [`PaymentStatus::Success`].
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("Success"),
            Self::Failure => f.write_str("Failure"),
        }
    }
}
