use crate::domain::ports::{InvoiceProviderRef, InvoiceRequest};
use crate::error::{RelayError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Requests hosted payment pages from the provider.
pub struct InvoiceService {
    provider: InvoiceProviderRef,
}

impl InvoiceService {
    pub fn new(provider: InvoiceProviderRef) -> Self {
        Self { provider }
    }

    /// Creates an invoice for the order and returns the redirect URL.
    ///
    /// Validation happens before the provider is contacted. The amount is
    /// converted to the provider's minor-unit integer representation
    /// (multiplied by 100 and rounded to the nearest integer) — a documented
    /// lossy step.
    pub async fn create(&self, order_id: Option<&str>, amount: Option<&str>) -> Result<String> {
        let order_id = match order_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err(RelayError::Validation("orderId is required".to_string())),
        };
        let amount = amount
            .ok_or_else(|| RelayError::Validation("amount is required".to_string()))?;
        let amount: Decimal = amount
            .trim()
            .parse()
            .map_err(|_| RelayError::Validation(format!("amount is not numeric: {amount}")))?;
        if amount <= Decimal::ZERO {
            return Err(RelayError::Validation("amount must be positive".to_string()));
        }

        let minor = (amount * Decimal::from(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| RelayError::Validation("amount out of range".to_string()))?;

        self.provider
            .create_invoice(InvoiceRequest {
                amount_minor: minor,
                reference: order_id.to_string(),
            })
            .await
    }
}
