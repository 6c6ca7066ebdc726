//! Card payments for membership purchases.

use std::fmt::Debug;

use rand::Rng;
use uuid::Uuid;

use crate::error::LedgerError;

/// A settled charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    /// Provider payment id.
    pub id: String,
    /// Amount charged, in cents.
    pub amount_cents: u64,
    /// ISO currency code.
    pub currency: &'static str,
}

/// Errors raised by a [`PaymentGateway`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    /// The charge was declined.
    #[error("payment declined, please try again")]
    Declined,
    /// The amount cannot be charged.
    #[error("invalid amount: {0}")]
    InvalidAmount(u64),
}

impl From<PaymentError> for LedgerError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Declined => Self::PaymentDeclined(err.to_string()),
            PaymentError::InvalidAmount(_) => Self::InvalidRequest(err.to_string()),
        }
    }
}

/// Charges a member's card.
pub trait PaymentGateway: Send + Sync + Debug {
    /// Charges `amount_cents`.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] if the charge did not settle.
    fn charge(&self, amount_cents: u64) -> Result<PaymentIntent, PaymentError>;
}

/// Gateway that settles a charge with a fixed probability.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedPayments {
    success_rate: f64,
}

impl SimulatedPayments {
    /// Creates a gateway succeeding with probability `success_rate`,
    /// clamped to `[0, 1]`.
    #[must_use]
    pub fn new(success_rate: f64) -> Self {
        let success_rate = if success_rate.is_nan() {
            0.0
        } else {
            success_rate.clamp(0.0, 1.0)
        };
        Self { success_rate }
    }

    /// Probability that a charge succeeds.
    #[must_use]
    pub const fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

impl Default for SimulatedPayments {
    fn default() -> Self {
        Self::new(0.95)
    }
}

impl PaymentGateway for SimulatedPayments {
    fn charge(&self, amount_cents: u64) -> Result<PaymentIntent, PaymentError> {
        if amount_cents == 0 {
            return Err(PaymentError::InvalidAmount(amount_cents));
        }
        let mut rng = rand::rng();
        if !rng.random_bool(self.success_rate) {
            tracing::warn!(amount_cents, "simulated payment declined");
            return Err(PaymentError::Declined);
        }
        let intent = PaymentIntent {
            id: format!("pi_mock_{}", Uuid::new_v4().simple()),
            amount_cents,
            currency: "usd",
        };
        tracing::info!(payment_id = %intent.id, amount_cents, "payment settled");
        Ok(intent)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn certain_success_settles() {
        let gateway = SimulatedPayments::new(1.0);
        let Ok(intent) = gateway.charge(15_000) else {
            panic!("charge should settle");
        };
        assert_eq!(intent.amount_cents, 15_000);
        assert!(intent.id.starts_with("pi_mock_"));
    }

    #[test]
    fn zero_rate_always_declines() {
        let gateway = SimulatedPayments::new(0.0);
        assert_eq!(gateway.charge(2_000), Err(PaymentError::Declined));
    }

    #[test]
    fn rate_is_clamped() {
        assert!((SimulatedPayments::new(3.0).success_rate() - 1.0).abs() < f64::EPSILON);
        assert!(SimulatedPayments::new(-1.0).success_rate().abs() < f64::EPSILON);
        assert!(SimulatedPayments::new(f64::NAN).success_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn decline_maps_to_payment_required() {
        let err = LedgerError::from(PaymentError::Declined);
        assert_eq!(err.status_code(), axum::http::StatusCode::PAYMENT_REQUIRED);
        let err = LedgerError::from(PaymentError::InvalidAmount(0));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
