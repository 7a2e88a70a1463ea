//! # Payment Initiation
//!
//! Charge-intent types and the `PaymentProcessor` trait.
//! Implementations: Stripe PaymentIntents (`carts-stripe`).

use crate::error::{CartsError, CartsResult};
use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;

/// Currency every charge is made in
pub const CHARGE_CURRENCY: &str = "usd";

/// Payment method types a charge is restricted to
pub const CARD_ONLY: &[&str] = &["card"];

/// Amount in the processor's minor unit (cents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChargeAmount(i64);

impl ChargeAmount {
    /// Convert a decimal price to cents, truncating fractions of a cent.
    ///
    /// Only JSON numbers are accepted. The number's decimal text is used,
    /// so `19.99` becomes exactly `1999`.
    pub fn from_price(price: &Value) -> CartsResult<Self> {
        let number = match price {
            Value::Number(n) => n,
            Value::Null => return Err(CartsError::InvalidAmount("price is required".into())),
            other => {
                return Err(CartsError::InvalidAmount(format!(
                    "price must be a number, got {}",
                    other
                )))
            }
        };

        let text = number.to_string();
        let decimal = Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| CartsError::InvalidAmount(format!("price {} is out of range", text)))?;

        if decimal <= Decimal::ZERO {
            return Err(CartsError::InvalidAmount(format!(
                "price must be positive, got {}",
                text
            )));
        }

        let cents = decimal
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|d| d.trunc())
            .and_then(|d| d.to_i64())
            .ok_or_else(|| CartsError::InvalidAmount(format!("price {} is out of range", text)))?;

        if cents < 1 {
            return Err(CartsError::InvalidAmount(format!(
                "price {} is below the smallest chargeable unit",
                text
            )));
        }

        Ok(Self(cents))
    }

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }
}

/// A request for a new charge intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentRequest {
    pub amount: ChargeAmount,
    pub currency: &'static str,
    pub payment_method_types: Vec<&'static str>,
}

impl IntentRequest {
    /// Card-only charge in the fixed currency
    pub fn card(amount: ChargeAmount) -> Self {
        Self {
            amount,
            currency: CHARGE_CURRENCY,
            payment_method_types: CARD_ONLY.to_vec(),
        }
    }
}

/// A charge intent created by the processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Processor's intent id
    pub id: String,
    /// Secret the client uses to complete the payment
    pub client_secret: String,
}

/// Payment processor able to create charge intents.
///
/// No idempotency key is sent: calling twice creates two intents.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a charge intent and return its client secret
    async fn create_intent(&self, request: &IntentRequest) -> CartsResult<PaymentIntent>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment processor (dynamic dispatch)
pub type BoxedPaymentProcessor = Arc<dyn PaymentProcessor>;
