//! # Transactional Email
//!
//! The `Mailer` trait and the two confirmation templates sent after an
//! order is paid or shipped.

use crate::error::{CartsError, CartsResult};
use askama::Template;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// A rendered email ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Transactional mail relay
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message. The sender address belongs to the mailer.
    async fn send(&self, email: &OutgoingEmail) -> CartsResult<()>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared mailer (dynamic dispatch)
pub type BoxedMailer = Arc<dyn Mailer>;

/// Render a payload field for display; missing fields render empty
fn field(payload: &Value, name: &str) -> String {
    match payload.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Recipient address, if the payload names one
fn recipient(payload: &Value) -> Option<String> {
    payload
        .get("email")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Sent after an order's payment is recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub email: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub product_name: String,
    pub quantity: String,
    pub total_price: String,
    pub transition_id: String,
}

impl PaymentConfirmation {
    /// Read the order-payment payload. `None` when it names no recipient.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        Some(Self {
            email: recipient(payload)?,
            name: field(payload, "name"),
            address: field(payload, "address"),
            phone: field(payload, "phone"),
            product_name: field(payload, "productName"),
            quantity: field(payload, "quantity"),
            total_price: field(payload, "totalPrice"),
            transition_id: field(payload, "transitionId"),
        })
    }

    pub fn render(&self) -> CartsResult<OutgoingEmail> {
        Ok(OutgoingEmail {
            to: self.email.clone(),
            subject: format!("We have received your payment for {}", self.product_name),
            text: PaymentConfirmationText { order: self }.render().map_err(template_error)?,
            html: PaymentConfirmationHtml { order: self }.render().map_err(template_error)?,
        })
    }
}

/// Sent after an order is marked shipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentConfirmation {
    pub email: String,
    pub address: String,
}

impl ShipmentConfirmation {
    /// Read the shipment payload. `None` when it names no recipient.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        Some(Self {
            email: recipient(payload)?,
            address: field(payload, "address"),
        })
    }

    pub fn render(&self) -> CartsResult<OutgoingEmail> {
        Ok(OutgoingEmail {
            to: self.email.clone(),
            subject: "Your order has been shipped".to_string(),
            text: ShipmentConfirmationText { shipment: self }.render().map_err(template_error)?,
            html: ShipmentConfirmationHtml { shipment: self }.render().map_err(template_error)?,
        })
    }
}

// =============================================================================
// Templates
// =============================================================================

/// HTML body of the payment confirmation.
#[derive(Template)]
#[template(path = "email/payment_confirmation.html")]
struct PaymentConfirmationHtml<'a> {
    order: &'a PaymentConfirmation,
}

/// Plain text body of the payment confirmation.
#[derive(Template)]
#[template(path = "email/payment_confirmation.txt")]
struct PaymentConfirmationText<'a> {
    order: &'a PaymentConfirmation,
}

/// HTML body of the shipment confirmation.
#[derive(Template)]
#[template(path = "email/shipment_confirmation.html")]
struct ShipmentConfirmationHtml<'a> {
    shipment: &'a ShipmentConfirmation,
}

/// Plain text body of the shipment confirmation.
#[derive(Template)]
#[template(path = "email/shipment_confirmation.txt")]
struct ShipmentConfirmationText<'a> {
    shipment: &'a ShipmentConfirmation,
}

fn template_error(e: askama::Error) -> CartsError {
    CartsError::Internal(format!("Template error: {}", e))
}
