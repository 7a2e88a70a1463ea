//! # carts-stripe
//!
//! Stripe payment processor for the Carts backend.
//!
//! Creates card-only PaymentIntents in USD and hands the intent's
//! `client_secret` back to the storefront, which confirms the payment
//! with Stripe.js.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use carts_core::{ChargeAmount, IntentRequest, PaymentProcessor};
//! use carts_stripe::StripePaymentIntents;
//!
//! // Create processor from environment
//! let stripe = StripePaymentIntents::from_env()?;
//!
//! let amount = ChargeAmount::from_price(&serde_json::json!(19.99))?;
//! let intent = stripe.create_intent(&IntentRequest::card(amount)).await?;
//!
//! // Send intent.client_secret to the browser
//! ```

pub mod config;
pub mod intent;

// Re-exports
pub use config::StripeConfig;
pub use intent::StripePaymentIntents;
