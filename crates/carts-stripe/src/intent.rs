//! # Stripe Payment Intents
//!
//! Implementation of the Stripe PaymentIntents API.
//! The client completes the charge with the returned `client_secret`.

use crate::config::StripeConfig;
use async_trait::async_trait;
use carts_core::{CartsError, CartsResult, IntentRequest, PaymentIntent, PaymentProcessor};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe PaymentIntents processor
pub struct StripePaymentIntents {
    config: StripeConfig,
    client: Client,
}

impl StripePaymentIntents {
    /// Create a new processor
    pub fn new(config: StripeConfig) -> CartsResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CartsError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CartsResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Form body for `POST /v1/payment_intents`
    fn form_params(request: &IntentRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("amount", request.amount.cents().to_string()),
            ("currency", request.currency.to_string()),
        ];
        for method in &request.payment_method_types {
            params.push(("payment_method_types[]", method.to_string()));
        }
        params
    }
}

#[async_trait]
impl PaymentProcessor for StripePaymentIntents {
    #[instrument(skip(self, request), fields(amount = request.amount.cents(), currency = request.currency))]
    async fn create_intent(&self, request: &IntentRequest) -> CartsResult<PaymentIntent> {
        debug!("Creating Stripe payment intent");

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&Self::form_params(request))
            .send()
            .await
            .map_err(|e| CartsError::upstream(PROVIDER, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CartsError::upstream(PROVIDER, e))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            // Parse Stripe error
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(CartsError::upstream(PROVIDER, error_response.error.message));
            }

            return Err(CartsError::upstream(
                PROVIDER,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let intent: StripePaymentIntentResponse = serde_json::from_str(&body).map_err(|e| {
            CartsError::upstream(PROVIDER, format!("Failed to parse Stripe response: {}", e))
        })?;

        info!("Created Stripe payment intent: id={}", intent.id);

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
