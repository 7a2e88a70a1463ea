//! # Mailgun Mailer
//!
//! Sends messages through the Mailgun HTTP API.

use crate::config::MailgunConfig;
use async_trait::async_trait;
use carts_core::{CartsError, CartsResult, Mailer, OutgoingEmail};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info, instrument};

const PROVIDER: &str = "mailgun";

/// Mail relay backed by Mailgun
pub struct MailgunMailer {
    config: MailgunConfig,
    client: Client,
}

impl MailgunMailer {
    pub fn new(config: MailgunConfig) -> CartsResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CartsError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CartsResult<Self> {
        Self::new(MailgunConfig::from_env()?)
    }
}

#[async_trait]
impl Mailer for MailgunMailer {
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: &OutgoingEmail) -> CartsResult<()> {
        let form = vec![
            ("from", self.config.sender.as_str()),
            ("to", email.to.as_str()),
            ("subject", email.subject.as_str()),
            ("text", email.text.as_str()),
            ("html", email.html.as_str()),
        ];

        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth("api", Some(&self.config.api_key))
            .form(&form)
            .send()
            .await
            .map_err(|e| CartsError::upstream(PROVIDER, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CartsError::upstream(PROVIDER, e))?;

        if !status.is_success() {
            error!("Mailgun API error: status={}, body={}", status, body);
            return Err(CartsError::upstream(
                PROVIDER,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let queued = serde_json::from_str::<MailgunSendResponse>(&body).ok();
        info!(
            message_id = queued.as_ref().map_or("", |q| q.id.as_str()),
            "Email queued"
        );
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[derive(Debug, Deserialize)]
struct MailgunSendResponse {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mailer(server: &MockServer) -> MailgunMailer {
        let config = MailgunConfig::new("key-123", "mg.carts.test", "orders@carts.test")
            .with_api_base_url(server.uri());
        MailgunMailer::new(config).unwrap()
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "a@b.com".to_string(),
            subject: "Your order has been shipped".to_string(),
            text: "On its way".to_string(),
            html: "<p>On its way</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/mg.carts.test/messages"))
            .and(header("authorization", "Basic YXBpOmtleS0xMjM="))
            .and(body_string_contains("from=orders%40carts.test"))
            .and(body_string_contains("to=a%40b.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "<20240101.1@mg.carts.test>",
                "message": "Queued. Thank you."
            })))
            .expect(1)
            .mount(&server)
            .await;

        mailer(&server).send(&email()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_send_is_upstream_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Forbidden"))
            .mount(&server)
            .await;

        let err = mailer(&server).send(&email()).await.unwrap_err();
        assert!(matches!(err, CartsError::Upstream { ref service, .. } if service == "mailgun"));
    }
}
