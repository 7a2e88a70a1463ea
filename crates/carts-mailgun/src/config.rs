//! # Mailgun Configuration
//!
//! API key, sending domain and sender address, loaded from the environment.

use carts_core::CartsError;
use std::env;

const DEFAULT_API_BASE_URL: &str = "https://api.mailgun.net";

/// Mailgun API configuration
#[derive(Clone)]
pub struct MailgunConfig {
    /// Private API key
    pub api_key: String,

    /// Sending domain (e.g. "mg.example.com")
    pub domain: String,

    /// `From` address on every message
    pub sender: String,

    /// API base URL (EU accounts use https://api.eu.mailgun.net)
    pub api_base_url: String,
}

impl MailgunConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `MAILGUN_API_KEY`
    /// - `MAILGUN_DOMAIN`
    /// - `EMAIL_SENDER`
    ///
    /// Optional: `MAILGUN_API_BASE`
    pub fn from_env() -> Result<Self, CartsError> {
        dotenvy::dotenv().ok();

        let api_key = required("MAILGUN_API_KEY")?;
        let domain = required("MAILGUN_DOMAIN")?;
        let sender = required("EMAIL_SENDER")?;

        let mut config = Self::new(api_key, domain, sender);
        if let Ok(base) = env::var("MAILGUN_API_BASE") {
            config.api_base_url = base;
        }
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        api_key: impl Into<String>,
        domain: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            domain: domain.into(),
            sender: sender.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Endpoint for sending messages on this domain
    pub fn messages_url(&self) -> String {
        format!("{}/v3/{}/messages", self.api_base_url, self.domain)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

fn required(name: &str) -> Result<String, CartsError> {
    env::var(name).map_err(|_| CartsError::Configuration(format!("{} not set", name)))
}

impl std::fmt::Debug for MailgunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunConfig")
            .field("api_key", &"[redacted]")
            .field("domain", &self.domain)
            .field("sender", &self.sender)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}
