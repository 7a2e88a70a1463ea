//! # Application State
//!
//! Shared state for the Axum application.
//! Every long-lived resource (store connection, payment processor, mail
//! relay, token keys) is created once at startup and injected here.

use crate::auth::TokenKeys;
use crate::notify::Notifier;
use anyhow::anyhow;
use carts_core::{
    BoxedDocumentStore, BoxedMailer, BoxedPaymentProcessor, MemoryStore, ResourceStore,
};
use carts_mailgun::MailgunMailer;
use carts_mongo::{MongoConfig, MongoStore};
use carts_stripe::StripePaymentIntents;
use std::sync::Arc;

/// Which `DocumentStore` backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("Unknown STORE_BACKEND: {}", other)),
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Secret used to sign and verify bearer tokens
    pub token_secret: String,
    /// Record store backend
    pub store_backend: StoreBackend,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let token_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| anyhow!("ACCESS_TOKEN_SECRET not set"))?;

        let store_backend = match std::env::var("STORE_BACKEND") {
            Ok(value) => StoreBackend::parse(&value)?,
            Err(_) => StoreBackend::Mongo,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            token_secret,
            store_backend,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("token_secret", &"[redacted]")
            .field("store_backend", &self.store_backend)
            .finish()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Record collections
    pub store: ResourceStore,
    /// Payment processor
    pub payments: BoxedPaymentProcessor,
    /// Fire-and-forget email dispatcher
    pub notifier: Notifier,
    /// Bearer token signing/verification keys
    pub tokens: TokenKeys,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Assemble state from already-initialised resources
    pub fn new(
        config: AppConfig,
        store: BoxedDocumentStore,
        payments: BoxedPaymentProcessor,
        mailer: BoxedMailer,
    ) -> Self {
        Self {
            store: ResourceStore::new(store),
            payments,
            notifier: Notifier::new(mailer),
            tokens: TokenKeys::new(&config.token_secret),
            config,
        }
    }

    /// Initialise every resource from the environment
    pub async fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let store: BoxedDocumentStore = match config.store_backend {
            StoreBackend::Mongo => {
                let mongo_config = MongoConfig::from_env()
                    .map_err(|e| anyhow!("Failed to configure MongoDB: {}", e))?;
                let store = MongoStore::connect(&mongo_config)
                    .await
                    .map_err(|e| anyhow!("Failed to connect to MongoDB: {}", e))?;
                Arc::new(store)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store, records are lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let payments = StripePaymentIntents::from_env()
            .map_err(|e| anyhow!("Failed to initialize Stripe: {}", e))?;

        let mailer =
            MailgunMailer::from_env().map_err(|e| anyhow!("Failed to initialize Mailgun: {}", e))?;

        Ok(Self::new(config, store, Arc::new(payments), Arc::new(mailer)))
    }

    /// Release resources on shutdown
    pub async fn close(&self) {
        self.store.close().await;
    }
}
