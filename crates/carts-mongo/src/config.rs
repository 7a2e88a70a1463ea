//! # MongoDB Configuration
//!
//! Connection settings, loaded once from the environment.

use carts_core::CartsError;
use std::env;

const DEFAULT_DATABASE: &str = "carts";

/// MongoDB connection configuration
#[derive(Clone)]
pub struct MongoConfig {
    /// Full connection string
    pub uri: String,

    /// Database holding the record collections
    pub database: String,
}

impl MongoConfig {
    /// Load configuration from environment variables.
    ///
    /// `MONGODB_URI` wins when set. Otherwise `DB_USER`, `DB_PASS` and
    /// `DB_HOST` are combined into an SRV connection string.
    /// `DB_NAME` defaults to `carts`.
    pub fn from_env() -> Result<Self, CartsError> {
        dotenvy::dotenv().ok();

        let database = env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DATABASE.to_string());

        if let Ok(uri) = env::var("MONGODB_URI") {
            return Ok(Self { uri, database });
        }

        let user = required("DB_USER")?;
        let pass = required("DB_PASS")?;
        let host = required("DB_HOST")?;

        Ok(Self {
            uri: srv_uri(&user, &pass, &host),
            database,
        })
    }

    /// Create config with an explicit connection string
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
        }
    }
}

fn required(name: &str) -> Result<String, CartsError> {
    env::var(name).map_err(|_| CartsError::Configuration(format!("{} not set", name)))
}

/// Credentials are percent-encoded so `@`, `:` and `/` survive
fn srv_uri(user: &str, pass: &str, host: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?w=majority",
        urlencoding::encode(user),
        urlencoding::encode(pass),
        host
    )
}

impl std::fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoConfig")
            .field("uri", &"[redacted]")
            .field("database", &self.database)
            .finish()
    }
}
