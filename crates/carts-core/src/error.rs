//! # Error Types
//!
//! Typed error handling for the Carts backend.
//! Every store, payment, mail and auth operation returns `Result<T, CartsError>`.

use thiserror::Error;

/// Message shown to callers for any server-side failure
pub const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// Core error type for the storefront backend
#[derive(Debug, Error)]
pub enum CartsError {
    /// No credential was presented
    #[error("Unauthorized access")]
    Unauthenticated,

    /// Credential failed verification or has expired
    #[error("Forbidden access: {0}")]
    InvalidToken(String),

    /// Authenticated, but not allowed to perform the operation
    #[error("Forbidden access: {0}")]
    Forbidden(String),

    /// Price is missing, non-numeric or not positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Path identifier is not a valid record id
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Body is not a document the store can accept
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database, payment processor or mail relay failure
    #[error("Upstream error [{service}]: {message}")]
    Upstream { service: String, message: String },

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CartsError {
    /// Build an upstream failure for the named service
    pub fn upstream(service: impl Into<String>, message: impl ToString) -> Self {
        CartsError::Upstream {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CartsError::Unauthenticated => 401,
            CartsError::InvalidToken(_) => 403,
            CartsError::Forbidden(_) => 403,
            CartsError::InvalidAmount(_) => 400,
            CartsError::InvalidIdentifier(_) => 400,
            CartsError::InvalidDocument(_) => 400,
            CartsError::Configuration(_) => 500,
            CartsError::Upstream { .. } => 500,
            CartsError::Internal(_) => 500,
        }
    }

    /// Returns true if the failure happened on our side of the request
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Text that may be shown to the caller.
    ///
    /// Server-side failures collapse to a generic message so no
    /// connection strings or provider responses leak out.
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            GENERIC_SERVER_ERROR.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Result type alias for backend operations
pub type CartsResult<T> = Result<T, CartsError>;
