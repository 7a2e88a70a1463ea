//! # carts-core
//!
//! Core types and traits for the Carts storefront backend.
//!
//! This crate provides:
//! - `CartsError` for typed error handling
//! - `Collection`, `RecordId` and `Filter` for addressing stored records
//! - `DocumentStore` trait and the `ResourceStore` access layer
//! - `MemoryStore`, an in-process `DocumentStore`
//! - `Role` rules for administrator checks
//! - `PaymentProcessor` trait and `ChargeAmount` conversion
//! - `Mailer` trait and the confirmation email templates
//!
//! ## Example
//!
//! ```rust,ignore
//! use carts_core::{Collection, MemoryStore, ResourceStore};
//! use serde_json::json;
//!
//! let store = ResourceStore::new(Arc::new(MemoryStore::new()));
//! store.insert_one(Collection::Parts, json!({"name": "Widget"})).await?;
//!
//! // Most recently inserted first
//! let parts = store.list_newest_first(Collection::Parts).await?;
//! ```

pub mod error;
pub mod mail;
pub mod memory;
pub mod payment;
pub mod record;
pub mod role;
pub mod store;

// Re-exports for convenience
pub use error::{CartsError, CartsResult, GENERIC_SERVER_ERROR};
pub use mail::{BoxedMailer, Mailer, OutgoingEmail, PaymentConfirmation, ShipmentConfirmation};
pub use memory::MemoryStore;
pub use payment::{
    BoxedPaymentProcessor, ChargeAmount, IntentRequest, PaymentIntent, PaymentProcessor,
    CHARGE_CURRENCY,
};
pub use record::{
    as_document, Collection, DeleteOutcome, Filter, InsertOutcome, RecordId, UpdateOutcome,
    ID_FIELD,
};
pub use role::{is_admin, Role, ADMIN_ROLE, ROLE_FIELD};
pub use store::{BoxedDocumentStore, DocumentStore, ResourceStore};
