//! # carts-mongo
//!
//! MongoDB `DocumentStore` for the Carts backend.
//!
//! ```rust,ignore
//! use carts_core::ResourceStore;
//! use carts_mongo::{MongoConfig, MongoStore};
//!
//! let store = MongoStore::connect(&MongoConfig::from_env()?).await?;
//! let store = ResourceStore::new(Arc::new(store));
//! ```

pub mod config;
pub mod store;

pub use config::MongoConfig;
pub use store::MongoStore;
