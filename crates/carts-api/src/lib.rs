//! # carts-api
//!
//! HTTP API layer for the Carts storefront backend.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints over parts, reviews, orders, users and profiles
//! - Bearer-token issue and verification
//! - Payment intent creation and confirmation emails
//!
//! ## Endpoints
//!
//! | Method | Path | Access | Description |
//! |--------|------|--------|-------------|
//! | GET | `/` | public | Liveness text |
//! | GET | `/part` | public | List parts, newest first |
//! | GET | `/part/{id}` | auth | Get part |
//! | POST | `/part` | admin | Create part |
//! | DELETE | `/part/{id}` | admin | Delete part |
//! | GET | `/review` | public | List reviews, newest first |
//! | POST | `/review` | auth | Create review |
//! | GET | `/order?email=` | auth | Caller's orders |
//! | GET | `/order/{id}` | auth | Get order |
//! | GET | `/all-order` | admin | Every order |
//! | POST | `/order` | auth | Create order |
//! | PATCH | `/order/{id}` | auth | Record payment, email confirmation |
//! | PATCH | `/all-order/{id}` | admin | Mark paid and shipped, email customer |
//! | DELETE | `/order/{id}` | auth | Delete order |
//! | GET | `/user` | admin | Every user |
//! | GET | `/user/{id}` | auth | Get user |
//! | PUT | `/user/{email}` | public | Upsert user, returns `{result, secretToken}` |
//! | GET | `/user/admin/{email}` | auth | `{admin: bool}` |
//! | PATCH | `/user/admin/{email}` | auth | Grant admin role |
//! | GET | `/profile?email=` | auth | Caller's profile |
//! | PATCH | `/profile/{email}` | auth | Upsert profile |
//! | POST | `/create-payment-intent` | auth | `{price}` to `{clientSecret}` |

pub mod auth;
pub mod error;
pub mod handlers;
pub mod notify;
pub mod routes;
pub mod state;

pub use auth::{Admin, Authenticated, Claims, TokenKeys};
pub use error::{ApiError, ApiJson, ApiResult, ErrorResponse};
pub use notify::{NotificationKind, Notifier};
pub use routes::create_router;
pub use state::{AppConfig, AppState, StoreBackend};
