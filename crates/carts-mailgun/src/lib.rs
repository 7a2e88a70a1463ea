//! # carts-mailgun
//!
//! Mailgun mail relay for the Carts backend.
//!
//! ```rust,ignore
//! use carts_core::{Mailer, ShipmentConfirmation};
//! use carts_mailgun::MailgunMailer;
//!
//! let mailer = MailgunMailer::from_env()?;
//! if let Some(notice) = ShipmentConfirmation::from_payload(&payload) {
//!     mailer.send(&notice.render()).await?;
//! }
//! ```

pub mod config;
pub mod mailer;

pub use config::MailgunConfig;
pub use mailer::MailgunMailer;
