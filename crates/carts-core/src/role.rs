//! # Roles
//!
//! A user's role is one free-text field with a single privileged value.

use serde_json::Value;

/// The only role value that grants administrator access
pub const ADMIN_ROLE: &str = "admin";

/// Field of a user record holding the role
pub const ROLE_FIELD: &str = "role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    /// Role of a stored user record. Anything but exactly `"admin"` is a customer.
    pub fn of(user: &Value) -> Self {
        match user.get(ROLE_FIELD).and_then(Value::as_str) {
            Some(ADMIN_ROLE) => Role::Admin,
            _ => Role::Customer,
        }
    }
}

/// Whether a looked-up user is an administrator.
///
/// A missing user and a non-admin user give the same answer.
pub fn is_admin(user: Option<&Value>) -> bool {
    user.map(Role::of) == Some(Role::Admin)
}
