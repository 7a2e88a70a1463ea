//! # Authentication and Authorization
//!
//! Bearer tokens are HS256 JWTs signed with `ACCESS_TOKEN_SECRET`.
//!
//! Protected handlers declare their checks as extractors, which axum runs
//! in order before the request body is read:
//!
//! ```text
//! request ──► Authenticated ──► Admin ──► handler
//!             (verify token)    (users lookup, role == "admin")
//! ```
//!
//! A failed check rejects the request and the handler never runs.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use carts_core::{is_admin, CartsError, CartsResult, Collection, Filter, ResourceStore};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

/// Tokens expire one hour after issue
pub const TOKEN_LIFETIME: Duration = Duration::hours(1);

/// Claim names set by the issuer or checked by the verifier; profile
/// fields never override them
const RESERVED_CLAIMS: &[&str] = &["email", "iat", "exp", "jti", "aud", "iss", "sub", "nbf"];

/// Decoded token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject email
    pub email: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Token id, unique per issue
    pub jti: String,
    /// Remaining profile fields the token was minted from
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

/// Signing and verification keys for bearer tokens
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        // Expiry is exact: no grace period past `exp`
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Mint a token for `email` carrying the given profile fields
    pub fn issue(&self, email: &str, profile: &Map<String, Value>) -> CartsResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            email: email.to_string(),
            iat: now,
            exp: now + TOKEN_LIFETIME.num_seconds(),
            jti: Uuid::new_v4().to_string(),
            profile: profile
                .iter()
                .filter(|(key, _)| !RESERVED_CLAIMS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| CartsError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Check signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> CartsResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                CartsError::InvalidToken(e.to_string())
            })
    }
}

/// Extract the credential from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> CartsResult<&str> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(CartsError::Unauthenticated)?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| CartsError::InvalidToken("expected a bearer token".to_string()))
}

/// Fail with `Forbidden` unless `email` belongs to an administrator.
///
/// One users lookup, no caching. An unknown user is refused the same way
/// as a non-admin one.
pub async fn require_admin(store: &ResourceStore, email: &str) -> CartsResult<()> {
    let user = store
        .find_one(Collection::Users, Filter::eq("email", email))
        .await?;

    if is_admin(user.as_ref()) {
        Ok(())
    } else {
        Err(CartsError::Forbidden("administrator role required".to_string()))
    }
}

/// A request carrying a valid bearer token
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = state.tokens.verify(token)?;
        Ok(Self(claims))
    }
}

/// A request from an authenticated administrator
#[derive(Debug, Clone)]
pub struct Admin(pub Claims);

impl FromRequestParts<AppState> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Authenticated(claims) = Authenticated::from_request_parts(parts, state).await?;
        require_admin(&state.store, &claims.email).await?;
        Ok(Self(claims))
    }
}
