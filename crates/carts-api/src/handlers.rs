//! # Request Handlers
//!
//! Axum request handlers for the storefront API.
//!
//! Capability checks are extractors (`Authenticated`, `Admin`) listed
//! before the body, so a rejected request never reaches the store.

use crate::auth::{Admin, Authenticated};
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use carts_core::{
    as_document, is_admin, CartsError, ChargeAmount, Collection, DeleteOutcome, Filter,
    InsertOutcome, IntentRequest, RecordId, UpdateOutcome, ADMIN_ROLE, ROLE_FIELD,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// `?email=` query on owner-scoped reads
#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: Option<String>,
}

/// Response of `PUT /user/{email}`
#[derive(Debug, Serialize)]
pub struct UserUpsertResponse {
    pub result: UpdateOutcome,
    #[serde(rename = "secretToken")]
    pub secret_token: String,
}

/// Response of `GET /user/admin/{email}`
#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub admin: bool,
}

/// Response of `POST /create-payment-intent`
#[derive(Debug, Serialize)]
pub struct PaymentIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

fn record_id(raw: &str) -> Result<RecordId, ApiError> {
    Ok(raw.parse::<RecordId>()?)
}

/// Resolve the owner an owner-scoped read is for.
///
/// Defaults to the caller; asking for someone else's records is refused.
fn owner_email(query: EmailQuery, caller: &str) -> Result<String, ApiError> {
    match query.email {
        None => Ok(caller.to_string()),
        Some(email) if email == caller => Ok(email),
        Some(_) => Err(CartsError::Forbidden("records belong to another user".to_string()).into()),
    }
}

// =============================================================================
// Liveness
// =============================================================================

/// Liveness check
pub async fn root() -> impl IntoResponse {
    "Hello World from CARTS!"
}

// =============================================================================
// Parts
// =============================================================================

pub async fn list_parts(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let parts = state.store.list_newest_first(Collection::Parts).await?;
    Ok(Json(parts))
}

pub async fn get_part(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Value>>> {
    let part = state
        .store
        .find_by_id(Collection::Parts, record_id(&id)?)
        .await?;
    Ok(Json(part))
}

#[instrument(skip(state, admin, part), fields(admin = %admin.0.email))]
pub async fn create_part(
    State(state): State<AppState>,
    admin: Admin,
    ApiJson(part): ApiJson<Value>,
) -> ApiResult<Json<InsertOutcome>> {
    let outcome = state.store.insert_one(Collection::Parts, part).await?;
    info!("Part created: {}", outcome.inserted_id);
    Ok(Json(outcome))
}

#[instrument(skip(state, admin), fields(admin = %admin.0.email))]
pub async fn delete_part(
    State(state): State<AppState>,
    admin: Admin,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    let outcome = state
        .store
        .delete_by_id(Collection::Parts, record_id(&id)?)
        .await?;
    info!("Part deleted: {} ({} removed)", id, outcome.deleted_count);
    Ok(Json(outcome))
}

// =============================================================================
// Reviews
// =============================================================================

pub async fn list_reviews(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let reviews = state.store.list_newest_first(Collection::Reviews).await?;
    Ok(Json(reviews))
}

pub async fn create_review(
    State(state): State<AppState>,
    _auth: Authenticated,
    ApiJson(review): ApiJson<Value>,
) -> ApiResult<Json<InsertOutcome>> {
    let outcome = state.store.insert_one(Collection::Reviews, review).await?;
    Ok(Json(outcome))
}

// =============================================================================
// Orders
// =============================================================================

pub async fn list_orders(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<Vec<Value>>> {
    let email = owner_email(query, &claims.email)?;
    let mut orders = state
        .store
        .find_many(Collection::Orders, Filter::eq("email", email))
        .await?;
    orders.reverse();
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Value>>> {
    let order = state
        .store
        .find_by_id(Collection::Orders, record_id(&id)?)
        .await?;
    Ok(Json(order))
}

pub async fn list_all_orders(
    State(state): State<AppState>,
    _admin: Admin,
) -> ApiResult<Json<Vec<Value>>> {
    let orders = state.store.list_newest_first(Collection::Orders).await?;
    Ok(Json(orders))
}

#[instrument(skip(state, claims, order), fields(customer = %claims.email))]
pub async fn create_order(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    ApiJson(order): ApiJson<Value>,
) -> ApiResult<Json<InsertOutcome>> {
    let outcome = state.store.insert_one(Collection::Orders, order).await?;
    info!("Order created: {}", outcome.inserted_id);
    Ok(Json(outcome))
}

/// Record the payment for an order.
///
/// Sets `transitionId` on the order, stores the whole payload as a payment
/// and queues a confirmation email. `paid` is left to the shipment step.
/// A payload without `transitionId` leaves the order untouched.
#[instrument(skip(state, claims, payload), fields(customer = %claims.email))]
pub async fn pay_order(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<Value>,
) -> ApiResult<Json<UpdateOutcome>> {
    let id = record_id(&id)?;
    let transition_id = as_document(payload.clone())?.remove("transitionId");

    let outcome = match transition_id {
        Some(transition_id) => {
            state
                .store
                .update_by_id(Collection::Orders, id, json!({ "transitionId": transition_id }))
                .await?
        }
        None => {
            warn!("Payment for order {} carries no transitionId, order left unchanged", id);
            match state.store.find_by_id(Collection::Orders, id).await? {
                Some(_) => UpdateOutcome::matched(false),
                None => UpdateOutcome::unmatched(),
            }
        }
    };
    let payment = state
        .store
        .insert_one(Collection::Payments, payload.clone())
        .await?;

    info!("Payment {} recorded for order {}", payment.inserted_id, id);
    state.notifier.payment_confirmation(&payload);

    Ok(Json(outcome))
}

/// Mark an order paid and shipped, then notify the customer
#[instrument(skip(state, admin, payload), fields(admin = %admin.0.email))]
pub async fn ship_order(
    State(state): State<AppState>,
    admin: Admin,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<Value>,
) -> ApiResult<Json<UpdateOutcome>> {
    let id = record_id(&id)?;
    let outcome = state
        .store
        .update_by_id(Collection::Orders, id, json!({ "paid": true, "shipped": true }))
        .await?;

    info!("Order {} shipped", id);
    state.notifier.shipment_confirmation(&payload);

    Ok(Json(outcome))
}

pub async fn delete_order(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    let outcome = state
        .store
        .delete_by_id(Collection::Orders, record_id(&id)?)
        .await?;
    Ok(Json(outcome))
}

// =============================================================================
// Users
// =============================================================================

pub async fn list_users(
    State(state): State<AppState>,
    _admin: Admin,
) -> ApiResult<Json<Vec<Value>>> {
    let users = state.store.list_newest_first(Collection::Users).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Value>>> {
    let user = state
        .store
        .find_by_id(Collection::Users, record_id(&id)?)
        .await?;
    Ok(Json(user))
}

pub async fn check_admin(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(email): Path<String>,
) -> ApiResult<Json<AdminStatus>> {
    let user = state
        .store
        .find_one(Collection::Users, Filter::eq("email", email))
        .await?;
    Ok(Json(AdminStatus {
        admin: is_admin(user.as_ref()),
    }))
}

/// Save a user's profile and hand back a fresh bearer token.
///
/// Public: this is how a client obtains its first token.
#[instrument(skip(state, profile))]
pub async fn upsert_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    ApiJson(profile): ApiJson<Value>,
) -> ApiResult<Json<UserUpsertResponse>> {
    let claims_profile = as_document(profile.clone())?;

    let result = state
        .store
        .upsert_where(Collection::Users, Filter::eq("email", email.as_str()), profile)
        .await?;
    let secret_token = state.tokens.issue(&email, &claims_profile)?;

    info!("User saved, token issued");
    Ok(Json(UserUpsertResponse {
        result,
        secret_token,
    }))
}

#[instrument(skip(state, claims), fields(granted_by = %claims.email))]
pub async fn grant_admin(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    Path(email): Path<String>,
) -> ApiResult<Json<UpdateOutcome>> {
    let outcome = state
        .store
        .update_where(
            Collection::Users,
            Filter::eq("email", email.as_str()),
            json!({ ROLE_FIELD: ADMIN_ROLE }),
        )
        .await?;

    if outcome.matched_count == 0 {
        warn!("No user {} to grant admin", email);
    } else {
        info!("Admin role granted to {}", email);
    }
    Ok(Json(outcome))
}

// =============================================================================
// Profile
// =============================================================================

pub async fn get_profile(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<Option<Value>>> {
    let email = owner_email(query, &claims.email)?;
    let profile = state
        .store
        .find_one(Collection::Users, Filter::eq("email", email))
        .await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(email): Path<String>,
    ApiJson(profile): ApiJson<Value>,
) -> ApiResult<Json<UpdateOutcome>> {
    let outcome = state
        .store
        .upsert_where(Collection::Users, Filter::eq("email", email), profile)
        .await?;
    Ok(Json(outcome))
}

// =============================================================================
// Payments
// =============================================================================

/// Create a card charge intent for `{price}` (decimal, USD)
#[instrument(skip(state, claims, body), fields(customer = %claims.email))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<PaymentIntentResponse>> {
    let amount = ChargeAmount::from_price(body.get("price").unwrap_or(&Value::Null))?;

    let intent = state
        .payments
        .create_intent(&IntentRequest::card(amount))
        .await?;

    info!(
        "Payment intent {} created via {} for {} cents",
        intent.id,
        state.payments.provider_name(),
        amount.cents()
    );

    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}
