//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Catalog:
///   - GET    /part, POST /part
///   - GET    /part/{id}, DELETE /part/{id}
///   - GET    /review, POST /review
///
/// - Orders:
///   - GET    /order, POST /order
///   - GET    /order/{id}, PATCH /order/{id}, DELETE /order/{id}
///   - GET    /all-order, PATCH /all-order/{id}
///
/// - Users:
///   - GET    /user
///   - GET    /user/{id}, PUT /user/{email}
///   - GET    /user/admin/{email}, PATCH /user/admin/{email}
///   - GET    /profile, PATCH /profile/{email}
///
/// - Payments:
///   - POST   /create-payment-intent
pub fn create_router(state: AppState) -> Router {
    // Browser clients are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog_routes = Router::new()
        .route("/part", get(handlers::list_parts).post(handlers::create_part))
        .route(
            "/part/{id}",
            get(handlers::get_part).delete(handlers::delete_part),
        )
        .route(
            "/review",
            get(handlers::list_reviews).post(handlers::create_review),
        );

    let order_routes = Router::new()
        .route("/order", get(handlers::list_orders).post(handlers::create_order))
        .route(
            "/order/{id}",
            get(handlers::get_order)
                .patch(handlers::pay_order)
                .delete(handlers::delete_order),
        )
        .route("/all-order", get(handlers::list_all_orders))
        .route("/all-order/{id}", patch(handlers::ship_order));

    // `/user/{key}` is a record id for GET and an email for PUT
    let user_routes = Router::new()
        .route("/user", get(handlers::list_users))
        .route(
            "/user/{key}",
            get(handlers::get_user).put(handlers::upsert_user),
        )
        .route(
            "/user/admin/{email}",
            get(handlers::check_admin).patch(handlers::grant_admin),
        )
        .route("/profile", get(handlers::get_profile))
        .route("/profile/{email}", patch(handlers::update_profile));

    let payment_routes =
        Router::new().route("/create-payment-intent", post(handlers::create_payment_intent));

    Router::new()
        .route("/", get(handlers::root))
        .merge(catalog_routes)
        .merge(order_routes)
        .merge(user_routes)
        .merge(payment_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
