//! # Carts
//!
//! Storefront backend for a parts catalog.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export ACCESS_TOKEN_SECRET=...
//! export DB_USER=... DB_PASS=... DB_HOST=cluster0.example.mongodb.net
//! export STRIPE_SECRET_KEY=sk_test_...
//! export MAILGUN_API_KEY=... MAILGUN_DOMAIN=mg.example.com EMAIL_SENDER=orders@example.com
//!
//! # Run the server
//! carts
//! ```

use carts_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    // Initialize application state
    let state = AppState::from_env().await?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Record store: {}", state.store.backend_name());
    info!("Payment provider: {}", state.payments.provider_name());
    info!("Mail provider: {}", state.notifier.provider_name());

    let app = routes::create_router(state.clone());

    info!("Carts is listening on http://{}", addr);
    if !is_prod {
        info!("Parts: GET http://{}/part", addr);
        info!("Token: PUT http://{}/user/{{email}}", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.close().await;
    info!("Carts stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn print_banner() {
    println!(
        r#"
  Carts
  ━━━━━━━━━━━━━━━━━━━━━━━
  Storefront backend
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
