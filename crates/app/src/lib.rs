//! Hemolink application composition root
//!
//! Composes all domain routers into a single application.

use axum::Router;
use sqlx::PgPool;

use hemolink_auth::{AuthBackend, AuthConfig, TokenService};
use hemolink_common::Config;
use hemolink_donations::{DonationsRepositories, DonationsState};
use hemolink_donors::{DonorsRepositories, DonorsState};

/// Create the main application router with all routes and middleware
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    // Shared auth backend: one token service, one identity read path
    let auth_config = AuthConfig::from_config(&config);
    let tokens = TokenService::new(&auth_config);
    let auth = AuthBackend::new(pool.clone(), tokens);

    let donors_state = DonorsState::new(DonorsRepositories::new(pool.clone()), auth.clone());
    let donations_state = DonationsState::new(DonationsRepositories::new(pool), auth);

    // Build router — compose domain routers with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { "Hemolink API v0.1.0" }))
        .merge(hemolink_donors::routes(donors_state))
        .merge(hemolink_donations::routes(donations_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
