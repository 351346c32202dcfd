//! Route definitions for the donors domain

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::api::handlers;
use crate::api::middleware::DonorsState;

pub fn routes(state: DonorsState) -> Router {
    Router::new()
        // Session endpoints
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        // Account endpoints
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/{id}",
            get(handlers::users::get_user).patch(handlers::users::update_profile),
        )
        .route("/users/{id}/password", patch(handlers::users::change_password))
        .route("/users/{id}/ban", patch(handlers::users::toggle_ban))
        .route("/users/{id}/role", patch(handlers::users::toggle_admin_role))
        .with_state(state)
}
