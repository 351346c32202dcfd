//! Route definitions for the donations domain

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;
use crate::api::middleware::DonationsState;

pub fn routes(state: DonationsState) -> Router {
    Router::new()
        // Donation endpoints
        .route(
            "/donations",
            post(handlers::donations::create_donation).get(handlers::donations::list_donations),
        )
        .route(
            "/donations/my-donations",
            get(handlers::donations::my_donations),
        )
        .route(
            "/donations/{id}",
            get(handlers::donations::get_donation).patch(handlers::donations::update_donation),
        )
        // Blood center endpoints
        .route(
            "/centers",
            post(handlers::centers::create_center).get(handlers::centers::list_centers),
        )
        .route(
            "/centers/{id}",
            get(handlers::centers::get_center)
                .patch(handlers::centers::update_center)
                .delete(handlers::centers::archive_center),
        )
        .with_state(state)
}
