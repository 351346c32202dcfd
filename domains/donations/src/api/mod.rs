//! HTTP API for the donations domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::DonationsState;
pub use routes::routes;
