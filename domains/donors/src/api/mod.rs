//! HTTP API for the donors domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::DonorsState;
pub use routes::routes;
