//! Shared utilities, configuration, and error handling for Hemolink
//!
//! This crate provides common functionality used across the Hemolink application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Pagination and validated-JSON boundary extractors
//! - Password hashing utilities

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;
pub mod state;

pub use config::Config;
pub use crypto::{hash_password, verify_password};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::{PageInfo, Paginated, Pagination, ValidatedJson};
pub use state::StateError;
