//! Authentication middleware for the Hemolink API
//!
//! Provides JWT issuance and verification, role gating, and axum extractors
//! that work with any domain state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod tokens;
mod types;

pub use backend::AuthBackend;
pub use claims::{TokenClaims, TokenKind};
pub use config::AuthConfig;
pub use context::{require_any, AuthContext};
pub use error::AuthError;
pub use extractors::{AdminUser, AuthUser, RefreshUser, REFRESH_COOKIE};
pub use tokens::{TokenPair, TokenService};
pub use types::{AccountStatus, AuthIdentity, Role, RoleSet};
