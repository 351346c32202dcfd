//! Authentication configuration
//!
//! Signing secrets are injected here rather than read from ambient
//! process state, so tests can construct deterministic configurations.

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret used to sign and verify access tokens
    pub access_secret: String,
    /// Secret used to sign and verify refresh tokens
    pub refresh_secret: String,
    /// Access-token lifetime in minutes
    pub access_ttl_minutes: i64,
    /// Refresh-token lifetime in hours
    pub refresh_ttl_hours: i64,
}

impl AuthConfig {
    /// Build the auth configuration from the application config.
    pub fn from_config(config: &hemolink_common::Config) -> Self {
        Self {
            access_secret: config.jwt_access_secret.clone(),
            refresh_secret: config.jwt_refresh_secret.clone(),
            access_ttl_minutes: config.jwt_access_ttl_minutes,
            refresh_ttl_hours: config.jwt_refresh_ttl_hours,
        }
    }
}
