//! Concrete authentication backend
//!
//! Wraps `PgPool` + `TokenService` and owns the identity read query.
//! Uses runtime `sqlx::query_as` (not macros) so the auth crate stays
//! decoupled from the donors domain's table ownership.

use sqlx::PgPool;
use uuid::Uuid;

use crate::claims::TokenKind;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::tokens::TokenService;
use crate::types::AuthIdentity;

/// Concrete authentication backend.
///
/// Wraps a database pool and the token service. Domain states expose
/// this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    pool: PgPool,
    tokens: TokenService,
}

impl AuthBackend {
    pub fn new(pool: PgPool, tokens: TokenService) -> Self {
        Self { pool, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Find the caller's identity by ID (lightweight subset of the users row)
    pub(crate) async fn find_identity(&self, id: Uuid) -> Result<Option<AuthIdentity>, AuthError> {
        let identity: Option<AuthIdentity> = sqlx::query_as(
            r#"
            SELECT id, email, roles, status
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %id, "Failed to load identity");
            AuthError::IdentityLoadError
        })?;

        Ok(identity)
    }

    /// Shared access-token pipeline used by `AuthUser` and `AdminUser`.
    ///
    /// Signature and expiry are checked before any store lookup; the ban
    /// check runs strictly after the identity is known to exist.
    pub async fn authenticate_access(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = self.tokens.verify(token, TokenKind::Access)?;
        self.resolve_subject(&claims.sub).await
    }

    /// Refresh-token pipeline used by `RefreshUser`.
    ///
    /// Token failures are mapped to refresh-specific errors so an expired
    /// refresh token stays distinguishable for clients.
    pub async fn authenticate_refresh(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = self
            .tokens
            .verify(token, TokenKind::Refresh)
            .map_err(|e| match e {
                AuthError::TokenExpired => AuthError::RefreshTokenExpired,
                AuthError::InvalidToken | AuthError::WrongTokenKind => {
                    AuthError::InvalidRefreshToken
                }
                other => other,
            })?;
        self.resolve_subject(&claims.sub).await
    }

    async fn resolve_subject(&self, sub: &str) -> Result<AuthContext, AuthError> {
        let user_id = Uuid::parse_str(sub).map_err(|_| AuthError::InvalidToken)?;

        let identity = self
            .find_identity(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if identity.is_banned() {
            return Err(AuthError::Banned);
        }

        Ok(AuthContext::new(identity))
    }
}
