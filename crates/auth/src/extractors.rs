//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::tokens::extract_bearer_token;
use crate::types::Role;

/// Name of the cookie carrying the refresh token.
///
/// The refresh token never travels in the Authorization header; it is
/// confined to this HttpOnly cookie and read from the request's cookie
/// jar only.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Authenticated caller extractor (access token in the Authorization header)
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::NoToken)?;

        let token = extract_bearer_token(auth_header)?;
        let auth_context = backend.authenticate_access(&token).await?;

        Ok(AuthUser(auth_context))
    }
}

/// Admin-only authenticated caller extractor.
///
/// Like `AuthUser` but rejects callers without the admin role with
/// 403 FORBIDDEN. Use this for administrative routes.
#[derive(Debug)]
pub struct AdminUser(pub AuthContext);

impl<S> FromRequestParts<S> for AdminUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(auth_context) = AuthUser::from_request_parts(parts, state).await?;

        auth_context.require_any(&[Role::Admin])?;

        Ok(AdminUser(auth_context))
    }
}

/// Refresh-gate extractor (refresh token in the `refreshToken` cookie).
///
/// Used only by the token-renewal endpoint to mint a new pair without
/// re-authentication.
#[derive(Debug)]
pub struct RefreshUser(pub AuthContext);

impl<S> FromRequestParts<S> for RefreshUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(AuthError::MissingRefreshToken)?;

        let auth_context = backend.authenticate_refresh(&token).await?;

        Ok(RefreshUser(auth_context))
    }
}
