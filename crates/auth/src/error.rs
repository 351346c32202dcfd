//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug, PartialEq)]
pub enum AuthError {
    NoToken,
    InvalidToken,
    TokenExpired,
    WrongTokenKind,
    MissingRefreshToken,
    InvalidRefreshToken,
    RefreshTokenExpired,
    UserNotFound,
    Banned,
    /// Permission gate reached without a resolved identity
    Unauthorized,
    /// Authenticated but lacking the required role or ownership
    InsufficientRole,
    IdentityLoadError,
    TokenIssueFailed,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NoToken
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::WrongTokenKind
            | AuthError::MissingRefreshToken
            | AuthError::InvalidRefreshToken
            | AuthError::RefreshTokenExpired
            | AuthError::UserNotFound
            | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Banned | AuthError::InsufficientRole => StatusCode::FORBIDDEN,
            AuthError::IdentityLoadError | AuthError::TokenIssueFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AuthError::NoToken => "No token provided, authorization denied",
            AuthError::InvalidToken | AuthError::WrongTokenKind => "Token is not valid",
            AuthError::TokenExpired => "Token expired",
            AuthError::MissingRefreshToken => "Refresh token missing",
            AuthError::InvalidRefreshToken => "Invalid refresh token",
            AuthError::RefreshTokenExpired => "Refresh token expired",
            AuthError::UserNotFound => "User not found, authorization denied",
            AuthError::Banned => "Your account is banned",
            AuthError::Unauthorized => "Unauthorized",
            AuthError::InsufficientRole => "Forbidden",
            AuthError::IdentityLoadError => "Failed to load user",
            AuthError::TokenIssueFailed => "Failed to issue tokens",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.message() }));
        (status, body).into_response()
    }
}

/// Lets handlers bubble gate failures through the common error type
/// with the same status and message the extractor would have produced.
impl From<AuthError> for hemolink_common::Error {
    fn from(err: AuthError) -> Self {
        use hemolink_common::Error;
        match err {
            AuthError::Banned => Error::Banned,
            AuthError::InsufficientRole => Error::Forbidden(err.message().to_string()),
            AuthError::IdentityLoadError | AuthError::TokenIssueFailed => {
                Error::Internal(err.message().to_string())
            }
            _ => Error::Unauthenticated(err.message().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_codes() {
        let cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::NoToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AuthError::TokenExpired, StatusCode::UNAUTHORIZED),
            (AuthError::WrongTokenKind, StatusCode::UNAUTHORIZED),
            (AuthError::MissingRefreshToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidRefreshToken, StatusCode::UNAUTHORIZED),
            (AuthError::RefreshTokenExpired, StatusCode::UNAUTHORIZED),
            (AuthError::UserNotFound, StatusCode::UNAUTHORIZED),
            (AuthError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AuthError::Banned, StatusCode::FORBIDDEN),
            (AuthError::InsufficientRole, StatusCode::FORBIDDEN),
            (AuthError::IdentityLoadError, StatusCode::INTERNAL_SERVER_ERROR),
            (AuthError::TokenIssueFailed, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected_status) in cases {
            let status = error.status_code();
            let response = error.into_response();
            assert_eq!(status, expected_status);
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_expiry_message_distinct_from_invalid() {
        // Clients use this distinction to decide whether to refresh
        assert_ne!(
            AuthError::TokenExpired.message(),
            AuthError::InvalidToken.message()
        );
        assert_ne!(
            AuthError::RefreshTokenExpired.message(),
            AuthError::InvalidRefreshToken.message()
        );
    }

    #[test]
    fn test_missing_identity_distinct_from_forbidden() {
        assert_ne!(
            AuthError::Unauthorized.status_code(),
            AuthError::InsufficientRole.status_code()
        );
    }
}
