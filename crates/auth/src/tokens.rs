//! Token issuance and verification
//!
//! Access and refresh tokens are HS256 JWTs signed with independent
//! secrets, so compromise of one key cannot forge the other class.
//! Expiry is evaluated against wall-clock time with no leeway.

use axum::http::HeaderValue;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::claims::{TokenClaims, TokenKind};
use crate::config::AuthConfig;
use crate::error::AuthError;

/// A freshly minted access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies both token classes.
///
/// Constructed from an explicit [`AuthConfig`] — never from ambient
/// process globals — so tests can supply deterministic keys.
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_ref()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_ref()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_ref()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_ref()),
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::hours(config.refresh_ttl_hours),
        }
    }

    /// Refresh-token lifetime, used for the cookie max-age.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issue a new access/refresh pair bound to a single user ID.
    pub fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair, AuthError> {
        let access_token = self.sign(user_id, TokenKind::Access)?;
        let refresh_token = self.sign(user_id, TokenKind::Refresh)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    fn sign(&self, user_id: Uuid, kind: TokenKind) -> Result<String, AuthError> {
        let now = Utc::now();
        let (key, ttl) = match kind {
            TokenKind::Access => (&self.access_encoding, self.access_ttl),
            TokenKind::Refresh => (&self.refresh_encoding, self.refresh_ttl),
        };
        let claims = TokenClaims {
            sub: user_id.to_string(),
            kind,
            iat: now.timestamp() as u64,
            exp: (now + ttl).timestamp() as u64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, key).map_err(|e| {
            tracing::error!(error = %e, kind = %kind, "Failed to sign token");
            AuthError::TokenIssueFailed
        })
    }

    /// Verify a token of the expected kind.
    ///
    /// Expired tokens are reported distinctly from malformed or
    /// wrongly-signed ones so clients can decide whether a silent
    /// refresh is worth attempting.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, AuthError> {
        let key = match expected {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        // Expiry is evaluated against wall-clock time; no grace window
        validation.leeway = 0;

        let token_data = decode::<TokenClaims>(token, key, &validation).map_err(|e| {
            if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature) {
                AuthError::TokenExpired
            } else {
                tracing::debug!(error = %e, "JWT validation failed");
                AuthError::InvalidToken
            }
        })?;

        if token_data.claims.kind != expected {
            return Err(AuthError::WrongTokenKind);
        }

        Ok(token_data.claims)
    }
}

/// Extract bearer token from Authorization header
pub(crate) fn extract_bearer_token(header: &HeaderValue) -> Result<String, AuthError> {
    let header_str = header.to_str().map_err(|_| AuthError::InvalidToken)?;

    if let Some(token) = header_str.strip_prefix("Bearer ") {
        Ok(token.to_string())
    } else {
        Err(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_hours: 24,
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = TokenService::new(&test_config());
        let user_id = Uuid::new_v4();

        let pair = service.issue_pair(user_id).unwrap();

        let access = service.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(access.sub, user_id.to_string());
        assert_eq!(access.kind, TokenKind::Access);

        let refresh = service
            .verify(&pair.refresh_token, TokenKind::Refresh)
            .unwrap();
        assert_eq!(refresh.sub, user_id.to_string());
        assert_eq!(refresh.kind, TokenKind::Refresh);
    }

    #[test]
    fn test_cross_kind_verification_rejected() {
        // An access token presented as a refresh token fails signature
        // verification because the two classes use independent secrets.
        let service = TokenService::new(&test_config());
        let pair = service.issue_pair(Uuid::new_v4()).unwrap();

        let result = service.verify(&pair.access_token, TokenKind::Refresh);
        assert!(matches!(result, Err(AuthError::InvalidToken)));

        let result = service.verify(&pair.refresh_token, TokenKind::Access);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_kind_claim_mismatch_rejected() {
        // A token signed with the access secret but claiming to be a
        // refresh token is caught by the kind check.
        let config = test_config();
        let service = TokenService::new(&config);

        let now = Utc::now();
        let claims = TokenClaims {
            sub: Uuid::new_v4().to_string(),
            kind: TokenKind::Refresh,
            iat: now.timestamp() as u64,
            exp: (now + Duration::minutes(5)).timestamp() as u64,
        };
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_ref()),
        )
        .unwrap();

        let result = service.verify(&forged, TokenKind::Access);
        assert!(matches!(result, Err(AuthError::WrongTokenKind)));
    }

    #[test]
    fn test_expired_token_distinct_from_invalid() {
        let config = AuthConfig {
            access_ttl_minutes: -5,
            ..test_config()
        };
        let service = TokenService::new(&config);
        let pair = service.issue_pair(Uuid::new_v4()).unwrap();

        let result = service.verify(&pair.access_token, TokenKind::Access);
        assert!(matches!(result, Err(AuthError::TokenExpired)));

        let result = service.verify("garbage.token.value", TokenKind::Access);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = TokenService::new(&test_config());
        let pair = service.issue_pair(Uuid::new_v4()).unwrap();

        let mut tampered = pair.access_token.clone();
        tampered.pop();
        tampered.push('x');

        let result = service.verify(&tampered, TokenKind::Access);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_extract_bearer_token() {
        // Valid bearer token
        let header = HeaderValue::from_static("Bearer abc123");
        let result = extract_bearer_token(&header);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "abc123");

        // Invalid format
        let header = HeaderValue::from_static("abc123");
        let result = extract_bearer_token(&header);
        assert!(result.is_err());

        // Basic auth (wrong type)
        let header = HeaderValue::from_static("Basic abc123");
        let result = extract_bearer_token(&header);
        assert!(result.is_err());
    }
}
