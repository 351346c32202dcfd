//! JWT claims types

use serde::{Deserialize, Serialize};

/// Which class of token a claim set belongs to.
///
/// Access and refresh tokens are signed with independent secrets, but the
/// kind is also encoded in the claims so a verification against the right
/// key with the wrong expectation still fails loudly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims carried by both token classes
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Token class
    pub kind: TokenKind,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
}
