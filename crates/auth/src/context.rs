//! Resolved caller identity and the permission gate

use uuid::Uuid;

use crate::error::AuthError;
use crate::types::{AuthIdentity, Role};

/// Identity attached to a request after the auth gate has run.
///
/// Status and roles reflect the database at verification time; nothing
/// here is cached from the token, so a ban or role revocation takes
/// effect on the very next request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: AuthIdentity,
}

impl AuthContext {
    pub fn new(identity: AuthIdentity) -> Self {
        Self { identity }
    }

    pub fn is_admin(&self) -> bool {
        self.identity.is_admin()
    }

    /// Pass if the caller's role set intersects `allowed`.
    pub fn require_any(&self, allowed: &[Role]) -> Result<(), AuthError> {
        require_any(Some(self), allowed)
    }

    /// Self-or-admin capability check, evaluated per resource: the caller
    /// must own the resource or hold the admin role.
    pub fn ensure_self_or_admin(&self, owner_id: Uuid) -> Result<(), AuthError> {
        if self.identity.id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::InsufficientRole)
        }
    }
}

/// Role gate over an optionally resolved identity.
///
/// A missing identity fails as 401 rather than 403 so callers can tell
/// "not authenticated" apart from "authenticated but not allowed".
pub fn require_any(context: Option<&AuthContext>, allowed: &[Role]) -> Result<(), AuthError> {
    let context = context.ok_or(AuthError::Unauthorized)?;
    if context.identity.roles.0.intersects(allowed) {
        Ok(())
    } else {
        Err(AuthError::InsufficientRole)
    }
}
