//! Auth read-model types
//!
//! Lightweight view of the same users row owned by the donors domain.
//! Carries only the fields needed for authentication and authorization.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Account roles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// A non-empty, duplicate-free set of roles.
///
/// Uniqueness is a structural property of the underlying set, not a
/// runtime validation. Serializes as a plain JSON array of role names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// The default role set for a newly registered account.
    pub fn donor() -> Self {
        Self(BTreeSet::from([Role::User]))
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.contains(Role::Admin)
    }

    /// Add a role. Returns false if it was already present.
    pub fn grant(&mut self, role: Role) -> bool {
        self.0.insert(role)
    }

    /// Remove a role. The set must stay non-empty, so removing the last
    /// remaining role is refused and returns false.
    pub fn revoke(&mut self, role: Role) -> bool {
        if self.0.len() == 1 && self.0.contains(&role) {
            return false;
        }
        self.0.remove(&role)
    }

    /// Whether this set shares at least one role with `allowed`.
    pub fn intersects(&self, allowed: &[Role]) -> bool {
        allowed.iter().any(|role| self.0.contains(role))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::donor()
    }
}

/// Account status; a banned identity is rejected at the auth gate even
/// when presenting a valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Banned,
}

impl AccountStatus {
    pub fn is_banned(&self) -> bool {
        matches!(self, AccountStatus::Banned)
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "active"),
            AccountStatus::Banned => write!(f, "banned"),
        }
    }
}

/// Lightweight identity for authenticated callers.
///
/// Contains the fields needed by the auth and permission gates. Handlers
/// needing full user data (profile, donation counters) load from the
/// donors domain repository.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: String,
    pub roles: Json<RoleSet>,
    pub status: AccountStatus,
}

impl AuthIdentity {
    pub fn is_admin(&self) -> bool {
        self.roles.0.is_admin()
    }

    pub fn is_banned(&self) -> bool {
        self.status.is_banned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_set_default_is_user() {
        let roles = RoleSet::donor();
        assert!(roles.contains(Role::User));
        assert!(!roles.is_admin());
        assert_eq!(roles.len(), 1);
    }

    #[test]
    fn test_role_set_grant_is_idempotent() {
        let mut roles = RoleSet::donor();
        assert!(roles.grant(Role::Admin));
        assert!(!roles.grant(Role::Admin));
        assert_eq!(roles.len(), 2);
    }

    #[test]
    fn test_role_set_revoke() {
        let mut roles = RoleSet::donor();
        roles.grant(Role::Admin);
        assert!(roles.revoke(Role::Admin));
        assert!(!roles.is_admin());
        assert!(!roles.revoke(Role::Admin));
    }

    #[test]
    fn test_role_set_cannot_be_emptied() {
        let mut roles = RoleSet::donor();
        assert!(!roles.revoke(Role::User));
        assert!(roles.contains(Role::User));
        assert!(!roles.is_empty());
    }

    #[test]
    fn test_role_set_intersects() {
        let mut roles = RoleSet::donor();
        assert!(roles.intersects(&[Role::User, Role::Admin]));
        assert!(!roles.intersects(&[Role::Admin]));
        roles.grant(Role::Admin);
        assert!(roles.intersects(&[Role::Admin]));
        assert!(!roles.intersects(&[]));
    }

    #[test]
    fn test_role_set_serializes_as_array() {
        let mut roles = RoleSet::donor();
        roles.grant(Role::Admin);
        let json = serde_json::to_string(&roles).unwrap();
        assert_eq!(json, r#"["user","admin"]"#);

        let parsed: RoleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, roles);
    }

    #[test]
    fn test_role_set_deserialization_deduplicates() {
        let parsed: RoleSet = serde_json::from_str(r#"["user","user","admin"]"#).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_account_status_serde() {
        assert_eq!(
            serde_json::to_string(&AccountStatus::Banned).unwrap(),
            r#""banned""#
        );
        assert!(AccountStatus::Banned.is_banned());
        assert!(!AccountStatus::Active.is_banned());
    }
}
