//! Domain entities for the Hemolink donors domain
//!
//! The `User` entity owns the credential and account-control invariants.
//! Mutations are pure in-memory decisions; persistence is a separate,
//! explicit repository call so the transactional boundary stays visible.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use hemolink_auth::{AccountStatus, Role, RoleSet};
use hemolink_common::{crypto, Error, Result};

/// Maximum length for the free-text medical history field
pub const MAX_MEDICAL_HISTORY_LEN: usize = 2000;

/// Donor gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// ABO/Rh blood type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "blood_type")]
pub enum BloodType {
    #[sqlx(rename = "A+")]
    #[serde(rename = "A+")]
    APositive,
    #[sqlx(rename = "A-")]
    #[serde(rename = "A-")]
    ANegative,
    #[sqlx(rename = "B+")]
    #[serde(rename = "B+")]
    BPositive,
    #[sqlx(rename = "B-")]
    #[serde(rename = "B-")]
    BNegative,
    #[sqlx(rename = "AB+")]
    #[serde(rename = "AB+")]
    AbPositive,
    #[sqlx(rename = "AB-")]
    #[serde(rename = "AB-")]
    AbNegative,
    #[sqlx(rename = "O+")]
    #[serde(rename = "O+")]
    OPositive,
    #[sqlx(rename = "O-")]
    #[serde(rename = "O-")]
    ONegative,
}

/// Fields required to register a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub blood_type: BloodType,
    pub address: String,
    pub medical_history: Option<String>,
}

/// User entity
///
/// The password hash is never serialized outward and is redacted from
/// debug output. External representations go through `UserResponse`.
#[derive(Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub roles: Json<RoleSet>,
    pub status: AccountStatus,
    pub full_name: String,
    pub phone: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub blood_type: BloodType,
    pub medical_history: Option<String>,
    pub address: String,
    pub donation_count: i32,
    pub last_donation_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("roles", &self.roles)
            .field("status", &self.status)
            .field("full_name", &self.full_name)
            .field("donation_count", &self.donation_count)
            .field("last_donation_date", &self.last_donation_date)
            .finish()
    }
}

impl User {
    /// Create a new account. The plaintext secret is hashed before the
    /// entity ever exists; it is never stored or serialized.
    pub fn new(fields: NewUser) -> Result<Self> {
        if let Some(ref history) = fields.medical_history {
            if history.len() > MAX_MEDICAL_HISTORY_LEN {
                return Err(Error::Validation(format!(
                    "Medical history must be at most {} characters",
                    MAX_MEDICAL_HISTORY_LEN
                )));
            }
        }

        let password_hash = crypto::hash_password(&fields.password)?;

        let now = Utc::now();
        Ok(User {
            id: Uuid::new_v4(),
            email: fields.email,
            password_hash,
            roles: Json(RoleSet::donor()),
            status: AccountStatus::Active,
            full_name: fields.full_name,
            phone: fields.phone,
            gender: fields.gender,
            date_of_birth: fields.date_of_birth,
            blood_type: fields.blood_type,
            medical_history: fields.medical_history,
            address: fields.address,
            donation_count: 0,
            last_donation_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.roles.0.is_admin()
    }

    pub fn is_banned(&self) -> bool {
        self.status.is_banned()
    }

    /// Verify a plaintext secret against the stored hash.
    pub fn check_password(&self, plaintext: &str) -> Result<bool> {
        crypto::verify_password(plaintext, &self.password_hash)
    }

    /// Replace the secret. A fresh salt is generated on every change, so
    /// the previous hash is invalidated immediately.
    pub fn set_password(&mut self, plaintext: &str) -> Result<()> {
        self.password_hash = crypto::hash_password(plaintext)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Flip the ban status. Admins can never be banned.
    pub fn toggle_ban(&mut self) -> Result<()> {
        if self.is_admin() {
            return Err(Error::BusinessRule(
                "Cannot ban an administrator".to_string(),
            ));
        }

        self.status = match self.status {
            AccountStatus::Active => AccountStatus::Banned,
            AccountStatus::Banned => AccountStatus::Active,
        };
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Grant or revoke the admin role. A banned account can never be
    /// granted admin (the symmetric counterpart of the ban rule).
    pub fn toggle_admin_role(&mut self) -> Result<()> {
        if self.is_admin() {
            self.roles.0.revoke(Role::Admin);
        } else {
            if self.is_banned() {
                return Err(Error::BusinessRule(
                    "Cannot grant admin role to a banned account".to_string(),
                ));
            }
            self.roles.0.grant(Role::Admin);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Apply the completion side effect to the owning identity.
    ///
    /// Called only when a donation transitions into its completed state;
    /// the durable write happens together with the status change in one
    /// transaction.
    pub fn record_completed_donation(&mut self, completed_at: DateTime<Utc>) {
        self.donation_count += 1;
        self.last_donation_date = Some(completed_at);
        self.updated_at = Utc::now();
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        if self.roles.0.is_empty() {
            return Err(Error::Validation("Role set cannot be empty".to_string()));
        }

        // Symmetric invariant: an admin is never banned, a banned
        // account never holds admin
        if self.is_admin() && self.is_banned() {
            return Err(Error::Validation(
                "An administrator cannot be banned".to_string(),
            ));
        }

        if self.donation_count < 0 {
            return Err(Error::Validation(
                "Donation count cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user_fields() -> NewUser {
        NewUser {
            email: "donor@example.com".to_string(),
            password: "secret-password".to_string(),
            full_name: "Test Donor".to_string(),
            phone: "+1-555-0100".to_string(),
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            blood_type: BloodType::ONegative,
            address: "12 Main St".to_string(),
            medical_history: None,
        }
    }

    #[test]
    fn test_user_creation_defaults() {
        let user = User::new(new_user_fields()).unwrap();

        assert_eq!(user.email, "donor@example.com");
        assert!(user.roles.0.contains(Role::User));
        assert!(!user.is_admin());
        assert_eq!(user.status, AccountStatus::Active);
        assert_eq!(user.donation_count, 0);
        assert!(user.last_donation_date.is_none());
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_password_is_hashed_at_creation() {
        let user = User::new(new_user_fields()).unwrap();
        assert_ne!(user.password_hash, "secret-password");
        assert!(user.check_password("secret-password").unwrap());
        assert!(!user.check_password("wrong").unwrap());
    }

    #[test]
    fn test_set_password_invalidates_old_secret() {
        let mut user = User::new(new_user_fields()).unwrap();
        let old_hash = user.password_hash.clone();

        user.set_password("brand-new-secret").unwrap();

        assert_ne!(user.password_hash, old_hash);
        assert!(!user.check_password("secret-password").unwrap());
        assert!(user.check_password("brand-new-secret").unwrap());
    }

    #[test]
    fn test_serialized_user_omits_password_hash() {
        let user = User::new(new_user_fields()).unwrap();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains(&user.password_hash));
    }

    #[test]
    fn test_debug_redacts_password_hash() {
        let user = User::new(new_user_fields()).unwrap();
        let debug = format!("{:?}", user);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(&user.password_hash));
    }

    #[test]
    fn test_toggle_ban_roundtrip() {
        let mut user = User::new(new_user_fields()).unwrap();

        user.toggle_ban().unwrap();
        assert!(user.is_banned());

        user.toggle_ban().unwrap();
        assert!(!user.is_banned());
    }

    #[test]
    fn test_cannot_ban_admin() {
        let mut user = User::new(new_user_fields()).unwrap();
        user.toggle_admin_role().unwrap();
        assert!(user.is_admin());

        let result = user.toggle_ban();
        assert!(matches!(result, Err(Error::BusinessRule(_))));
        assert_eq!(user.status, AccountStatus::Active);
    }

    #[test]
    fn test_cannot_grant_admin_to_banned() {
        let mut user = User::new(new_user_fields()).unwrap();
        user.toggle_ban().unwrap();
        assert!(user.is_banned());

        let result = user.toggle_admin_role();
        assert!(matches!(result, Err(Error::BusinessRule(_))));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_toggle_admin_role_roundtrip() {
        let mut user = User::new(new_user_fields()).unwrap();

        user.toggle_admin_role().unwrap();
        assert!(user.is_admin());
        assert!(user.roles.0.contains(Role::User));

        user.toggle_admin_role().unwrap();
        assert!(!user.is_admin());
    }

    #[test]
    fn test_admin_can_be_demoted_even_if_flagged() {
        // Revoking admin is always allowed; only the grant is gated on
        // ban status.
        let mut user = User::new(new_user_fields()).unwrap();
        user.toggle_admin_role().unwrap();
        user.toggle_admin_role().unwrap();
        assert!(!user.is_admin());
    }

    #[test]
    fn test_record_completed_donation() {
        let mut user = User::new(new_user_fields()).unwrap();
        let at = Utc::now();

        user.record_completed_donation(at);

        assert_eq!(user.donation_count, 1);
        assert_eq!(user.last_donation_date, Some(at));
    }

    #[test]
    fn test_medical_history_bounded() {
        let fields = NewUser {
            medical_history: Some("x".repeat(MAX_MEDICAL_HISTORY_LEN + 1)),
            ..new_user_fields()
        };
        assert!(User::new(fields).is_err());

        let fields = NewUser {
            medical_history: Some("x".repeat(MAX_MEDICAL_HISTORY_LEN)),
            ..new_user_fields()
        };
        assert!(User::new(fields).is_ok());
    }

    #[test]
    fn test_validate_rejects_banned_admin() {
        let mut user = User::new(new_user_fields()).unwrap();
        user.roles.0.grant(Role::Admin);
        user.status = AccountStatus::Banned;
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_blood_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&BloodType::AbPositive).unwrap(),
            r#""AB+""#
        );
        assert_eq!(
            serde_json::from_str::<BloodType>(r#""O-""#).unwrap(),
            BloodType::ONegative
        );
    }
}
