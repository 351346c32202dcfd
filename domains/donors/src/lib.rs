//! Donors domain: accounts, credentials, sessions, administrative controls

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{BloodType, Gender, NewUser, User};
// Re-export repository types
pub use repository::{DonorsRepositories, ProfileUpdate, UserRepository};

// Re-export API types
pub use api::routes;
pub use api::DonorsState;

// Re-export auth types for downstream convenience
pub use hemolink_auth::{
    AccountStatus, AdminUser, AuthBackend, AuthConfig, AuthContext, AuthError, AuthUser,
    RefreshUser, Role, RoleSet, TokenService,
};
