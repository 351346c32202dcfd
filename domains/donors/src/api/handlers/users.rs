//! Account handlers: listing, profile, password, administrative toggles

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use hemolink_auth::{AccountStatus, AdminUser, AuthUser, RoleSet};
use hemolink_common::{Error, Paginated, Pagination, Result, ValidatedJson};

use crate::api::middleware::DonorsState;
use crate::domain::entities::{BloodType, Gender, User};
use crate::repository::ProfileUpdate;

/// Outward projection of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub roles: RoleSet,
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

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            roles: user.roles.0,
            status: user.status,
            full_name: user.full_name,
            phone: user.phone,
            gender: user.gender,
            date_of_birth: user.date_of_birth,
            blood_type: user.blood_type,
            medical_history: user.medical_history,
            address: user.address,
            donation_count: user.donation_count,
            last_donation_date: user.last_donation_date,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 30, message = "Phone number cannot be empty"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Address cannot be empty"))]
    pub address: Option<String>,
    #[validate(length(max = 2000, message = "Medical history is too long"))]
    pub medical_history: Option<String>,
    pub blood_type: Option<BloodType>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// GET /users (admin)
pub async fn list_users(
    State(state): State<DonorsState>,
    AdminUser(_): AdminUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<UserResponse>>> {
    let (users, total) = state.repos.users.list(&pagination).await.map_err(Error::from)?;

    let items = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Paginated::new(items, &pagination, total)))
}

/// GET /users/{id} (self or admin)
pub async fn get_user(
    State(state): State<DonorsState>,
    AuthUser(context): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    context.ensure_self_or_admin(id)?;

    let user = state
        .repos
        .users
        .get_by_id(id)
        .await
        .map_err(|err| err.for_resource("User"))?;

    Ok(Json(UserResponse::from(user)))
}

/// PATCH /users/{id} (self or admin)
pub async fn update_profile(
    State(state): State<DonorsState>,
    AuthUser(context): AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    context.ensure_self_or_admin(id)?;

    let update = ProfileUpdate {
        full_name: payload.full_name,
        phone: payload.phone,
        address: payload.address,
        medical_history: payload.medical_history,
        blood_type: payload.blood_type,
    };

    let user = state
        .repos
        .users
        .update_profile(id, &update)
        .await
        .map_err(|err| err.for_resource("User"))?;

    Ok(Json(UserResponse::from(user)))
}

/// PATCH /users/{id}/password (self or admin)
///
/// The current secret is always re-verified, even for admins.
pub async fn change_password(
    State(state): State<DonorsState>,
    AuthUser(context): AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    context.ensure_self_or_admin(id)?;

    let mut user = state
        .repos
        .users
        .get_by_id(id)
        .await
        .map_err(|err| err.for_resource("User"))?;

    if !user.check_password(&payload.current_password)? {
        return Err(Error::Validation(
            "Current password is incorrect".to_string(),
        ));
    }

    user.set_password(&payload.new_password)?;
    state
        .repos
        .users
        .update_password(id, &user.password_hash)
        .await
        .map_err(Error::from)?;

    tracing::info!(user_id = %id, "Password changed");

    Ok(Json(serde_json::json!({
        "message": "Password updated successfully"
    })))
}

/// PATCH /users/{id}/ban (admin)
pub async fn toggle_ban(
    State(state): State<DonorsState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    let mut user = state
        .repos
        .users
        .get_by_id(id)
        .await
        .map_err(|err| err.for_resource("User"))?;

    // Decision is made in memory; the write persists only the outcome
    user.toggle_ban()?;

    let updated = state
        .repos
        .users
        .set_status(id, user.status)
        .await
        .map_err(Error::from)?;

    tracing::info!(user_id = %id, status = %updated.status, "Ban toggled");

    Ok(Json(UserResponse::from(updated)))
}

/// PATCH /users/{id}/role (admin)
pub async fn toggle_admin_role(
    State(state): State<DonorsState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    let mut user = state
        .repos
        .users
        .get_by_id(id)
        .await
        .map_err(|err| err.for_resource("User"))?;

    user.toggle_admin_role()?;

    let updated = state
        .repos
        .users
        .set_roles(id, &user.roles.0)
        .await
        .map_err(Error::from)?;

    tracing::info!(user_id = %id, "Admin role toggled");

    Ok(Json(UserResponse::from(updated)))
}
