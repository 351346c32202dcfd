//! Session handlers: register, login, refresh, logout
//!
//! The refresh token never appears in a response body; it travels only
//! in an HttpOnly cookie scoped to the whole API.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use hemolink_auth::{AuthUser, RefreshUser, REFRESH_COOKIE};
use hemolink_common::{Error, RepositoryError, Result, ValidatedJson};

use crate::api::handlers::users::UserResponse;
use crate::api::middleware::DonorsState;
use crate::domain::entities::{BloodType, Gender, NewUser, User};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, max = 30, message = "Phone number is required"))]
    pub phone: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub blood_type: BloodType,
    #[validate(length(min = 1, max = 200, message = "Address is required"))]
    pub address: String,
    #[validate(length(max = 2000, message = "Medical history is too long"))]
    pub medical_history: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Build the refresh cookie. HttpOnly keeps it out of script reach;
/// SameSite=Strict keeps it off cross-site requests.
fn refresh_cookie(token: String, max_age: chrono::Duration) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::seconds(max_age.num_seconds()))
        .build()
}

fn expired_refresh_cookie() -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, ""))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

/// POST /auth/register
pub async fn register(
    State(state): State<DonorsState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = User::new(NewUser {
        email: payload.email,
        password: payload.password,
        full_name: payload.full_name,
        phone: payload.phone,
        gender: payload.gender,
        date_of_birth: payload.date_of_birth,
        blood_type: payload.blood_type,
        address: payload.address,
        medical_history: payload.medical_history,
    })?;

    let created = state.repos.users.create(&user).await.map_err(|err| match err {
        RepositoryError::AlreadyExists => Error::Conflict("This email is already taken".to_string()),
        other => other.into(),
    })?;

    tracing::info!(user_id = %created.id, "New account registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<DonorsState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<serde_json::Value>)> {
    let user = state
        .repos
        .users
        .find_by_email(&payload.email)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::Unauthenticated("Invalid email or password".to_string()))?;

    if !user.check_password(&payload.password)? {
        return Err(Error::Unauthenticated(
            "Invalid email or password".to_string(),
        ));
    }

    let tokens = state.auth.tokens();
    let pair = tokens.issue_pair(user.id).map_err(Error::from)?;

    tracing::info!(user_id = %user.id, "User logged in");

    let jar = jar.add(refresh_cookie(pair.refresh_token, tokens.refresh_ttl()));
    let body = json!({
        "accessToken": pair.access_token,
        "user": UserResponse::from(user),
    });

    Ok((jar, Json(body)))
}

/// POST /auth/refresh
///
/// The gate has already verified the cookie token and re-checked the
/// account status; this just rotates the pair.
pub async fn refresh(
    State(state): State<DonorsState>,
    jar: CookieJar,
    RefreshUser(context): RefreshUser,
) -> Result<(CookieJar, Json<serde_json::Value>)> {
    let tokens = state.auth.tokens();
    let pair = tokens
        .issue_pair(context.identity.id)
        .map_err(Error::from)?;

    let jar = jar.add(refresh_cookie(pair.refresh_token, tokens.refresh_ttl()));
    let body = json!({ "accessToken": pair.access_token });

    Ok((jar, Json(body)))
}

/// POST /auth/logout
pub async fn logout(
    jar: CookieJar,
    AuthUser(context): AuthUser,
) -> Result<(CookieJar, Json<serde_json::Value>)> {
    tracing::info!(user_id = %context.identity.id, "User logged out");

    let jar = jar.add(expired_refresh_cookie());
    Ok((jar, Json(json!({ "message": "Logged out successfully" }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            email: "donor@example.com".to_string(),
            password: "secret-password".to_string(),
            full_name: "Test Donor".to_string(),
            phone: "+1-555-0100".to_string(),
            gender: Gender::Male,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            blood_type: BloodType::APositive,
            address: "12 Main St".to_string(),
            medical_history: None,
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_register_rejects_short_password() {
        let payload = RegisterRequest {
            email: "donor@example.com".to_string(),
            password: "short".to_string(),
            full_name: "Test Donor".to_string(),
            phone: "+1-555-0100".to_string(),
            gender: Gender::Male,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            blood_type: BloodType::APositive,
            address: "12 Main St".to_string(),
            medical_history: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let payload = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "secret-password".to_string(),
            full_name: "Test Donor".to_string(),
            phone: "+1-555-0100".to_string(),
            gender: Gender::Male,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            blood_type: BloodType::APositive,
            address: "12 Main St".to_string(),
            medical_history: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_register_request_wire_format_is_camel_case() {
        let payload: RegisterRequest = serde_json::from_str(
            r#"{
                "email": "donor@example.com",
                "password": "secret-password",
                "fullName": "Test Donor",
                "phone": "+1-555-0100",
                "gender": "female",
                "dateOfBirth": "1990-04-12",
                "bloodType": "O-",
                "address": "12 Main St"
            }"#,
        )
        .unwrap();
        assert_eq!(payload.full_name, "Test Donor");
        assert_eq!(payload.blood_type, BloodType::ONegative);
    }

    #[test]
    fn test_refresh_cookie_attributes() {
        let cookie = refresh_cookie("token-value".to_string(), chrono::Duration::hours(24));
        assert_eq!(cookie.name(), REFRESH_COOKIE);
        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));
    }

    #[test]
    fn test_logout_cookie_expires_immediately() {
        let cookie = expired_refresh_cookie();
        assert_eq!(cookie.name(), REFRESH_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
