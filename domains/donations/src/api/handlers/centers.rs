//! Blood center handlers
//!
//! Listing and reads are public; everything else is admin-only.
//! Deletion is a soft archive so historical donations keep a valid
//! center reference.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use hemolink_auth::AdminUser;
use hemolink_common::{Error, Paginated, Pagination, Result, ValidatedJson};

use crate::api::middleware::DonationsState;
use crate::domain::entities::{BloodCenter, NewBloodCenter, OperatingHours};
use crate::repository::CenterUpdate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCenterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, max = 30, message = "Phone number is required"))]
    pub phone: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    #[serde(default)]
    pub operating_hours: OperatingHours,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCenterRequest {
    #[validate(length(min = 1, max = 100, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Address cannot be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 30, message = "Phone number cannot be empty"))]
    pub phone: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: Option<f64>,
    pub operating_hours: Option<OperatingHours>,
}

/// POST /centers (admin)
pub async fn create_center(
    State(state): State<DonationsState>,
    AdminUser(context): AdminUser,
    ValidatedJson(payload): ValidatedJson<CreateCenterRequest>,
) -> Result<(StatusCode, Json<BloodCenter>)> {
    let center = BloodCenter::new(NewBloodCenter {
        name: payload.name,
        address: payload.address,
        phone: payload.phone,
        latitude: payload.latitude,
        longitude: payload.longitude,
        operating_hours: payload.operating_hours,
    })?;

    let created = state
        .repos
        .centers
        .create(&center)
        .await
        .map_err(Error::from)?;

    tracing::info!(center_id = %created.id, admin_id = %context.identity.id, "Blood center created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /centers (public)
pub async fn list_centers(
    State(state): State<DonationsState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<BloodCenter>>> {
    let (centers, total) = state
        .repos
        .centers
        .list(&pagination)
        .await
        .map_err(Error::from)?;

    Ok(Json(Paginated::new(centers, &pagination, total)))
}

/// GET /centers/{id} (public)
pub async fn get_center(
    State(state): State<DonationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BloodCenter>> {
    let center = state
        .repos
        .centers
        .get_by_id(id)
        .await
        .map_err(|err| err.for_resource("Blood center"))?;

    Ok(Json(center))
}

/// PATCH /centers/{id} (admin)
pub async fn update_center(
    State(state): State<DonationsState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCenterRequest>,
) -> Result<Json<BloodCenter>> {
    let update = CenterUpdate {
        name: payload.name,
        address: payload.address,
        phone: payload.phone,
        latitude: payload.latitude,
        longitude: payload.longitude,
        operating_hours: payload.operating_hours,
    };

    let updated = state
        .repos
        .centers
        .update(id, &update)
        .await
        .map_err(|err| err.for_resource("Blood center"))?;

    Ok(Json(updated))
}

/// DELETE /centers/{id} (admin) — archives, never hard-deletes
pub async fn archive_center(
    State(state): State<DonationsState>,
    AdminUser(context): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BloodCenter>> {
    let archived = state
        .repos
        .centers
        .archive(id)
        .await
        .map_err(|err| err.for_resource("Blood center"))?;

    tracing::info!(center_id = %id, admin_id = %context.identity.id, "Blood center archived");

    Ok(Json(archived))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_center_request_validation() {
        let payload: CreateCenterRequest = serde_json::from_str(
            r#"{
                "name": "Central Blood Bank",
                "address": "1 Donation Way",
                "phone": "+1-555-0200",
                "latitude": 40.71,
                "longitude": -74.0,
                "operatingHours": {
                    "monday": {"open": "08:00", "close": "17:00"}
                }
            }"#,
        )
        .unwrap();
        assert!(payload.validate().is_ok());
        assert!(payload.operating_hours.monday.is_some());
    }

    #[test]
    fn test_create_center_rejects_bad_coordinates() {
        let payload = CreateCenterRequest {
            name: "Nowhere".to_string(),
            address: "1 Donation Way".to_string(),
            phone: "+1-555-0200".to_string(),
            latitude: 95.0,
            longitude: 0.0,
            operating_hours: OperatingHours::default(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_center_request_partial() {
        let payload: UpdateCenterRequest =
            serde_json::from_str(r#"{"phone": "+1-555-0300"}"#).unwrap();
        assert_eq!(payload.phone.as_deref(), Some("+1-555-0300"));
        assert!(payload.name.is_none());
        assert!(payload.validate().is_ok());
    }
}
