//! Donation handlers
//!
//! Creation and reads are open to any authenticated, unbanned donor
//! (the gate enforces the ban); updates are admin-only. Every write
//! re-validates the target center. The handler's terminal check is a
//! fast path only; the repository's compare-and-set on the read status
//! is what holds under concurrent writers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use hemolink_auth::{AdminUser, AuthUser};
use hemolink_common::{
    Error, Paginated, Pagination, RepositoryError, Result, StateError, ValidatedJson,
};

use crate::api::middleware::DonationsState;
use crate::domain::entities::{Donation, NewDonation};
use crate::domain::state::{DonationStateMachine, DonationStatus};
use crate::repository::DonationUpdate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    pub center_id: Uuid,
    pub scheduled_for: DateTime<Utc>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonationRequest {
    pub status: Option<DonationStatus>,
    pub center_id: Option<Uuid>,
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Only meaningful together with `status: completed`
    pub completed_at: Option<DateTime<Utc>>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// `completedAt` is a completion stamp, not an editable field; supplying
/// it without a completing status change is rejected rather than
/// silently dropped.
fn ensure_completion_stamp_scoped(payload: &UpdateDonationRequest) -> Result<()> {
    if payload.completed_at.is_some() && payload.status != Some(DonationStatus::Completed) {
        return Err(Error::Validation(
            "completedAt can only be supplied when setting status to completed".to_string(),
        ));
    }
    Ok(())
}

/// Ensure the target center exists and is accepting donations.
async fn ensure_center_active(state: &DonationsState, center_id: Uuid) -> Result<()> {
    let center = state
        .repos
        .centers
        .get_by_id(center_id)
        .await
        .map_err(|err| err.for_resource("Blood center"))?;

    if center.archived {
        return Err(Error::BusinessRule(
            "This blood center is no longer accepting donations".to_string(),
        ));
    }

    Ok(())
}

/// POST /donations
pub async fn create_donation(
    State(state): State<DonationsState>,
    AuthUser(context): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateDonationRequest>,
) -> Result<(StatusCode, Json<Donation>)> {
    ensure_center_active(&state, payload.center_id).await?;

    let donation = Donation::new(NewDonation {
        user_id: context.identity.id,
        center_id: payload.center_id,
        scheduled_for: payload.scheduled_for,
        notes: payload.notes,
    })?;

    let created = state
        .repos
        .donations
        .create(&donation)
        .await
        .map_err(Error::from)?;

    tracing::info!(donation_id = %created.id, user_id = %created.user_id, "Donation requested");

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /donations (admin)
pub async fn list_donations(
    State(state): State<DonationsState>,
    AdminUser(_): AdminUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<Donation>>> {
    let (donations, total) = state
        .repos
        .donations
        .list(&pagination)
        .await
        .map_err(Error::from)?;

    Ok(Json(Paginated::new(donations, &pagination, total)))
}

/// GET /donations/my-donations
pub async fn my_donations(
    State(state): State<DonationsState>,
    AuthUser(context): AuthUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<Donation>>> {
    let (donations, total) = state
        .repos
        .donations
        .list_for_user(context.identity.id, &pagination)
        .await
        .map_err(Error::from)?;

    Ok(Json(Paginated::new(donations, &pagination, total)))
}

/// GET /donations/{id} (owner or admin)
pub async fn get_donation(
    State(state): State<DonationsState>,
    AuthUser(context): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Donation>> {
    let donation = state
        .repos
        .donations
        .get_by_id(id)
        .await
        .map_err(|err| err.for_resource("Donation"))?;

    if !donation.is_owned_by(context.identity.id) && !context.is_admin() {
        return Err(Error::Forbidden(
            "You do not have permission to view this donation".to_string(),
        ));
    }

    Ok(Json(donation))
}

/// PATCH /donations/{id} (admin)
///
/// Terminal donations are immutable in every field. Transitions into
/// `completed` run through the transactional completion path so the
/// field edits, the status flip, and the donor counters commit as one
/// unit or not at all.
pub async fn update_donation(
    State(state): State<DonationsState>,
    AdminUser(context): AdminUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDonationRequest>,
) -> Result<Json<Donation>> {
    ensure_completion_stamp_scoped(&payload)?;

    let donation = state
        .repos
        .donations
        .get_by_id(id)
        .await
        .map_err(|err| err.for_resource("Donation"))?;

    if donation.status.is_terminal() {
        return Err(terminal_rejection(donation.status));
    }

    // Re-validated on every update, not just at creation
    let center_id = payload.center_id.unwrap_or(donation.center_id);
    ensure_center_active(&state, center_id).await?;

    let target_status = match payload.status {
        Some(target) => {
            Some(DonationStateMachine::transition(donation.status, target).map_err(state_error)?)
        }
        None => None,
    };

    if target_status == Some(DonationStatus::Completed) {
        let update = DonationUpdate {
            status: None,
            center_id: payload.center_id,
            scheduled_for: payload.scheduled_for,
            notes: payload.notes,
        };
        let completed_at = payload.completed_at.unwrap_or_else(Utc::now);
        let completed = state
            .repos
            .donations
            .complete(id, donation.user_id, donation.status, completed_at, &update)
            .await
            .map_err(concurrent_update)?;

        tracing::info!(
            donation_id = %id,
            admin_id = %context.identity.id,
            "Donation completed"
        );

        return Ok(Json(completed));
    }

    let update = DonationUpdate {
        status: target_status,
        center_id: payload.center_id,
        scheduled_for: payload.scheduled_for,
        notes: payload.notes,
    };

    let updated = state
        .repos
        .donations
        .update(id, donation.status, &update)
        .await
        .map_err(concurrent_update)?;

    tracing::info!(
        donation_id = %id,
        admin_id = %context.identity.id,
        status = %updated.status,
        "Donation updated"
    );

    Ok(Json(updated))
}

fn terminal_rejection(status: DonationStatus) -> Error {
    Error::ImmutableState(match status {
        DonationStatus::Completed => "Completed donations cannot be modified".to_string(),
        _ => "Canceled donations cannot be modified".to_string(),
    })
}

fn concurrent_update(err: RepositoryError) -> Error {
    match err {
        // Lost the compare-and-set: the donation changed state between
        // the read and the write
        RepositoryError::AlreadyExists => Error::ImmutableState(
            "Donation was modified by another request".to_string(),
        ),
        other => other.for_resource("Donation"),
    }
}

fn state_error(err: StateError) -> Error {
    match err {
        StateError::TerminalState(_) | StateError::InvalidTransition { .. } => {
            Error::ImmutableState(err.to_string())
        }
        StateError::GuardFailed(msg) => Error::BusinessRule(msg),
    }
}
