//! Donation repository
//!
//! Runtime `sqlx::query_as` throughout, matching the rest of the
//! workspace. Writes are compare-and-set on the status the caller read,
//! so a donation that reaches a terminal state between the handler's
//! read and the write loses the write at the storage layer. The
//! completion path runs through `transactions.rs` so the status flip,
//! the field edits, and the donor counters commit atomically.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use hemolink_common::{Pagination, RepositoryError};

use crate::domain::entities::Donation;
use crate::domain::state::DonationStatus;
use crate::repository::transactions::{complete_donation_tx, record_donor_completion_tx};

const DONATION_COLUMNS: &str =
    "id, user_id, center_id, status, scheduled_for, completed_at, notes, created_at, updated_at";

/// Partial donation update applied by administrators. The status change,
/// if any, has already been checked against the state machine.
#[derive(Debug, Clone, Default)]
pub struct DonationUpdate {
    pub status: Option<DonationStatus>,
    pub center_id: Option<Uuid>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

fn update_query() -> String {
    format!(
        "UPDATE donations SET \
             status = COALESCE($3, status), \
             center_id = COALESCE($4, center_id), \
             scheduled_for = COALESCE($5, scheduled_for), \
             notes = COALESCE($6, notes), \
             updated_at = NOW() \
         WHERE id = $1 AND status = $2 \
         RETURNING {DONATION_COLUMNS}"
    )
}

#[derive(Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, donation: &Donation) -> Result<Donation, RepositoryError> {
        let query = format!(
            "INSERT INTO donations (id, user_id, center_id, status, scheduled_for, \
                 completed_at, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {DONATION_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Donation>(&query)
            .bind(donation.id)
            .bind(donation.user_id)
            .bind(donation.center_id)
            .bind(donation.status)
            .bind(donation.scheduled_for)
            .bind(donation.completed_at)
            .bind(&donation.notes)
            .bind(donation.created_at)
            .bind(donation.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Donation, RepositoryError> {
        let query = format!("SELECT {DONATION_COLUMNS} FROM donations WHERE id = $1");

        sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// List all donations, newest first (admin view).
    pub async fn list(
        &self,
        pagination: &Pagination,
    ) -> Result<(Vec<Donation>, i64), RepositoryError> {
        let query = format!(
            "SELECT {DONATION_COLUMNS} FROM donations \
             ORDER BY created_at DESC \
             LIMIT $1 OFFSET $2"
        );

        let donations = sqlx::query_as::<_, Donation>(&query)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM donations")
            .fetch_one(&self.pool)
            .await?;

        Ok((donations, total.0))
    }

    /// List one donor's donations, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> Result<(Vec<Donation>, i64), RepositoryError> {
        let query = format!(
            "SELECT {DONATION_COLUMNS} FROM donations \
             WHERE user_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );

        let donations = sqlx::query_as::<_, Donation>(&query)
            .bind(user_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM donations WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((donations, total.0))
    }

    /// Apply a non-completing update; absent fields keep their value.
    ///
    /// Compare-and-set on `expected`, the status the caller read. Zero
    /// rows means the donation changed state under a concurrent request
    /// (donations are never deleted), reported as `AlreadyExists` like a
    /// lost completion CAS.
    ///
    /// Completion goes through [`DonationRepository::complete`] instead so
    /// the donor counters move in the same transaction.
    pub async fn update(
        &self,
        id: Uuid,
        expected: DonationStatus,
        update: &DonationUpdate,
    ) -> Result<Donation, RepositoryError> {
        sqlx::query_as::<_, Donation>(&update_query())
            .bind(id)
            .bind(expected)
            .bind(update.status)
            .bind(update.center_id)
            .bind(update.scheduled_for)
            .bind(&update.notes)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::AlreadyExists)
    }

    /// Complete a donation and credit the donor atomically.
    ///
    /// The status flip, any accompanying field edits, and the donor
    /// counters commit in one transaction, guarded by the same
    /// compare-and-set on `expected`. Returns `AlreadyExists` if a
    /// concurrent request moved the donation first (a racing completion
    /// has already credited the donor; a racing cancellation made the
    /// donation terminal).
    pub async fn complete(
        &self,
        id: Uuid,
        user_id: Uuid,
        expected: DonationStatus,
        completed_at: DateTime<Utc>,
        update: &DonationUpdate,
    ) -> Result<Donation, RepositoryError> {
        let mut transaction = self.pool.begin().await?;

        let Some(donation) =
            complete_donation_tx(&mut transaction, id, expected, completed_at, update).await?
        else {
            transaction.rollback().await?;
            return Err(RepositoryError::AlreadyExists);
        };

        // The donation row is the source of truth for the stamped time
        let stamped = donation.completed_at.unwrap_or(completed_at);
        record_donor_completion_tx(&mut transaction, user_id, stamped).await?;

        transaction.commit().await?;

        Ok(donation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_write_is_guarded_by_read_status() {
        // A donation canceled or completed after the handler's read must
        // not accept field edits; the CAS predicate closes the window.
        let query = update_query();
        assert!(query.contains("WHERE id = $1 AND status = $2"));
    }

    #[test]
    fn test_update_never_stamps_completion() {
        let query = update_query();
        assert!(!query.contains("completed_at"));
        assert!(!query.contains("'completed'"));
    }
}
