//! Transactional free functions for the donations domain (Zero2Prod pattern)

use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::Donation;
use crate::domain::state::DonationStatus;
use crate::repository::donations::DonationUpdate;

const DONATION_COLUMNS: &str =
    "id, user_id, center_id, status, scheduled_for, completed_at, notes, created_at, updated_at";

fn completion_query() -> String {
    format!(
        "UPDATE donations SET \
             status = 'completed', \
             completed_at = COALESCE(completed_at, $3), \
             center_id = COALESCE($4, center_id), \
             scheduled_for = COALESCE($5, scheduled_for), \
             notes = COALESCE($6, notes), \
             updated_at = NOW() \
         WHERE id = $1 AND status = $2 \
         RETURNING {DONATION_COLUMNS}"
    )
}

/// Mark a donation completed within an existing transaction.
///
/// Compare-and-set on `expected`, the non-terminal status the caller
/// read: a donation canceled or completed by a concurrent request no
/// longer matches, so two racing writers change exactly one row and the
/// loser gets `None` and must not touch the counters. Accompanying
/// field edits ride in the same statement so nothing persists if the
/// CAS loses. `completed_at` is stamped at most once via COALESCE.
pub async fn complete_donation_tx(
    transaction: &mut Transaction<'_, Postgres>,
    donation_id: Uuid,
    expected: DonationStatus,
    completed_at: DateTime<Utc>,
    update: &DonationUpdate,
) -> std::result::Result<Option<Donation>, sqlx::Error> {
    sqlx::query_as::<_, Donation>(&completion_query())
        .bind(donation_id)
        .bind(expected)
        .bind(completed_at)
        .bind(update.center_id)
        .bind(update.scheduled_for)
        .bind(&update.notes)
        .fetch_optional(&mut **transaction)
        .await
}

/// Record the completion against the donor within an existing transaction.
pub async fn record_donor_completion_tx(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    completed_at: DateTime<Utc>,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET \
             donation_count = donation_count + 1, \
             last_donation_date = $2, \
             updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(user_id)
    .bind(completed_at)
    .execute(&mut **transaction)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_write_is_guarded_by_read_status() {
        // A donation canceled between the handler's read and this write
        // no longer matches the predicate and cannot be completed.
        let query = completion_query();
        assert!(query.contains("WHERE id = $1 AND status = $2"));
        assert!(query.contains("status = 'completed'"));
    }

    #[test]
    fn test_completion_stamps_time_at_most_once() {
        assert!(completion_query().contains("completed_at = COALESCE(completed_at, $3)"));
    }

    #[test]
    fn test_completion_carries_field_edits_in_same_statement() {
        // Field edits must not persist in a separate write that could
        // outlive a lost CAS.
        let query = completion_query();
        assert!(query.contains("center_id = COALESCE($4, center_id)"));
        assert!(query.contains("scheduled_for = COALESCE($5, scheduled_for)"));
        assert!(query.contains("notes = COALESCE($6, notes)"));
    }
}
