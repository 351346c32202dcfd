//! Domain entities for the donations domain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use hemolink_common::{Error, Result};

use crate::domain::state::DonationStatus;

/// Maximum length for donation notes
pub const MAX_NOTES_LEN: usize = 1000;

/// Opening/closing times for one day, stored as display strings
/// (e.g. "08:00"). Hours are stored, never searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
}

/// Weekly operating hours; days with no entry are closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayHours>,
}

/// Fields required to register a blood center
#[derive(Debug, Clone)]
pub struct NewBloodCenter {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub operating_hours: OperatingHours,
}

/// Blood center entity; archived centers stay readable but accept no
/// new or updated donations.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BloodCenter {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub operating_hours: Json<OperatingHours>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BloodCenter {
    pub fn new(fields: NewBloodCenter) -> Result<Self> {
        if !(-90.0..=90.0).contains(&fields.latitude) {
            return Err(Error::Validation(
                "Latitude must be between -90 and 90".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&fields.longitude) {
            return Err(Error::Validation(
                "Longitude must be between -180 and 180".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(BloodCenter {
            id: Uuid::new_v4(),
            name: fields.name,
            address: fields.address,
            phone: fields.phone,
            latitude: fields.latitude,
            longitude: fields.longitude,
            operating_hours: Json(fields.operating_hours),
            archived: false,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Fields required to request a donation
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub user_id: Uuid,
    pub center_id: Uuid,
    pub scheduled_for: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Donation entity
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub center_id: Uuid,
    pub status: DonationStatus,
    pub scheduled_for: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donation {
    /// Create a new donation request in the initial state.
    pub fn new(fields: NewDonation) -> Result<Self> {
        if let Some(ref notes) = fields.notes {
            if notes.len() > MAX_NOTES_LEN {
                return Err(Error::Validation(format!(
                    "Notes must be at most {} characters",
                    MAX_NOTES_LEN
                )));
            }
        }

        let now = Utc::now();
        Ok(Donation {
            id: Uuid::new_v4(),
            user_id: fields.user_id,
            center_id: fields.center_id,
            status: DonationStatus::Requested,
            scheduled_for: fields.scheduled_for,
            completed_at: None,
            notes: fields.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}
