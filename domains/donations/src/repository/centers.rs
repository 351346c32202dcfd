//! Blood center repository

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use hemolink_common::{Pagination, RepositoryError};

use crate::domain::entities::{BloodCenter, OperatingHours};

const CENTER_COLUMNS: &str = "id, name, address, phone, latitude, longitude, \
     operating_hours, archived, created_at, updated_at";

/// Partial center update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct CenterUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub operating_hours: Option<OperatingHours>,
}

#[derive(Clone)]
pub struct CenterRepository {
    pool: PgPool,
}

impl CenterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, center: &BloodCenter) -> Result<BloodCenter, RepositoryError> {
        let query = format!(
            "INSERT INTO blood_centers (id, name, address, phone, latitude, longitude, \
                 operating_hours, archived, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {CENTER_COLUMNS}"
        );

        let created = sqlx::query_as::<_, BloodCenter>(&query)
            .bind(center.id)
            .bind(&center.name)
            .bind(&center.address)
            .bind(&center.phone)
            .bind(center.latitude)
            .bind(center.longitude)
            .bind(&center.operating_hours)
            .bind(center.archived)
            .bind(center.created_at)
            .bind(center.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<BloodCenter, RepositoryError> {
        let query = format!("SELECT {CENTER_COLUMNS} FROM blood_centers WHERE id = $1");

        sqlx::query_as::<_, BloodCenter>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// List non-archived centers, alphabetically.
    pub async fn list(
        &self,
        pagination: &Pagination,
    ) -> Result<(Vec<BloodCenter>, i64), RepositoryError> {
        let query = format!(
            "SELECT {CENTER_COLUMNS} FROM blood_centers \
             WHERE archived = FALSE \
             ORDER BY name ASC \
             LIMIT $1 OFFSET $2"
        );

        let centers = sqlx::query_as::<_, BloodCenter>(&query)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM blood_centers WHERE archived = FALSE")
                .fetch_one(&self.pool)
                .await?;

        Ok((centers, total.0))
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: &CenterUpdate,
    ) -> Result<BloodCenter, RepositoryError> {
        let query = format!(
            "UPDATE blood_centers SET \
                 name = COALESCE($2, name), \
                 address = COALESCE($3, address), \
                 phone = COALESCE($4, phone), \
                 latitude = COALESCE($5, latitude), \
                 longitude = COALESCE($6, longitude), \
                 operating_hours = COALESCE($7, operating_hours), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {CENTER_COLUMNS}"
        );

        sqlx::query_as::<_, BloodCenter>(&query)
            .bind(id)
            .bind(&update.name)
            .bind(&update.address)
            .bind(&update.phone)
            .bind(update.latitude)
            .bind(update.longitude)
            .bind(update.operating_hours.as_ref().map(Json))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Soft delete: the center stays readable by ID but disappears from
    /// listings and refuses new donations.
    pub async fn archive(&self, id: Uuid) -> Result<BloodCenter, RepositoryError> {
        let query = format!(
            "UPDATE blood_centers SET archived = TRUE, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {CENTER_COLUMNS}"
        );

        sqlx::query_as::<_, BloodCenter>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}
