//! User repository
//!
//! Uses runtime `sqlx::query_as` (not the compile-time macros) so the
//! crate builds without a live DATABASE_URL.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use hemolink_auth::{AccountStatus, RoleSet};
use hemolink_common::{Pagination, RepositoryError};

use crate::domain::entities::{BloodType, User};

const USER_COLUMNS: &str = "id, email, password_hash, roles, status, full_name, phone, \
     gender, date_of_birth, blood_type, medical_history, address, \
     donation_count, last_donation_date, created_at, updated_at";

/// Partial profile update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
    pub blood_type: Option<BloodType>,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Persist a new user. A unique-constraint violation on the email
    /// column surfaces as `AlreadyExists`.
    pub async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let query = format!(
            "INSERT INTO users (id, email, password_hash, roles, status, full_name, phone, \
                 gender, date_of_birth, blood_type, medical_history, address, \
                 donation_count, last_donation_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.roles)
            .bind(user.status)
            .bind(&user.full_name)
            .bind(&user.phone)
            .bind(user.gender)
            .bind(user.date_of_birth)
            .bind(user.blood_type)
            .bind(&user.medical_history)
            .bind(&user.address)
            .bind(user.donation_count)
            .bind(user.last_donation_date)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RepositoryError::AlreadyExists
                }
                _ => RepositoryError::Connection(err),
            })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// List users, newest first, with the total row count for pagination.
    pub async fn list(&self, pagination: &Pagination) -> Result<(Vec<User>, i64), RepositoryError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
             ORDER BY created_at DESC \
             LIMIT $1 OFFSET $2"
        );

        let users = sqlx::query_as::<_, User>(&query)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok((users, total.0))
    }

    /// Apply a partial profile update; absent fields keep their value.
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<User, RepositoryError> {
        let query = format!(
            "UPDATE users SET \
                 full_name = COALESCE($2, full_name), \
                 phone = COALESCE($3, phone), \
                 address = COALESCE($4, address), \
                 medical_history = COALESCE($5, medical_history), \
                 blood_type = COALESCE($6, blood_type), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&update.full_name)
            .bind(&update.phone)
            .bind(&update.address)
            .bind(&update.medical_history)
            .bind(update.blood_type)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    pub async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<User, RepositoryError> {
        let query = format!(
            "UPDATE users SET status = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    pub async fn set_roles(&self, id: Uuid, roles: &RoleSet) -> Result<User, RepositoryError> {
        let query = format!(
            "UPDATE users SET roles = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(Json(roles))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}
