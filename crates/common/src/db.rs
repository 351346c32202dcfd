//! Shared database error type
//!
//! Domain repositories return `RepositoryError`; handlers attach the
//! resource name when mapping to the wire error so clients see
//! "Donation not found" rather than a generic fallback.

use crate::error::Error;
use thiserror::Error;

/// Database-level failures surfaced by repositories
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Map to the common error, naming the entity in not-found and
    /// duplicate messages.
    pub fn for_resource(self, resource: &str) -> Error {
        match self {
            RepositoryError::NotFound => Error::NotFound(format!("{resource} not found")),
            RepositoryError::AlreadyExists => Error::Conflict(format!("{resource} already exists")),
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::InvalidData(msg) => Error::Validation(msg),
        }
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        err.for_resource("Record")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_for_resource_names_the_entity() {
        let err = RepositoryError::NotFound.for_resource("Donation");
        assert_eq!(err.to_string(), "Donation not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_generic_conversion_keeps_fallback_wording() {
        let err: Error = RepositoryError::AlreadyExists.into();
        assert_eq!(err.to_string(), "Record already exists");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_connection_failures_stay_internal() {
        let err = RepositoryError::Connection(sqlx::Error::PoolClosed).for_resource("User");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
