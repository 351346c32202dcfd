//! Repository layer for the donors domain

pub mod users;

pub use users::{ProfileUpdate, UserRepository};

use sqlx::PgPool;

/// Container for all donors-domain repositories
#[derive(Clone)]
pub struct DonorsRepositories {
    pub users: UserRepository,
}

impl DonorsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }
}
