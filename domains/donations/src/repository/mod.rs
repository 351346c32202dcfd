//! Repository layer for the donations domain

pub mod centers;
pub mod donations;
pub mod transactions;

pub use centers::{CenterRepository, CenterUpdate};
pub use donations::{DonationRepository, DonationUpdate};

use sqlx::PgPool;

/// Container for all donations-domain repositories
#[derive(Clone)]
pub struct DonationsRepositories {
    pub donations: DonationRepository,
    pub centers: CenterRepository,
}

impl DonationsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            donations: DonationRepository::new(pool.clone()),
            centers: CenterRepository::new(pool),
        }
    }
}
