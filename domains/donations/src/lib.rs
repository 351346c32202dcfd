//! Donations domain: donation lifecycle, blood centers, completion accounting

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    BloodCenter, DayHours, Donation, NewBloodCenter, NewDonation, OperatingHours,
};
pub use domain::state::{DonationStateMachine, DonationStatus};
// Re-export repository types
pub use repository::{CenterRepository, DonationRepository, DonationsRepositories};

// Re-export API types
pub use api::routes;
pub use api::DonationsState;
