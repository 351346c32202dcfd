//! Router state for the donations domain

use axum::extract::FromRef;

use hemolink_auth::AuthBackend;

use crate::repository::DonationsRepositories;

/// State shared by all donations-domain handlers
#[derive(Clone)]
pub struct DonationsState {
    pub repos: DonationsRepositories,
    pub auth: AuthBackend,
}

impl DonationsState {
    pub fn new(repos: DonationsRepositories, auth: AuthBackend) -> Self {
        Self { repos, auth }
    }
}

// Lets the auth extractors run against this domain's state
impl FromRef<DonationsState> for AuthBackend {
    fn from_ref(state: &DonationsState) -> Self {
        state.auth.clone()
    }
}
