//! Router state for the donors domain

use axum::extract::FromRef;

use hemolink_auth::AuthBackend;

use crate::repository::DonorsRepositories;

/// State shared by all donors-domain handlers
#[derive(Clone)]
pub struct DonorsState {
    pub repos: DonorsRepositories,
    pub auth: AuthBackend,
}

impl DonorsState {
    pub fn new(repos: DonorsRepositories, auth: AuthBackend) -> Self {
        Self { repos, auth }
    }
}

// Lets the auth extractors run against this domain's state
impl FromRef<DonorsState> for AuthBackend {
    fn from_ref(state: &DonorsState) -> Self {
        state.auth.clone()
    }
}
