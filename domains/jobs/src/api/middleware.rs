//! Jobs domain state and auth backend integration

use axum::extract::FromRef;
use jobboard_auth::AuthBackend;

use crate::repository::JobsRepositories;

/// Application state for the Jobs domain
#[derive(Clone)]
pub struct JobsState {
    pub repos: JobsRepositories,
    pub auth: AuthBackend,
    /// Prefix for uploaded company logos embedded in job responses
    pub media_base_url: String,
}

impl FromRef<JobsState> for AuthBackend {
    fn from_ref(state: &JobsState) -> Self {
        state.auth.clone()
    }
}
