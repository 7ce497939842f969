//! Companies domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use jobboard_auth::AuthBackend;

use crate::repository::CompaniesRepositories;
use crate::storage::LogoStorage;

/// Application state for the Companies domain
#[derive(Clone)]
pub struct CompaniesState {
    pub repos: CompaniesRepositories,
    pub auth: AuthBackend,
    pub logos: Arc<dyn LogoStorage>,
    /// Public prefix uploaded logo keys are served under
    pub media_base_url: String,
}

impl FromRef<CompaniesState> for AuthBackend {
    fn from_ref(state: &CompaniesState) -> Self {
        state.auth.clone()
    }
}
