//! Authorization context for authenticated users

use uuid::Uuid;

use crate::policy::{ApplicationScope, Ownership};
use crate::types::{AuthIdentity, AuthRole};

/// Represents an authenticated user context
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
}

impl AuthContext {
    pub fn new(user: AuthIdentity) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> AuthRole {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == AuthRole::Admin
    }

    pub fn is_employer(&self) -> bool {
        self.user.role == AuthRole::Employer
    }

    /// Job seekers carry the `user` role
    pub fn is_job_seeker(&self) -> bool {
        self.user.role == AuthRole::User
    }

    /// Ownership of a resource whose owner column may be NULL
    pub fn ownership_of(&self, owner_id: Option<Uuid>) -> Ownership {
        match owner_id {
            Some(id) if id == self.user.id => Ownership::Owner,
            _ => Ownership::NotOwner,
        }
    }

    /// Applications this caller may read on detail and stats endpoints
    pub fn application_scope(&self) -> ApplicationScope {
        match self.user.role {
            AuthRole::Admin => ApplicationScope::All,
            AuthRole::Employer => ApplicationScope::PostedBy(self.user.id),
            AuthRole::User => ApplicationScope::Applicant(self.user.id),
        }
    }

    /// Applications this caller may list on the employer-facing list endpoint
    pub fn review_scope(&self) -> ApplicationScope {
        match self.user.role {
            AuthRole::Admin => ApplicationScope::All,
            AuthRole::Employer => ApplicationScope::PostedBy(self.user.id),
            AuthRole::User => ApplicationScope::Nothing,
        }
    }
}
