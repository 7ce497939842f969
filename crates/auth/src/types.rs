//! Auth CQRS read-model types
//!
//! Lightweight views of the `users` rows owned by the accounts domain.
//! These types carry only the fields needed for authentication and authorization.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lightweight identity for authenticated users.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: AuthRole,
    pub is_active: bool,
}

impl AuthIdentity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// User role for auth decisions. `User` is the job seeker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthRole {
    Admin,
    User,
    Employer,
}

impl std::fmt::Display for AuthRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthRole::Admin => write!(f, "admin"),
            AuthRole::User => write!(f, "user"),
            AuthRole::Employer => write!(f, "employer"),
        }
    }
}
