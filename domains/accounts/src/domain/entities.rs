//! Account domain entities
//!
//! `User` is the identity every other domain hangs its ownership on.
//! `RefreshToken` tracks issued refresh tokens so they can be rotated
//! and blacklisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jobboard_common::{Error, Result};

use crate::domain::validation::{is_valid_phone, MAX_BIO_LEN, USERNAME_REGEX};

/// User role. `User` is the job seeker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
    Employer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
            UserRole::Employer => write!(f, "employer"),
        }
    }
}

impl UserRole {
    /// Roles a caller may pick for themselves at registration
    pub fn is_self_assignable(&self) -> bool {
        matches!(self, UserRole::User | UserRole::Employer)
    }

    pub fn to_auth_role(self) -> jobboard_auth::AuthRole {
        match self {
            UserRole::Admin => jobboard_auth::AuthRole::Admin,
            UserRole::User => jobboard_auth::AuthRole::User,
            UserRole::Employer => jobboard_auth::AuthRole::Employer,
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub profile_pic: Option<String>,
    pub location: Option<String>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user. The email is stored lowercased.
    pub fn new(
        email: String,
        username: String,
        first_name: String,
        last_name: String,
        password_hash: String,
        role: UserRole,
    ) -> Result<Self> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            username: username.trim().to_string(),
            first_name,
            last_name,
            password_hash,
            role,
            phone: None,
            bio: None,
            profile_pic: None,
            location: None,
            resume_url: None,
            linkedin_url: None,
            github_url: None,
            website_url: None,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        user.validate()?;
        Ok(user)
    }

    /// "First Last", trimmed when either part is blank
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        if !self.email.contains('@') || self.email.len() > 254 {
            return Err(Error::Validation("Invalid email format".to_string()));
        }

        if self.username.is_empty() || self.username.len() > 150 {
            return Err(Error::Validation(
                "Username must be 1-150 characters".to_string(),
            ));
        }

        if !USERNAME_REGEX.is_match(&self.username) {
            return Err(Error::Validation(
                "Username may contain only letters, numbers, and @/./+/-/_ characters".to_string(),
            ));
        }

        if let Some(phone) = &self.phone {
            if !is_valid_phone(phone) {
                return Err(Error::Validation(
                    "Phone number must be entered in the format: '+999999999'".to_string(),
                ));
            }
        }

        if let Some(bio) = &self.bio {
            if bio.chars().count() > MAX_BIO_LEN {
                return Err(Error::Validation(format!(
                    "Bio must be at most {} characters",
                    MAX_BIO_LEN
                )));
            }
        }

        Ok(())
    }
}

/// Stored refresh token record (the token itself is never persisted, only its `jti`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub jti: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub replaced_by: Option<Uuid>,
}

impl RefreshToken {
    pub fn new(
        user_id: Uuid,
        jti: Uuid,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            jti,
            issued_at,
            expires_at,
            revoked_at: None,
            replaced_by: None,
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Neither revoked nor expired at `now`
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && now < self.expires_at
    }
}
