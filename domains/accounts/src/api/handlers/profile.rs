//! Profile API handlers
//!
//! Implements:
//! - GET   /api/auth/profile         Current user's profile
//! - PATCH /api/auth/profile         Update editable profile fields
//! - POST  /api/auth/change-password Change password and revoke refresh tokens

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use jobboard_auth::{hash_password, verify_password, AuthUser};
use jobboard_common::{Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::MessageResponse;
use crate::api::middleware::AccountsState;
use crate::domain::validation::{validate_phone, validate_username, MIN_PASSWORD_LEN};
use crate::repository::{revoke_all_refresh_tokens_tx, set_password_tx};
use crate::{ProfileChanges, User, UserRole};

/// Public view of a user (never carries the password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
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
    pub date_joined: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let full_name = user.full_name();
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            full_name,
            role: user.role,
            phone: user.phone,
            bio: user.bio,
            profile_pic: user.profile_pic,
            location: user.location,
            resume_url: user.resume_url,
            linkedin_url: user.linkedin_url,
            github_url: user.github_url,
            website_url: user.website_url,
            is_active: user.is_active,
            last_login: user.last_login,
            date_joined: user.created_at,
        }
    }
}

/// Partial profile update. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 150), custom(function = "validate_username"))]
    pub username: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(url)]
    pub profile_pic: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[validate(url)]
    pub resume_url: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    #[validate(url)]
    pub website_url: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            bio: req.bio,
            profile_pic: req.profile_pic,
            location: req.location,
            resume_url: req.resume_url,
            linkedin_url: req.linkedin_url,
            github_url: req.github_url,
            website_url: req.website_url,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = MIN_PASSWORD_LEN))]
    pub new_password: String,
    pub new_password_confirm: String,
}

async fn load_current_user(state: &AccountsState, user_id: Uuid) -> Result<User> {
    state
        .repos
        .users
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))
}

/// GET /api/auth/profile
pub async fn get_profile(
    AuthUser(auth): AuthUser,
    State(state): State<AccountsState>,
) -> Result<Json<UserResponse>> {
    let user = load_current_user(&state, auth.user_id()).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /api/auth/profile
pub async fn update_profile(
    AuthUser(auth): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    let mut user = load_current_user(&state, auth.user_id()).await?;

    ProfileChanges::from(req).apply_to(&mut user);
    user.validate()?;

    let updated = state.repos.users.update_profile(&user).await?;
    tracing::info!(user_id = %updated.id, "Profile updated");

    Ok(Json(UserResponse::from(updated)))
}

/// POST /api/auth/change-password
///
/// Every outstanding refresh token of the caller is revoked in the same
/// transaction as the password change.
pub async fn change_password(
    AuthUser(auth): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let user = load_current_user(&state, auth.user_id()).await?;

    if !verify_password(&req.old_password, &user.password_hash) {
        return Err(Error::Validation("Old password is incorrect".to_string()));
    }
    if req.new_password != req.new_password_confirm {
        return Err(Error::Validation("New passwords don't match".to_string()));
    }

    let password_hash = hash_password(&req.new_password)?;

    let mut tx = state.repos.begin().await?;
    set_password_tx(&mut tx, user.id, &password_hash).await?;
    let revoked = revoke_all_refresh_tokens_tx(&mut tx, user.id).await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, revoked_tokens = revoked, "Password changed");

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
