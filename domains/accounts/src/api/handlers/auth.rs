//! Authentication API handlers
//!
//! Implements:
//! - POST /api/auth/register      Create an account and return a token pair
//! - POST /api/auth/login         Exchange email and password for a token pair
//! - POST /api/auth/logout        Blacklist a refresh token
//! - POST /api/auth/token/refresh Rotate a refresh token

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use jobboard_auth::{
    hash_password, issue_token, validate_token, verify_password, AuthConfig, AuthUser, TokenType,
};
use jobboard_common::{Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use super::profile::UserResponse;
use super::MessageResponse;
use crate::api::middleware::AccountsState;
use crate::domain::validation::{validate_phone, validate_username, MIN_PASSWORD_LEN};
use crate::repository::{
    create_refresh_token_tx, find_refresh_token_for_update_tx, revoke_refresh_token_tx,
};
use crate::{RefreshToken, User, UserRole};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 150), custom(function = "validate_username"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[validate(length(min = MIN_PASSWORD_LEN))]
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub role: UserRole,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Body carrying a refresh token (logout and rotation)
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokenPairResponse,
    pub message: &'static str,
}

/// Sign an access/refresh pair and record the refresh token's `jti`.
/// Returns the pair and the new refresh `jti`.
async fn issue_pair_tx(
    tx: &mut Transaction<'_, Postgres>,
    config: &AuthConfig,
    user: &User,
) -> Result<(TokenPairResponse, Uuid)> {
    let role = user.role.to_auth_role();
    let access = issue_token(user.id, &user.email, role, TokenType::Access, config)?;
    let refresh = issue_token(user.id, &user.email, role, TokenType::Refresh, config)?;

    let record = RefreshToken::new(user.id, refresh.jti, refresh.issued_at, refresh.expires_at);
    create_refresh_token_tx(tx, &record).await?;

    Ok((
        TokenPairResponse {
            access: access.token,
            refresh: refresh.token,
        },
        refresh.jti,
    ))
}

fn invalid_refresh() -> Error {
    Error::Authentication("Token is invalid or expired".to_string())
}

/// Decode a refresh token into its subject and `jti`
fn decode_refresh(token: &str, config: &AuthConfig) -> Result<(Uuid, Uuid)> {
    let claims = validate_token(token, config, TokenType::Refresh).map_err(|_| invalid_refresh())?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| invalid_refresh())?;
    let jti = Uuid::parse_str(&claims.jti).map_err(|_| invalid_refresh())?;
    Ok((user_id, jti))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    if req.password != req.password_confirm {
        return Err(Error::Validation("Passwords don't match".to_string()));
    }
    if !req.role.is_self_assignable() {
        return Err(Error::Validation(format!(
            "Cannot register with role '{}'",
            req.role
        )));
    }
    if state.repos.users.find_by_email(&req.email).await?.is_some() {
        return Err(Error::Validation(
            "A user with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;
    let mut user = User::new(
        req.email,
        req.username,
        req.first_name,
        req.last_name,
        password_hash,
        req.role,
    )?;
    user.phone = req.phone;
    user.validate()?;

    let user = state.repos.users.create(&user).await?;

    let mut tx = state.repos.begin().await?;
    let (tokens, _) = issue_pair_tx(&mut tx, state.auth.config(), &user).await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserResponse::from(user),
            tokens,
            message: "User registered successfully",
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let invalid = || Error::Authentication("Invalid credentials".to_string());

    let user = state
        .repos
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash) {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(invalid());
    }
    if !user.is_active {
        return Err(Error::Authentication(
            "User account is disabled".to_string(),
        ));
    }

    state.repos.users.touch_last_login(user.id).await?;

    let mut tx = state.repos.begin().await?;
    let (tokens, _) = issue_pair_tx(&mut tx, state.auth.config(), &user).await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: UserResponse::from(user),
        tokens,
        message: "Login successful",
    }))
}

/// POST /api/auth/logout
///
/// Blacklists the supplied refresh token. The token must belong to the caller.
pub async fn logout(
    AuthUser(auth): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<MessageResponse>> {
    let bad_token = || Error::Validation("Invalid token".to_string());

    let (subject, jti) =
        decode_refresh(&req.refresh, state.auth.config()).map_err(|_| bad_token())?;
    let stored = state
        .repos
        .refresh_tokens
        .find_by_jti(jti)
        .await?
        .ok_or_else(bad_token)?;

    if subject != auth.user_id() || stored.user_id != auth.user_id() {
        return Err(bad_token());
    }

    let mut tx = state.repos.begin().await?;
    revoke_refresh_token_tx(&mut tx, jti, None).await?;
    tx.commit().await?;

    tracing::info!(user_id = %auth.user_id(), "User logged out");

    Ok(Json(MessageResponse::new("Successfully logged out")))
}

/// POST /api/auth/token/refresh
///
/// Rotates the refresh token: the presented token is blacklisted and linked
/// to its replacement. A revoked or unknown token is rejected.
pub async fn refresh_token(
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<TokenPairResponse>> {
    let config = state.auth.config();
    let (user_id, jti) = decode_refresh(&req.refresh, config)?;

    let mut tx = state.repos.begin().await?;

    let stored = find_refresh_token_for_update_tx(&mut tx, jti)
        .await?
        .ok_or_else(invalid_refresh)?;
    if stored.user_id != user_id || !stored.is_usable_at(Utc::now()) {
        tracing::warn!(user_id = %user_id, jti = %jti, "Rejected reuse of refresh token");
        return Err(Error::Authentication("Token is blacklisted".to_string()));
    }

    let user = state
        .repos
        .users
        .get_by_id(user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(invalid_refresh)?;

    let (tokens, new_jti) = issue_pair_tx(&mut tx, config, &user).await?;
    revoke_refresh_token_tx(&mut tx, jti, Some(new_jti)).await?;
    tx.commit().await?;

    Ok(Json(tokens))
}
