//! Transaction helpers for the Accounts domain

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::refresh_tokens::REFRESH_TOKEN_COLUMNS;
use super::users::USER_COLUMNS;
use crate::domain::entities::{RefreshToken, User};

/// Record an issued refresh token within a transaction
pub async fn create_refresh_token_tx(
    tx: &mut Transaction<'_, Postgres>,
    token: &RefreshToken,
) -> Result<RefreshToken, sqlx::Error> {
    let query = format!(
        "INSERT INTO refresh_tokens ({REFRESH_TOKEN_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {REFRESH_TOKEN_COLUMNS}"
    );
    sqlx::query_as::<_, RefreshToken>(&query)
        .bind(token.id)
        .bind(token.user_id)
        .bind(token.jti)
        .bind(token.issued_at)
        .bind(token.expires_at)
        .bind(token.revoked_at)
        .bind(token.replaced_by)
        .fetch_one(&mut **tx)
        .await
}

/// Lock a stored refresh token row for rotation
pub async fn find_refresh_token_for_update_tx(
    tx: &mut Transaction<'_, Postgres>,
    jti: Uuid,
) -> Result<Option<RefreshToken>, sqlx::Error> {
    let query =
        format!("SELECT {REFRESH_TOKEN_COLUMNS} FROM refresh_tokens WHERE jti = $1 FOR UPDATE");
    sqlx::query_as::<_, RefreshToken>(&query)
        .bind(jti)
        .fetch_optional(&mut **tx)
        .await
}

/// Revoke a refresh token, optionally linking the token that replaced it.
/// Returns false when the token was already revoked.
pub async fn revoke_refresh_token_tx(
    tx: &mut Transaction<'_, Postgres>,
    jti: Uuid,
    replaced_by: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE refresh_tokens SET revoked_at = NOW(), replaced_by = $2 \
         WHERE jti = $1 AND revoked_at IS NULL",
    )
    .bind(jti)
    .bind(replaced_by)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Replace a user's password hash within a transaction
pub async fn set_password_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let query = format!(
        "UPDATE users SET password_hash = $2, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&query)
        .bind(user_id)
        .bind(password_hash)
        .fetch_one(&mut **tx)
        .await
}

/// Blacklist all outstanding refresh tokens for a user within a transaction
pub async fn revoke_all_refresh_tokens_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE refresh_tokens SET revoked_at = NOW() \
         WHERE user_id = $1 AND revoked_at IS NULL",
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected())
}
