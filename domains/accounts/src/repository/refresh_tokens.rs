//! Refresh token repository

use jobboard_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::RefreshToken;

pub(crate) const REFRESH_TOKEN_COLUMNS: &str =
    "id, user_id, jti, issued_at, expires_at, revoked_at, replaced_by";

#[derive(Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a stored refresh token by its `jti` claim
    pub async fn find_by_jti(&self, jti: Uuid) -> Result<Option<RefreshToken>> {
        let query = format!("SELECT {REFRESH_TOKEN_COLUMNS} FROM refresh_tokens WHERE jti = $1");
        let row = sqlx::query_as::<_, RefreshToken>(&query)
            .bind(jti)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
