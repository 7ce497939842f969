//! Per-request identity lookup
//!
//! Token claims only prove who the caller was when the token was signed.
//! The backend re-reads the account so deactivation and role changes apply
//! on the next request.

use sqlx::PgPool;
use uuid::Uuid;

use crate::claims::TokenType;
use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::jwt::validate_token;
use crate::types::AuthIdentity;

/// Pool and signing config shared by the extractors.
///
/// Each domain state hands one out via `FromRef<DomainState> for AuthBackend`.
#[derive(Clone)]
pub struct AuthBackend {
    pool: PgPool,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(pool: PgPool, config: AuthConfig) -> Self {
        Self { pool, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    async fn identity(&self, id: Uuid) -> Result<Option<AuthIdentity>, AuthError> {
        sqlx::query_as::<_, AuthIdentity>(
            "SELECT id, email, username, first_name, last_name, role, is_active \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %id, "Failed to load caller identity");
            AuthError::Lookup
        })
    }

    /// Turn an access token into the caller's context
    pub(crate) async fn authenticate(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = validate_token(token, &self.config, TokenType::Access)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let identity = self.identity(user_id).await?.ok_or(AuthError::UnknownUser)?;
        if !identity.is_active {
            tracing::debug!(user_id = %user_id, "Rejected token of disabled account");
            return Err(AuthError::AccountDisabled);
        }

        Ok(AuthContext::new(identity))
    }
}
