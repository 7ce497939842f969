//! Repository implementations for the Accounts domain

pub mod refresh_tokens;
pub mod transactions;
pub mod users;

use sqlx::{PgPool, Postgres, Transaction};

pub use refresh_tokens::RefreshTokenRepository;
pub use transactions::{
    create_refresh_token_tx, find_refresh_token_for_update_tx, revoke_all_refresh_tokens_tx,
    revoke_refresh_token_tx, set_password_tx,
};
pub use users::{ProfileChanges, UserRepository};

/// Combined repository access for the Accounts domain
#[derive(Clone)]
pub struct AccountsRepositories {
    pool: PgPool,
    pub users: UserRepository,
    pub refresh_tokens: RefreshTokenRepository,
}

impl AccountsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            refresh_tokens: RefreshTokenRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a new database transaction.
    pub async fn begin(&self) -> std::result::Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}
