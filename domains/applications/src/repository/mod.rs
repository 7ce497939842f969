//! Repository layer for the Applications domain

pub mod applications;
pub mod read_models;
pub mod transactions;

pub use applications::{ApplicationFilter, ApplicationRepository, ApplicationRow, StatusCounts};
pub use read_models::{ApplicantProfile, ApplicationsReadModels};
pub use transactions::{
    apply_counter_events_tx, delete_application_tx, find_application_for_update_tx,
    insert_application_tx, save_status_tx,
};

use sqlx::{PgPool, Postgres, Transaction};

/// Repositories for the Applications domain
#[derive(Clone)]
pub struct ApplicationsRepositories {
    pool: PgPool,
    pub applications: ApplicationRepository,
    pub read_models: ApplicationsReadModels,
}

impl ApplicationsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            applications: ApplicationRepository::new(pool.clone()),
            read_models: ApplicationsReadModels::new(pool.clone()),
            pool,
        }
    }

    /// Begin a transaction for counter-maintaining writes
    pub async fn begin(&self) -> std::result::Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}
