//! Repository layer for Jobs domain

pub mod categories;
pub mod jobs;
pub mod read_models;

use sqlx::PgPool;

pub use categories::{CategoryRepository, CategoryWithJobCount};
pub use jobs::{BoardStats, JobFilter, JobRepository, DEFAULT_JOB_ORDERING, JOB_ORDERING_FIELDS};
pub use read_models::{CompanySummary, JobsReadModels};

/// Combined repository access for the Jobs domain
#[derive(Clone)]
pub struct JobsRepositories {
    pub jobs: JobRepository,
    pub categories: CategoryRepository,
    pub read_models: JobsReadModels,
}

impl JobsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            jobs: JobRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            read_models: JobsReadModels::new(pool),
        }
    }
}
