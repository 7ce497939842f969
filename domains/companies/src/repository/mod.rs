//! Repository layer for Companies domain

pub mod companies;

pub use companies::{CompanyFilter, CompanyRepository, COMPANY_ORDERING_FIELDS};

use sqlx::PgPool;

/// Combined repository access for the Companies domain
#[derive(Clone)]
pub struct CompaniesRepositories {
    pub companies: CompanyRepository,
}

impl CompaniesRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            companies: CompanyRepository::new(pool),
        }
    }
}
