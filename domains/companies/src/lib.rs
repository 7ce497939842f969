//! Companies domain: company profiles, active job counts, logo uploads

pub mod api;
pub mod domain;
pub mod repository;
pub mod storage;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Company, CompanySize, CompanyWithJobCount};

// Re-export repository types
pub use repository::{CompaniesRepositories, CompanyFilter, CompanyRepository};

// Re-export storage types
pub use storage::{InMemoryLogoStorage, LocalLogoStorage, LogoError, LogoStorage};

// Re-export API types
pub use api::handlers::companies::CompanyListResponse;
pub use api::routes;
pub use api::CompaniesState;
