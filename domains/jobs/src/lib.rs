//! Jobs domain: categories, job postings, filtering, featured and recent
//! listings, board statistics

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;

// Re-export repository types
pub use repository::{
    BoardStats, CategoryRepository, JobFilter, JobRepository, JobsReadModels, JobsRepositories,
};

// Re-export API types
pub use api::routes;
pub use api::JobsState;
