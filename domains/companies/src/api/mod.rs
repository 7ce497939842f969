//! API layer for the Companies domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::CompaniesState;
pub use routes::routes;
