//! Accounts domain: users, registration, login, refresh tokens, profiles

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{RefreshToken, User, UserRole};

// Re-export repository types
pub use repository::{AccountsRepositories, ProfileChanges, RefreshTokenRepository, UserRepository};

// Re-export API types
pub use api::routes;
pub use api::AccountsState;
