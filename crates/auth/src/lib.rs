//! Authentication and authorization for the job board API
//!
//! Provides JWT issue/validation, password hashing, axum extractors that
//! work with any domain state implementing `FromRef<S>` for `AuthBackend`,
//! and the role/ownership policy every mutating endpoint consults.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;
mod password;
pub mod policy;
mod types;

pub use backend::AuthBackend;
pub use claims::{Claims, TokenType};
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::{AuthUser, MaybeAuth};
pub use jwt::{issue_token, validate_token, IssuedToken};
pub use password::{hash_password, verify_password};
pub use policy::{authorize, Action, ApplicationScope, Decision, Ownership};
pub use types::{AuthIdentity, AuthRole};
