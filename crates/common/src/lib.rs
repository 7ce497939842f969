//! Shared utilities, configuration, and error handling for the job board
//!
//! This crate provides common functionality used across the domain crates:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Pagination, ordering and validated-JSON extractors
//! - Slug derivation
//! - Money amount bounds

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod money;
pub mod slug;
pub mod state;

pub use config::Config;
pub use db::{contains_pattern, is_unique_violation, push_ilike};
pub use error::{Error, Result};
pub use money::check_amount;
pub use extractors::{OrderField, Ordering, Page, PageParams, ValidatedJson, PAGE_SIZE};
pub use slug::{slugify, with_suffix};
pub use state::StateError;
