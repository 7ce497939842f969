//! HTTP handlers for the Jobs domain

pub mod categories;
pub mod jobs;
