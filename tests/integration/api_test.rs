//! API endpoint integration tests
//!
//! Drive the composed router against a real PostgreSQL database
//! (`TEST_DATABASE_URL`).

#![allow(dead_code)]

mod applications;
mod auth;
mod common;
mod companies;
mod invariants;
mod jobs;
