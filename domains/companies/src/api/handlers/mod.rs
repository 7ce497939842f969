//! HTTP handlers for the Companies domain

pub mod companies;
pub mod logos;
