//! Domain layer for Jobs

pub mod entities;
