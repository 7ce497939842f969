//! Domain layer for Companies

pub mod entities;
