//! Domain layer for Applications

pub mod entities;
pub mod events;
pub mod state;
