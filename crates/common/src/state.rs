//! Status workflow errors
//!
//! Domain crates that model a status workflow report refused moves through
//! [`StateError`]; the API surfaces them as 400s.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    /// A guard refused the move; the message is shown to the caller as-is
    #[error("{0}")]
    GuardFailed(String),
}

impl From<StateError> for crate::Error {
    fn from(err: StateError) -> Self {
        match err {
            StateError::GuardFailed(message) => crate::Error::Validation(message),
        }
    }
}
