//! Authentication errors
//!
//! Rejections from the extractors render through [`jobboard_common::Error`],
//! so a 401 here has the same body shape as every other API error.

use axum::response::{IntoResponse, Response};
use jobboard_common::Error;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication credentials were not provided")]
    MissingCredentials,

    #[error("Authorization header must be 'Bearer <token>'")]
    MalformedHeader,

    #[error("Token is invalid or expired")]
    InvalidToken,

    #[error("Token has the wrong type")]
    WrongTokenType,

    #[error("User not found")]
    UnknownUser,

    #[error("User account is disabled")]
    AccountDisabled,

    #[error("Failed to load user")]
    Lookup,

    #[error("Failed to issue token")]
    Signing,

    #[error("Failed to hash password")]
    Hashing,
}

impl AuthError {
    /// Failures on our side rather than the caller's
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Lookup | AuthError::Signing | AuthError::Hashing)
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        if err.is_internal() {
            Error::Internal(err.to_string())
        } else {
            Error::Authentication(err.to_string())
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        Error::from(self).into_response()
    }
}
