//! Request extractors
//!
//! Both extractors work for any router state that can hand out an
//! [`AuthBackend`] through `FromRef`.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;

/// The bearer token of the request, `None` when no `Authorization` header is sent
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AuthError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(Some(token)),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Caller identity on endpoints that require a login
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(AuthError::MissingCredentials)?;
        let context = AuthBackend::from_ref(state).authenticate(token).await?;
        Ok(AuthUser(context))
    }
}

/// Caller identity on public endpoints whose output depends on who is asking.
///
/// Anonymous requests get `None`; a bad token is still a 401.
#[derive(Debug)]
pub struct MaybeAuth(pub Option<AuthContext>);

impl<S> FromRequestParts<S> for MaybeAuth
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => {
                let context = AuthBackend::from_ref(state).authenticate(token).await?;
                Ok(MaybeAuth(Some(context)))
            }
            None => Ok(MaybeAuth(None)),
        }
    }
}
