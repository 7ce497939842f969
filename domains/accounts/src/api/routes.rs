//! Route definitions for Accounts domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{auth, profile};
use super::middleware::AccountsState;

/// Registration, login and token lifecycle routes
fn auth_routes() -> Router<AccountsState> {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/token/refresh", post(auth::refresh_token))
}

/// Self-service profile routes
fn profile_routes() -> Router<AccountsState> {
    Router::new()
        .route(
            "/api/auth/profile",
            get(profile::get_profile).patch(profile::update_profile),
        )
        .route("/api/auth/change-password", post(profile::change_password))
}

/// Create all Accounts domain API routes
pub fn routes() -> Router<AccountsState> {
    Router::new().merge(auth_routes()).merge(profile_routes())
}
