//! Route definitions for Companies domain API

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::handlers::{companies, logos};
use super::middleware::CompaniesState;
use crate::storage::MAX_LOGO_BYTES;

/// Multipart framing allowance on top of the logo itself
const LOGO_BODY_OVERHEAD: usize = 64 * 1024;

fn company_routes() -> Router<CompaniesState> {
    Router::new()
        .route(
            "/api/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/api/companies/{slug}",
            get(companies::get_company)
                .patch(companies::update_company)
                .delete(companies::delete_company),
        )
}

fn logo_routes() -> Router<CompaniesState> {
    Router::new()
        .route("/api/companies/{slug}/logo", post(logos::upload_logo))
        .layer(DefaultBodyLimit::max(MAX_LOGO_BYTES + LOGO_BODY_OVERHEAD))
}

/// Create all Companies domain API routes
pub fn routes() -> Router<CompaniesState> {
    Router::new().merge(company_routes()).merge(logo_routes())
}
