//! Route definitions for Applications domain API

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::applications;
use super::middleware::ApplicationsState;

/// Create all Applications domain API routes
pub fn routes() -> Router<ApplicationsState> {
    Router::new()
        .route("/api/applications", get(applications::list_applications))
        .route("/api/applications/apply", post(applications::apply))
        .route(
            "/api/applications/my-applications",
            get(applications::my_applications),
        )
        .route("/api/applications/stats", get(applications::application_stats))
        .route(
            "/api/applications/{id}",
            get(applications::get_application).delete(applications::delete_application),
        )
        .route(
            "/api/applications/{id}/status",
            patch(applications::update_status),
        )
        .route(
            "/api/applications/{id}/withdraw",
            post(applications::withdraw),
        )
}
