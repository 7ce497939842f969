//! Route definitions for Jobs domain API

use axum::{routing::get, Router};

use super::handlers::{categories, jobs};
use super::middleware::JobsState;

fn category_routes() -> Router<JobsState> {
    Router::new().route(
        "/api/jobs/categories",
        get(categories::list_categories).post(categories::create_category),
    )
}

/// Static paths are registered next to `{slug}`; axum prefers the static match
fn job_routes() -> Router<JobsState> {
    Router::new()
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/api/jobs/featured", get(jobs::featured_jobs))
        .route("/api/jobs/recent", get(jobs::recent_jobs))
        .route("/api/jobs/stats", get(jobs::job_stats))
        .route(
            "/api/jobs/{slug}",
            get(jobs::get_job)
                .patch(jobs::update_job)
                .delete(jobs::delete_job),
        )
}

/// Create all Jobs domain API routes
pub fn routes() -> Router<JobsState> {
    Router::new().merge(category_routes()).merge(job_routes())
}
