//! Job board application composition root
//!
//! Composes all domain routers into a single application.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use jobboard_accounts::{AccountsRepositories, AccountsState};
use jobboard_applications::{ApplicationsRepositories, ApplicationsState};
use jobboard_auth::{AuthBackend, AuthConfig};
use jobboard_common::Config;
use jobboard_companies::{CompaniesRepositories, CompaniesState, LocalLogoStorage, LogoStorage};
use jobboard_jobs::{JobsRepositories, JobsState};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
};

/// Upper bound on any request body. Routes may set a tighter limit of their own.
pub const MAX_REQUEST_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Create the main application router, storing uploaded logos on local disk
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    if let Err(e) = tokio::fs::create_dir_all(&config.media_root).await {
        tracing::warn!(error = %e, dir = %config.media_root, "Failed to create media root");
    }
    let logos: Arc<dyn LogoStorage> = Arc::new(LocalLogoStorage::new(&config.media_root));
    Ok(build_router(&config, pool, logos))
}

/// Compose every domain router with its state. Storage is injected so
/// tests can swap in an in-memory backend.
pub fn build_router(config: &Config, pool: PgPool, logos: Arc<dyn LogoStorage>) -> Router {
    let auth = AuthBackend::new(pool.clone(), AuthConfig::from_config(config));

    let accounts_state = AccountsState {
        repos: AccountsRepositories::new(pool.clone()),
        auth: auth.clone(),
    };
    let companies_state = CompaniesState {
        repos: CompaniesRepositories::new(pool.clone()),
        auth: auth.clone(),
        logos,
        media_base_url: config.media_base_url.clone(),
    };
    let jobs_state = JobsState {
        repos: JobsRepositories::new(pool.clone()),
        auth: auth.clone(),
        media_base_url: config.media_base_url.clone(),
    };
    let applications_state = ApplicationsState {
        repos: ApplicationsRepositories::new(pool),
        auth,
    };

    let mut app = Router::new()
        .route("/health", get(health_check))
        .merge(jobboard_accounts::routes().with_state(accounts_state))
        .merge(jobboard_companies::routes().with_state(companies_state))
        .merge(jobboard_jobs::routes().with_state(jobs_state))
        .merge(jobboard_applications::routes().with_state(applications_state))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES));

    // Relative base URLs are served from the media root; absolute ones point at a CDN
    if config.media_base_url.starts_with('/') {
        app = app.nest_service(
            config.media_base_url.trim_end_matches('/'),
            ServeDir::new(&config.media_root),
        );
    }

    app
}

/// CORS policy: the configured origins, or anything when none are configured
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
