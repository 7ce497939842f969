//! Category API handlers
//!
//! Implements:
//! - GET  /api/jobs/categories  Active categories (public)
//! - POST /api/jobs/categories  Create (admin)

use axum::{extract::State, http::StatusCode, Json};
use jobboard_auth::{authorize, Action, AuthUser, Ownership};
use jobboard_common::{slugify, with_suffix, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::JobsState;
use crate::domain::entities::Category;
use crate::repository::CategoryWithJobCount;

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub icon: String,
    pub job_count: i64,
}

impl From<CategoryWithJobCount> for CategoryResponse {
    fn from(row: CategoryWithJobCount) -> Self {
        Self {
            id: row.category.id,
            name: row.category.name,
            slug: row.category.slug,
            description: row.category.description,
            icon: row.category.icon,
            job_count: row.job_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Icon class name
    #[serde(default)]
    #[validate(length(max = 50))]
    pub icon: String,
    pub is_active: Option<bool>,
}

/// GET /api/jobs/categories
pub async fn list_categories(
    State(state): State<JobsState>,
) -> Result<Json<Vec<CategoryResponse>>> {
    let rows = state.repos.categories.list_active().await?;
    Ok(Json(rows.into_iter().map(CategoryResponse::from).collect()))
}

/// POST /api/jobs/categories
pub async fn create_category(
    AuthUser(auth): AuthUser,
    State(state): State<JobsState>,
    ValidatedJson(req): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>)> {
    authorize(auth.role(), Action::CreateCategory, Ownership::NotApplicable).require()?;

    let base = slugify(&req.name)?;
    let taken = state.repos.categories.taken_slugs(&base).await?;

    let mut category = Category::new(req.name, with_suffix(&base, &taken))?;
    category.description = req.description;
    category.icon = req.icon;
    category.is_active = req.is_active.unwrap_or(true);
    category.validate()?;

    let created = state.repos.categories.create(&category).await?;
    tracing::info!(category_id = %created.id, slug = %created.slug, "Category created");

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse::from(CategoryWithJobCount {
            category: created,
            job_count: 0,
        })),
    ))
}
