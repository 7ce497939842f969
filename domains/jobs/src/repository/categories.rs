//! Category repository

use jobboard_common::{is_unique_violation, Error, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::Category;

pub(crate) const CATEGORY_COLUMNS: &str =
    "id, name, slug, description, icon, is_active, created_at, updated_at";

const CATEGORY_JOB_COUNT: &str =
    "(SELECT COUNT(*) FROM jobs j WHERE j.category_id = categories.id AND j.is_active)";

/// Category together with its number of active jobs
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryWithJobCount {
    #[sqlx(flatten)]
    pub category: Category,
    pub job_count: i64,
}

fn map_category_write_error(err: sqlx::Error) -> Error {
    if is_unique_violation(&err) {
        return Error::Validation("A category with this name already exists".to_string());
    }
    Error::Database(err)
}

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active categories ordered by name
    pub async fn list_active(&self) -> Result<Vec<CategoryWithJobCount>> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS}, {CATEGORY_JOB_COUNT} AS job_count \
             FROM categories WHERE is_active ORDER BY name"
        );
        let rows = sqlx::query_as::<_, CategoryWithJobCount>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        let row = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Categories with their job counts, for nesting into job responses
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<CategoryWithJobCount>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {CATEGORY_COLUMNS}, {CATEGORY_JOB_COUNT} AS job_count \
             FROM categories WHERE id = ANY($1)"
        );
        let rows = sqlx::query_as::<_, CategoryWithJobCount>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Slugs equal to `base` or of the form `base-N`
    pub async fn taken_slugs(&self, base: &str) -> Result<Vec<String>> {
        let slugs = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM categories WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(base)
        .fetch_all(&self.pool)
        .await?;
        Ok(slugs)
    }

    pub async fn create(&self, category: &Category) -> Result<Category> {
        let query = format!(
            "INSERT INTO categories ({CATEGORY_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(&category.icon)
            .bind(category.is_active)
            .bind(category.created_at)
            .bind(category.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_category_write_error)
    }
}
