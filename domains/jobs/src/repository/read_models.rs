//! Cross-domain read models
//!
//! Jobs embed a compact view of their company and show the poster's name.
//! Those rows belong to other domains, so they are read through local
//! `FromRow` structs instead of depending on the owning crates.

use jobboard_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Company as embedded in job responses
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CompanySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub logo_url: Option<String>,
    pub logo_path: Option<String>,
    pub location: Option<String>,
    pub size: Option<String>,
    pub industry: Option<String>,
    pub is_verified: bool,
    pub job_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

const COMPANY_SUMMARY_QUERY: &str = "SELECT c.id, c.name, c.slug, c.description, c.logo_url, \
     c.logo_path, c.location, c.size::text AS size, c.industry, c.is_verified, \
     (SELECT COUNT(*) FROM jobs j WHERE j.company_id = c.id AND j.is_active) AS job_count, \
     c.created_at \
     FROM companies c";

#[derive(Debug, sqlx::FromRow)]
struct PosterName {
    first_name: String,
    last_name: String,
}

#[derive(Clone)]
pub struct JobsReadModels {
    pool: PgPool,
}

impl JobsReadModels {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn company(&self, id: Uuid) -> Result<Option<CompanySummary>> {
        let query = format!("{COMPANY_SUMMARY_QUERY} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CompanySummary>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn companies(&self, ids: &[Uuid]) -> Result<Vec<CompanySummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("{COMPANY_SUMMARY_QUERY} WHERE c.id = ANY($1)");
        let rows = sqlx::query_as::<_, CompanySummary>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// "First Last" of the posting user, if the user still exists
    pub async fn poster_name(&self, user_id: Uuid) -> Result<Option<String>> {
        let row = sqlx::query_as::<_, PosterName>(
            "SELECT first_name, last_name FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|p| format!("{} {}", p.first_name, p.last_name).trim().to_string()))
    }
}
