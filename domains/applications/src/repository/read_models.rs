//! CQRS read models over the jobs, companies and users tables

use jobboard_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::JobSnapshot;

const JOB_SNAPSHOT_SELECT: &str = "SELECT j.id, j.title, j.slug, j.location, \
     j.job_type::text AS job_type, j.status::text AS status, j.is_active, \
     j.accept_applications, j.expires_at, j.posted_by, j.company_id, \
     c.name AS company_name, c.slug AS company_slug \
     FROM jobs j JOIN companies c ON c.id = j.company_id";

/// Applicant fields shown to reviewers on the detail view
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplicantProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
}

impl ApplicantProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Clone)]
pub struct ApplicationsReadModels {
    pool: PgPool,
}

impl ApplicationsReadModels {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn job(&self, id: Uuid) -> Result<Option<JobSnapshot>> {
        let query = format!("{JOB_SNAPSHOT_SELECT} WHERE j.id = $1");
        let row = sqlx::query_as::<_, JobSnapshot>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Batch lookup for list endpoints
    pub async fn jobs(&self, ids: &[Uuid]) -> Result<Vec<JobSnapshot>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("{JOB_SNAPSHOT_SELECT} WHERE j.id = ANY($1)");
        let rows = sqlx::query_as::<_, JobSnapshot>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn applicant(&self, id: Uuid) -> Result<Option<ApplicantProfile>> {
        let row = sqlx::query_as::<_, ApplicantProfile>(
            "SELECT id, email, username, first_name, last_name, phone, location, resume_url, \
                    linkedin_url, github_url, website_url \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
