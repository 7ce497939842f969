//! Job repository

use chrono::{DateTime, Utc};
use jobboard_common::{
    contains_pattern, is_unique_violation, push_ilike, Error, Ordering, PageParams, Result,
};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entities::{ExperienceLevel, Job, JobType, RemoteType};

pub(crate) const JOB_COLUMNS: &str = "id, title, slug, description, requirements, \
     responsibilities, benefits, location, is_remote, remote_type, job_type, experience_level, \
     salary_min, salary_max, salary_currency, salary_type, show_salary, status, is_active, \
     is_featured, is_urgent, application_url, application_email, accept_applications, \
     skills_required, expires_at, company_id, category_id, posted_by, views_count, \
     applications_count, created_at, updated_at";

const VISIBLE: &str = "is_active AND status = 'active'";

/// Public ordering names and the SQL they map to
pub const JOB_ORDERING_FIELDS: &[(&str, &str)] = &[
    ("created_at", "created_at"),
    ("title", "title"),
    ("salary_min", "salary_min"),
    ("views_count", "views_count"),
    ("applications_count", "applications_count"),
    ("is_featured", "is_featured"),
    ("is_urgent", "is_urgent"),
];

pub const DEFAULT_JOB_ORDERING: &[&str] = &["-is_featured", "-is_urgent", "-created_at"];

/// Filters accepted by the public job list
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Case-insensitive substring match
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub is_remote: Option<bool>,
    pub remote_type: Option<RemoteType>,
    pub is_featured: Option<bool>,
    pub is_urgent: Option<bool>,
    /// Lower bound on `salary_min`
    pub salary_min: Option<Decimal>,
    /// Upper bound on `salary_max`
    pub salary_max: Option<Decimal>,
    pub company: Option<Uuid>,
    pub category: Option<Uuid>,
    /// Case-insensitive substring of `skills_required`
    pub skills: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    /// Matched against title, description, company name and skills
    pub search: Option<String>,
}

impl JobFilter {
    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE ").push(VISIBLE);

        if let Some(location) = &self.location {
            qb.push(" AND ");
            push_ilike(qb, "location", &contains_pattern(location));
        }
        if let Some(job_type) = self.job_type {
            qb.push(" AND job_type = ").push_bind(job_type);
        }
        if let Some(level) = self.experience_level {
            qb.push(" AND experience_level = ").push_bind(level);
        }
        if let Some(is_remote) = self.is_remote {
            qb.push(" AND is_remote = ").push_bind(is_remote);
        }
        if let Some(remote_type) = self.remote_type {
            qb.push(" AND remote_type = ").push_bind(remote_type);
        }
        if let Some(is_featured) = self.is_featured {
            qb.push(" AND is_featured = ").push_bind(is_featured);
        }
        if let Some(is_urgent) = self.is_urgent {
            qb.push(" AND is_urgent = ").push_bind(is_urgent);
        }
        if let Some(salary_min) = self.salary_min {
            qb.push(" AND salary_min >= ").push_bind(salary_min);
        }
        if let Some(salary_max) = self.salary_max {
            qb.push(" AND salary_max <= ").push_bind(salary_max);
        }
        if let Some(company) = self.company {
            qb.push(" AND company_id = ").push_bind(company);
        }
        if let Some(category) = self.category {
            qb.push(" AND category_id = ").push_bind(category);
        }
        if let Some(skills) = &self.skills {
            qb.push(" AND ");
            push_ilike(qb, "skills_required", &contains_pattern(skills));
        }
        if let Some(after) = self.created_after {
            qb.push(" AND created_at >= ").push_bind(after);
        }
        if let Some(before) = self.created_before {
            qb.push(" AND created_at <= ").push_bind(before);
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(search);
            qb.push(" AND (");
            push_ilike(qb, "title", &pattern);
            qb.push(" OR ");
            push_ilike(qb, "description", &pattern);
            qb.push(" OR ");
            push_ilike(qb, "skills_required", &pattern);
            qb.push(
                " OR EXISTS (SELECT 1 FROM companies c \
                 WHERE c.id = jobs.company_id AND ",
            );
            push_ilike(qb, "c.name", &pattern);
            qb.push("))");
        }
    }
}

/// Headline numbers for the board landing page
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BoardStats {
    pub total_jobs: i64,
    pub total_companies: i64,
    pub total_categories: i64,
    pub featured_jobs: i64,
    pub remote_jobs: i64,
}

fn map_job_write_error(err: sqlx::Error) -> Error {
    if is_unique_violation(&err) {
        return Error::Conflict("A job with this slug already exists".to_string());
    }
    Error::Database(err)
}

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered, ordered page of publicly visible jobs plus the total match count
    pub async fn list_visible(
        &self,
        filter: &JobFilter,
        ordering: &Ordering,
        page: &PageParams,
    ) -> Result<(Vec<Job>, i64)> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        filter.push_where(&mut count_query);
        let count = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {JOB_COLUMNS} FROM jobs"));
        filter.push_where(&mut query);
        query
            .push(" ORDER BY ")
            .push(ordering.to_sql())
            .push(", id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let jobs = query
            .build_query_as::<Job>()
            .fetch_all(&self.pool)
            .await?;

        Ok((jobs, count))
    }

    /// Visible featured jobs, newest first
    pub async fn featured(&self, limit: i64) -> Result<Vec<Job>> {
        let query = format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE {VISIBLE} AND is_featured \
             ORDER BY created_at DESC LIMIT $1"
        );
        let jobs = sqlx::query_as::<_, Job>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    /// Visible jobs, newest first
    pub async fn recent(&self, limit: i64) -> Result<Vec<Job>> {
        let query = format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE {VISIBLE} \
             ORDER BY created_at DESC LIMIT $1"
        );
        let jobs = sqlx::query_as::<_, Job>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    /// Find a job by slug regardless of visibility
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Job>> {
        let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE slug = $1");
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    /// Increment the view counter in one statement and return the new value
    pub async fn record_view(&self, id: Uuid) -> Result<Option<i32>> {
        let views = sqlx::query_scalar::<_, i32>(
            "UPDATE jobs SET views_count = views_count + 1 WHERE id = $1 RETURNING views_count",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(views)
    }

    /// Slugs equal to `base` or of the form `base-N`
    pub async fn taken_slugs(&self, base: &str) -> Result<Vec<String>> {
        let slugs = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM jobs WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(base)
        .fetch_all(&self.pool)
        .await?;
        Ok(slugs)
    }

    pub async fn create(&self, job: &Job) -> Result<Job> {
        let query = format!(
            "INSERT INTO jobs ({JOB_COLUMNS}) VALUES (\
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
                $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32, $33) \
             RETURNING {JOB_COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(job.id)
            .bind(&job.title)
            .bind(&job.slug)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.responsibilities)
            .bind(&job.benefits)
            .bind(&job.location)
            .bind(job.is_remote)
            .bind(job.remote_type)
            .bind(job.job_type)
            .bind(job.experience_level)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .bind(&job.salary_currency)
            .bind(job.salary_type)
            .bind(job.show_salary)
            .bind(job.status)
            .bind(job.is_active)
            .bind(job.is_featured)
            .bind(job.is_urgent)
            .bind(&job.application_url)
            .bind(&job.application_email)
            .bind(job.accept_applications)
            .bind(&job.skills_required)
            .bind(job.expires_at)
            .bind(job.company_id)
            .bind(job.category_id)
            .bind(job.posted_by)
            .bind(job.views_count)
            .bind(job.applications_count)
            .bind(job.created_at)
            .bind(job.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_job_write_error)
    }

    /// Persist the editable columns of an already-validated job.
    /// Counters are owned by their own atomic updates and never written here.
    pub async fn update(&self, job: &Job) -> Result<Job> {
        let query = format!(
            "UPDATE jobs SET \
                title = $2, slug = $3, description = $4, requirements = $5, \
                responsibilities = $6, benefits = $7, location = $8, is_remote = $9, \
                remote_type = $10, job_type = $11, experience_level = $12, salary_min = $13, \
                salary_max = $14, salary_currency = $15, salary_type = $16, show_salary = $17, \
                status = $18, is_active = $19, is_featured = $20, is_urgent = $21, \
                application_url = $22, application_email = $23, accept_applications = $24, \
                skills_required = $25, expires_at = $26, company_id = $27, category_id = $28, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {JOB_COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(job.id)
            .bind(&job.title)
            .bind(&job.slug)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.responsibilities)
            .bind(&job.benefits)
            .bind(&job.location)
            .bind(job.is_remote)
            .bind(job.remote_type)
            .bind(job.job_type)
            .bind(job.experience_level)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .bind(&job.salary_currency)
            .bind(job.salary_type)
            .bind(job.show_salary)
            .bind(job.status)
            .bind(job.is_active)
            .bind(job.is_featured)
            .bind(job.is_urgent)
            .bind(&job.application_url)
            .bind(&job.application_email)
            .bind(job.accept_applications)
            .bind(&job.skills_required)
            .bind(job.expires_at)
            .bind(job.company_id)
            .bind(job.category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_job_write_error)
    }

    /// Delete a job; its applications cascade
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn stats(&self) -> Result<BoardStats> {
        let query = format!(
            "SELECT \
                (SELECT COUNT(*) FROM jobs WHERE {VISIBLE}) AS total_jobs, \
                (SELECT COUNT(*) FROM companies WHERE is_verified) AS total_companies, \
                (SELECT COUNT(*) FROM categories WHERE is_active) AS total_categories, \
                (SELECT COUNT(*) FROM jobs WHERE {VISIBLE} AND is_featured) AS featured_jobs, \
                (SELECT COUNT(*) FROM jobs WHERE {VISIBLE} AND is_remote) AS remote_jobs"
        );
        let stats = sqlx::query_as::<_, BoardStats>(&query)
            .fetch_one(&self.pool)
            .await?;
        Ok(stats)
    }
}
