//! Company repository

use jobboard_common::{
    contains_pattern, is_unique_violation, push_ilike, Error, Ordering, PageParams, Result,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entities::{Company, CompanySize, CompanyWithJobCount};

pub(crate) const COMPANY_COLUMNS: &str = "id, name, slug, description, website, logo_url, \
     logo_path, location, size, founded_year, industry, is_verified, email, phone, \
     linkedin_url, twitter_url, facebook_url, created_by, created_at, updated_at";

/// Active postings only; paused or closed jobs still count while `is_active`
const JOB_COUNT_EXPR: &str =
    "(SELECT COUNT(*) FROM jobs j WHERE j.company_id = companies.id AND j.is_active)";

/// Public ordering names and the SQL they map to
pub const COMPANY_ORDERING_FIELDS: &[(&str, &'static str)] = &[
    ("name", "name"),
    ("created_at", "created_at"),
    ("job_count", "job_count"),
];

/// Filters accepted by the company list
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    /// Case-insensitive substring match
    pub location: Option<String>,
    pub industry: Option<String>,
    pub size: Option<CompanySize>,
    pub is_verified: Option<bool>,
    /// Matched against name, description and industry
    pub search: Option<String>,
}

impl CompanyFilter {
    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE TRUE");
        if let Some(location) = &self.location {
            qb.push(" AND ");
            push_ilike(qb, "location", &contains_pattern(location));
        }
        if let Some(industry) = &self.industry {
            qb.push(" AND industry = ").push_bind(industry.clone());
        }
        if let Some(size) = self.size {
            qb.push(" AND size = ").push_bind(size);
        }
        if let Some(is_verified) = self.is_verified {
            qb.push(" AND is_verified = ").push_bind(is_verified);
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(search);
            qb.push(" AND (");
            push_ilike(qb, "name", &pattern);
            qb.push(" OR ");
            push_ilike(qb, "description", &pattern);
            qb.push(" OR ");
            push_ilike(qb, "industry", &pattern);
            qb.push(")");
        }
    }
}

/// Map a unique violation on the slug column to a conflict
fn map_company_write_error(err: sqlx::Error) -> Error {
    if is_unique_violation(&err) {
        return Error::Conflict("A company with this slug already exists".to_string());
    }
    Error::Database(err)
}

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered, ordered page of companies plus the total match count
    pub async fn list(
        &self,
        filter: &CompanyFilter,
        ordering: &Ordering,
        page: &PageParams,
    ) -> Result<(Vec<CompanyWithJobCount>, i64)> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM companies");
        filter.push_where(&mut count_query);
        let count = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COMPANY_COLUMNS}, {JOB_COUNT_EXPR} AS job_count FROM companies"
        ));
        filter.push_where(&mut query);
        query
            .push(" ORDER BY ")
            .push(ordering.to_sql())
            .push(", id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = query
            .build_query_as::<CompanyWithJobCount>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, count))
    }

    /// Find a company by slug, with its active job count
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<CompanyWithJobCount>> {
        let query = format!(
            "SELECT {COMPANY_COLUMNS}, {JOB_COUNT_EXPR} AS job_count \
             FROM companies WHERE slug = $1"
        );
        let row = sqlx::query_as::<_, CompanyWithJobCount>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Slugs equal to `base` or of the form `base-N`
    pub async fn taken_slugs(&self, base: &str) -> Result<Vec<String>> {
        let slugs = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM companies WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(base)
        .fetch_all(&self.pool)
        .await?;
        Ok(slugs)
    }

    pub async fn create(&self, company: &Company) -> Result<Company> {
        let query = format!(
            "INSERT INTO companies ({COMPANY_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20) \
             RETURNING {COMPANY_COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(company.id)
            .bind(&company.name)
            .bind(&company.slug)
            .bind(&company.description)
            .bind(&company.website)
            .bind(&company.logo_url)
            .bind(&company.logo_path)
            .bind(&company.location)
            .bind(company.size)
            .bind(company.founded_year)
            .bind(&company.industry)
            .bind(company.is_verified)
            .bind(&company.email)
            .bind(&company.phone)
            .bind(&company.linkedin_url)
            .bind(&company.twitter_url)
            .bind(&company.facebook_url)
            .bind(company.created_by)
            .bind(company.created_at)
            .bind(company.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_company_write_error)
    }

    /// Persist every editable column of an already-validated company
    pub async fn update(&self, company: &Company) -> Result<Company> {
        let query = format!(
            "UPDATE companies SET \
                name = $2, slug = $3, description = $4, website = $5, logo_url = $6, \
                location = $7, size = $8, founded_year = $9, industry = $10, \
                is_verified = $11, email = $12, phone = $13, linkedin_url = $14, \
                twitter_url = $15, facebook_url = $16, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COMPANY_COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(company.id)
            .bind(&company.name)
            .bind(&company.slug)
            .bind(&company.description)
            .bind(&company.website)
            .bind(&company.logo_url)
            .bind(&company.location)
            .bind(company.size)
            .bind(company.founded_year)
            .bind(&company.industry)
            .bind(company.is_verified)
            .bind(&company.email)
            .bind(&company.phone)
            .bind(&company.linkedin_url)
            .bind(&company.twitter_url)
            .bind(&company.facebook_url)
            .fetch_one(&self.pool)
            .await
            .map_err(map_company_write_error)
    }

    /// Record the storage key of an uploaded logo
    pub async fn set_logo_path(&self, id: Uuid, logo_path: &str) -> Result<Company> {
        let query = format!(
            "UPDATE companies SET logo_path = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COMPANY_COLUMNS}"
        );
        let company = sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(logo_path)
            .fetch_one(&self.pool)
            .await?;
        Ok(company)
    }

    /// Delete a company; its jobs and their applications cascade
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
