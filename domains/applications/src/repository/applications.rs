//! Application repository

use jobboard_auth::ApplicationScope;
use jobboard_common::{contains_pattern, push_ilike, Ordering, PageParams, Result};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entities::Application;
use crate::domain::state::ApplicationStatus;

pub(crate) const APPLICATION_COLUMNS: &str = "id, job_id, applicant_id, cover_letter, \
     resume_url, portfolio_url, linkedin_url, phone, email, status, admin_notes, \
     rejection_reason, years_of_experience, expected_salary, availability_date, applied_at, \
     updated_at, reviewed_at";

/// `APPLICATION_COLUMNS` qualified for queries joining `users u`
const A_COLUMNS: &str = "a.id, a.job_id, a.applicant_id, a.cover_letter, a.resume_url, \
     a.portfolio_url, a.linkedin_url, a.phone, a.email, a.status, a.admin_notes, \
     a.rejection_reason, a.years_of_experience, a.expected_salary, a.availability_date, \
     a.applied_at, a.updated_at, a.reviewed_at";

/// Ordering for the reviewer list
pub const REVIEW_ORDERING_FIELDS: &[(&str, &str)] = &[
    ("applied_at", "a.applied_at"),
    ("updated_at", "a.updated_at"),
    ("status", "a.status"),
];

/// Ordering for the applicant's own list
pub const MY_ORDERING_FIELDS: &[(&str, &str)] =
    &[("applied_at", "a.applied_at"), ("updated_at", "a.updated_at")];

pub const DEFAULT_APPLICATION_ORDERING: &[&str] = &["-applied_at"];

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub job: Option<Uuid>,
    /// Matched against applicant first name, last name and email
    pub search: Option<String>,
}

/// Application joined with the applicant's public identity
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplicationRow {
    #[sqlx(flatten)]
    pub application: Application,
    pub applicant_first_name: String,
    pub applicant_last_name: String,
    pub applicant_email: String,
}

impl ApplicationRow {
    pub fn applicant_name(&self) -> String {
        format!("{} {}", self.applicant_first_name, self.applicant_last_name)
            .trim()
            .to_string()
    }
}

/// Restrict a query over `applications a` to what the caller may see
fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: ApplicationScope) {
    match scope {
        ApplicationScope::All => {
            qb.push(" WHERE TRUE");
        }
        ApplicationScope::PostedBy(user_id) => {
            qb.push(" WHERE EXISTS (SELECT 1 FROM jobs j WHERE j.id = a.job_id AND j.posted_by = ")
                .push_bind(user_id)
                .push(")");
        }
        ApplicationScope::Applicant(user_id) => {
            qb.push(" WHERE a.applicant_id = ").push_bind(user_id);
        }
        ApplicationScope::Nothing => {
            qb.push(" WHERE FALSE");
        }
    }
}

impl ApplicationFilter {
    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>, scope: ApplicationScope) {
        push_scope(qb, scope);
        if let Some(status) = self.status {
            qb.push(" AND a.status = ").push_bind(status);
        }
        if let Some(job) = self.job {
            qb.push(" AND a.job_id = ").push_bind(job);
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(search);
            qb.push(" AND (");
            push_ilike(qb, "u.first_name", &pattern);
            qb.push(" OR ");
            push_ilike(qb, "u.last_name", &pattern);
            qb.push(" OR ");
            push_ilike(qb, "u.email", &pattern);
            qb.push(")");
        }
    }
}

/// Per-status totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub reviewed: i64,
    pub shortlisted: i64,
    pub interviewed: i64,
    pub accepted: i64,
    pub rejected: i64,
    pub withdrawn: i64,
}

impl StatusCounts {
    pub fn from_groups(groups: impl IntoIterator<Item = (ApplicationStatus, i64)>) -> Self {
        let mut counts = Self::default();
        for (status, n) in groups {
            counts.total += n;
            let slot = match status {
                ApplicationStatus::Pending => &mut counts.pending,
                ApplicationStatus::Reviewed => &mut counts.reviewed,
                ApplicationStatus::Shortlisted => &mut counts.shortlisted,
                ApplicationStatus::Interviewed => &mut counts.interviewed,
                ApplicationStatus::Accepted => &mut counts.accepted,
                ApplicationStatus::Rejected => &mut counts.rejected,
                ApplicationStatus::Withdrawn => &mut counts.withdrawn,
            };
            *slot += n;
        }
        counts
    }
}

#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Scoped, filtered, ordered page of applications plus the total match count
    pub async fn list(
        &self,
        scope: ApplicationScope,
        filter: &ApplicationFilter,
        ordering: &Ordering,
        page: &PageParams,
    ) -> Result<(Vec<ApplicationRow>, i64)> {
        let mut count_query = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM applications a JOIN users u ON u.id = a.applicant_id",
        );
        filter.push_where(&mut count_query, scope);
        let count = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {A_COLUMNS}, u.first_name AS applicant_first_name, \
             u.last_name AS applicant_last_name, u.email AS applicant_email \
             FROM applications a JOIN users u ON u.id = a.applicant_id"
        ));
        filter.push_where(&mut query, scope);
        query
            .push(" ORDER BY ")
            .push(ordering.to_sql())
            .push(", a.id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = query
            .build_query_as::<ApplicationRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, count))
    }

    /// Find an application by id within the caller's scope
    pub async fn get_scoped(
        &self,
        id: Uuid,
        scope: ApplicationScope,
    ) -> Result<Option<Application>> {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {A_COLUMNS} FROM applications a"));
        push_scope(&mut query, scope);
        query.push(" AND a.id = ").push_bind(id);

        let row = query
            .build_query_as::<Application>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn exists_for(&self, job_id: Uuid, applicant_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM applications WHERE job_id = $1 AND applicant_id = $2)",
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Counts per status within the caller's scope, in one grouped query
    pub async fn stats(&self, scope: ApplicationScope) -> Result<StatusCounts> {
        let mut query =
            QueryBuilder::<Postgres>::new("SELECT a.status, COUNT(*) FROM applications a");
        push_scope(&mut query, scope);
        query.push(" GROUP BY a.status");

        let groups = query
            .build_query_as::<(ApplicationStatus, i64)>()
            .fetch_all(&self.pool)
            .await?;
        Ok(StatusCounts::from_groups(groups))
    }
}
