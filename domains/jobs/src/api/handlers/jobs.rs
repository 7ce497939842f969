//! Job posting API handlers
//!
//! Implements:
//! - GET    /api/jobs           Public list of visible jobs with filters, search, ordering
//! - POST   /api/jobs           Create (admin, employer)
//! - GET    /api/jobs/featured  Up to 10 visible featured jobs
//! - GET    /api/jobs/recent    Up to 10 most recent visible jobs
//! - GET    /api/jobs/stats     Board statistics
//! - GET    /api/jobs/{slug}    Detail; counts a view
//! - PATCH  /api/jobs/{slug}    Update (admin, poster)
//! - DELETE /api/jobs/{slug}    Delete (admin, poster)

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use jobboard_auth::{authorize, Action, AuthContext, AuthUser, MaybeAuth, Ownership};
use jobboard_common::{
    slugify, with_suffix, Error, Ordering, Page, PageParams, Result, ValidatedJson,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::categories::CategoryResponse;
use crate::api::middleware::JobsState;
use crate::domain::entities::{
    ExperienceLevel, Job, JobStatus, JobType, RemoteType, SalaryType,
};
use crate::repository::{
    BoardStats, CompanySummary, JobFilter, DEFAULT_JOB_ORDERING, JOB_ORDERING_FIELDS,
};

/// Size of the featured and recent listings
pub const HIGHLIGHT_LIMIT: i64 = 10;

/// Path segments that would be shadowed by static routes
const RESERVED_SLUGS: &[&str] = &["categories", "featured", "recent", "stats"];

/// Query string of the job list
#[derive(Debug, Default, Deserialize)]
pub struct ListJobsQuery {
    pub page: Option<i64>,
    pub ordering: Option<String>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub is_remote: Option<bool>,
    pub remote_type: Option<RemoteType>,
    pub is_featured: Option<bool>,
    pub is_urgent: Option<bool>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub company: Option<Uuid>,
    pub category: Option<Uuid>,
    pub skills: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl From<ListJobsQuery> for JobFilter {
    fn from(q: ListJobsQuery) -> Self {
        Self {
            location: q.location,
            job_type: q.job_type,
            experience_level: q.experience_level,
            is_remote: q.is_remote,
            remote_type: q.remote_type,
            is_featured: q.is_featured,
            is_urgent: q.is_urgent,
            salary_min: q.salary_min,
            salary_max: q.salary_max,
            company: q.company,
            category: q.category,
            skills: q.skills,
            created_after: q.created_after,
            created_before: q.created_before,
            search: q.search,
        }
    }
}

/// Company as embedded in job responses
#[derive(Debug, Serialize)]
pub struct CompanySummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub logo_url: Option<String>,
    pub location: Option<String>,
    pub size: Option<String>,
    pub industry: Option<String>,
    pub is_verified: bool,
    pub job_count: i64,
    pub created_at: DateTime<Utc>,
}

impl CompanySummaryResponse {
    fn new(company: CompanySummary, media_base_url: &str) -> Self {
        let logo_url = match company.logo_path {
            Some(path) => Some(format!("{}/{}", media_base_url.trim_end_matches('/'), path)),
            None => company.logo_url,
        };
        Self {
            id: company.id,
            name: company.name,
            slug: company.slug,
            description: company.description,
            logo_url,
            location: company.location,
            size: company.size,
            industry: company.industry,
            is_verified: company.is_verified,
            job_count: company.job_count,
            created_at: company.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub company: Option<CompanySummaryResponse>,
    pub category: Option<CategoryResponse>,
    pub location: String,
    pub is_remote: bool,
    pub remote_type: RemoteType,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub salary_currency: String,
    pub salary_type: SalaryType,
    pub show_salary: bool,
    pub is_featured: bool,
    pub is_urgent: bool,
    pub skills_list: Vec<String>,
    pub views_count: i32,
    pub applications_count: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
}

impl JobListResponse {
    fn new(
        job: &Job,
        company: Option<CompanySummaryResponse>,
        category: Option<CategoryResponse>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            slug: job.slug.clone(),
            company,
            category,
            location: job.location.clone(),
            is_remote: job.is_remote,
            remote_type: job.remote_type,
            job_type: job.job_type,
            experience_level: job.experience_level,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            salary_currency: job.salary_currency.clone(),
            salary_type: job.salary_type,
            show_salary: job.show_salary,
            is_featured: job.is_featured,
            is_urgent: job.is_urgent,
            skills_list: job.skills_list(),
            views_count: job.views_count,
            applications_count: job.applications_count,
            created_at: job.created_at,
            expires_at: job.expires_at,
            is_expired: job.is_expired_at(now),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub summary: JobListResponse,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub benefits: String,
    pub status: JobStatus,
    pub is_active: bool,
    pub application_url: Option<String>,
    pub application_email: Option<String>,
    pub accept_applications: bool,
    pub skills_required: String,
    pub posted_by: Option<Uuid>,
    pub posted_by_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct JobStatsResponse {
    pub total_jobs: i64,
    pub total_companies: i64,
    pub total_categories: i64,
    pub featured_jobs: i64,
    pub remote_jobs: i64,
}

impl From<BoardStats> for JobStatsResponse {
    fn from(stats: BoardStats) -> Self {
        Self {
            total_jobs: stats.total_jobs,
            total_companies: stats.total_companies,
            total_categories: stats.total_categories,
            featured_jobs: stats.featured_jobs,
            remote_jobs: stats.remote_jobs,
        }
    }
}

/// Optional posting fields shared by create and update
#[derive(Debug, Default, Deserialize, Validate)]
pub struct JobFields {
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    pub is_remote: Option<bool>,
    pub remote_type: Option<RemoteType>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    #[validate(length(equal = 3))]
    pub salary_currency: Option<String>,
    pub salary_type: Option<SalaryType>,
    pub show_salary: Option<bool>,
    pub status: Option<JobStatus>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_urgent: Option<bool>,
    #[validate(url)]
    pub application_url: Option<String>,
    #[validate(email)]
    pub application_email: Option<String>,
    pub accept_applications: Option<bool>,
    pub skills_required: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub category: Option<Uuid>,
}

impl JobFields {
    fn apply_to(self, job: &mut Job) {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut job.requirements, self.requirements);
        set(&mut job.responsibilities, self.responsibilities);
        set(&mut job.benefits, self.benefits);
        set(&mut job.location, self.location);
        set(&mut job.is_remote, self.is_remote);
        set(&mut job.remote_type, self.remote_type);
        set(&mut job.job_type, self.job_type);
        set(&mut job.experience_level, self.experience_level);
        set(&mut job.salary_currency, self.salary_currency);
        set(&mut job.salary_type, self.salary_type);
        set(&mut job.show_salary, self.show_salary);
        set(&mut job.status, self.status);
        set(&mut job.is_active, self.is_active);
        set(&mut job.is_featured, self.is_featured);
        set(&mut job.is_urgent, self.is_urgent);
        set(&mut job.accept_applications, self.accept_applications);
        set(&mut job.skills_required, self.skills_required);
        if self.salary_min.is_some() {
            job.salary_min = self.salary_min;
        }
        if self.salary_max.is_some() {
            job.salary_max = self.salary_max;
        }
        if self.application_url.is_some() {
            job.application_url = self.application_url;
        }
        if self.application_email.is_some() {
            job.application_email = self.application_email;
        }
        if self.expires_at.is_some() {
            job.expires_at = self.expires_at;
        }
        if self.category.is_some() {
            job.category_id = self.category;
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// Owning company id
    pub company: Uuid,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: JobFields,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJobRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub company: Option<Uuid>,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: JobFields,
}

/// Derive a slug for `title` that no other job uses and no static route shadows.
/// `current` is the job's own slug when retitling.
async fn unique_slug(state: &JobsState, title: &str, current: Option<&str>) -> Result<String> {
    let base = slugify(title)?;
    let mut taken = state.repos.jobs.taken_slugs(&base).await?;
    if let Some(current) = current {
        taken.retain(|s| s != current);
    }
    taken.extend(RESERVED_SLUGS.iter().map(|s| s.to_string()));
    Ok(with_suffix(&base, &taken))
}

async fn ensure_company_exists(state: &JobsState, company_id: Uuid) -> Result<()> {
    match state.repos.read_models.company(company_id).await? {
        Some(_) => Ok(()),
        None => Err(Error::Validation(format!(
            "Company '{}' does not exist",
            company_id
        ))),
    }
}

async fn ensure_category_exists(state: &JobsState, category_id: Option<Uuid>) -> Result<()> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    match state.repos.categories.get_by_id(category_id).await? {
        Some(_) => Ok(()),
        None => Err(Error::Validation(format!(
            "Category '{}' does not exist",
            category_id
        ))),
    }
}

/// Resolve embedded companies and categories for a batch of jobs
async fn list_responses(state: &JobsState, jobs: &[Job]) -> Result<Vec<JobListResponse>> {
    let mut company_ids: Vec<Uuid> = jobs.iter().map(|j| j.company_id).collect();
    company_ids.sort();
    company_ids.dedup();
    let mut category_ids: Vec<Uuid> = jobs.iter().filter_map(|j| j.category_id).collect();
    category_ids.sort();
    category_ids.dedup();

    let companies: HashMap<Uuid, CompanySummary> = state
        .repos
        .read_models
        .companies(&company_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let categories: HashMap<Uuid, _> = state
        .repos
        .categories
        .find_many(&category_ids)
        .await?
        .into_iter()
        .map(|c| (c.category.id, c))
        .collect();

    let now = Utc::now();
    Ok(jobs
        .iter()
        .map(|job| {
            // a company may back several jobs in one page
            let company = companies
                .get(&job.company_id)
                .cloned()
                .map(|c| CompanySummaryResponse::new(c, &state.media_base_url));
            let category = job
                .category_id
                .and_then(|id| categories.get(&id).cloned())
                .map(CategoryResponse::from);
            JobListResponse::new(job, company, category, now)
        })
        .collect())
}

async fn detail_response(state: &JobsState, job: Job) -> Result<JobDetailResponse> {
    let summary = list_responses(state, std::slice::from_ref(&job))
        .await?
        .pop()
        .ok_or_else(|| Error::Internal("Failed to render job".to_string()))?;

    let posted_by_name = match job.posted_by {
        Some(user_id) => state.repos.read_models.poster_name(user_id).await?,
        None => None,
    };

    Ok(JobDetailResponse {
        summary,
        description: job.description,
        requirements: job.requirements,
        responsibilities: job.responsibilities,
        benefits: job.benefits,
        status: job.status,
        is_active: job.is_active,
        application_url: job.application_url,
        application_email: job.application_email,
        accept_applications: job.accept_applications,
        skills_required: job.skills_required,
        posted_by: job.posted_by,
        posted_by_name,
        updated_at: job.updated_at,
    })
}

async fn load_job(state: &JobsState, slug: &str) -> Result<Job> {
    state
        .repos
        .jobs
        .get_by_slug(slug)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Job '{}' not found", slug)))
}

/// Hidden postings are visible to admins and to the user who posted them
fn can_see(job: &Job, viewer: Option<&AuthContext>) -> bool {
    job.is_publicly_visible()
        || viewer.is_some_and(|auth| {
            auth.is_admin() || auth.ownership_of(job.posted_by) == Ownership::Owner
        })
}

/// GET /api/jobs
pub async fn list_jobs(
    State(state): State<JobsState>,
    Query(query): Query<ListJobsQuery>,
) -> Result<Json<Page<JobListResponse>>> {
    let ordering = Ordering::parse(
        query.ordering.as_deref(),
        JOB_ORDERING_FIELDS,
        DEFAULT_JOB_ORDERING,
    )?;
    let page = PageParams { page: query.page };
    let filter = JobFilter::from(query);

    let (jobs, count) = state
        .repos
        .jobs
        .list_visible(&filter, &ordering, &page)
        .await?;
    let results = list_responses(&state, &jobs).await?;

    Ok(Json(Page::new(results, count, &page)))
}

/// GET /api/jobs/featured
pub async fn featured_jobs(State(state): State<JobsState>) -> Result<Json<Vec<JobListResponse>>> {
    let jobs = state.repos.jobs.featured(HIGHLIGHT_LIMIT).await?;
    Ok(Json(list_responses(&state, &jobs).await?))
}

/// GET /api/jobs/recent
pub async fn recent_jobs(State(state): State<JobsState>) -> Result<Json<Vec<JobListResponse>>> {
    let jobs = state.repos.jobs.recent(HIGHLIGHT_LIMIT).await?;
    Ok(Json(list_responses(&state, &jobs).await?))
}

/// GET /api/jobs/stats
pub async fn job_stats(State(state): State<JobsState>) -> Result<Json<JobStatsResponse>> {
    let stats = state.repos.jobs.stats().await?;
    Ok(Json(JobStatsResponse::from(stats)))
}

/// GET /api/jobs/{slug}
pub async fn get_job(
    MaybeAuth(viewer): MaybeAuth,
    State(state): State<JobsState>,
    Path(slug): Path<String>,
) -> Result<Json<JobDetailResponse>> {
    let mut job = load_job(&state, &slug).await?;
    if !can_see(&job, viewer.as_ref()) {
        return Err(Error::NotFound(format!("Job '{}' not found", slug)));
    }

    if let Some(views) = state.repos.jobs.record_view(job.id).await? {
        job.views_count = views;
    }

    Ok(Json(detail_response(&state, job).await?))
}

/// POST /api/jobs
pub async fn create_job(
    AuthUser(auth): AuthUser,
    State(state): State<JobsState>,
    ValidatedJson(req): ValidatedJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobDetailResponse>)> {
    authorize(auth.role(), Action::CreateJob, Ownership::NotApplicable).require()?;

    ensure_company_exists(&state, req.company).await?;
    ensure_category_exists(&state, req.fields.category).await?;

    let slug = unique_slug(&state, &req.title, None).await?;
    let mut job = Job::new(
        req.title,
        slug,
        req.description,
        req.company,
        Some(auth.user_id()),
    )?;
    req.fields.apply_to(&mut job);
    job.validate()?;

    let created = state.repos.jobs.create(&job).await?;
    tracing::info!(
        job_id = %created.id,
        slug = %created.slug,
        company_id = %created.company_id,
        user_id = %auth.user_id(),
        "Job created"
    );

    Ok((StatusCode::CREATED, Json(detail_response(&state, created).await?)))
}

/// PATCH /api/jobs/{slug}
pub async fn update_job(
    AuthUser(auth): AuthUser,
    State(state): State<JobsState>,
    Path(slug): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateJobRequest>,
) -> Result<Json<JobDetailResponse>> {
    let mut job = load_job(&state, &slug).await?;
    authorize(auth.role(), Action::UpdateJob, auth.ownership_of(job.posted_by)).require()?;

    if let Some(company) = req.company {
        ensure_company_exists(&state, company).await?;
        job.company_id = company;
    }
    ensure_category_exists(&state, req.fields.category).await?;

    if let Some(title) = req.title {
        if title.trim() != job.title {
            job.slug = unique_slug(&state, &title, Some(&job.slug)).await?;
            job.title = title.trim().to_string();
        }
    }
    if let Some(description) = req.description {
        job.description = description;
    }
    req.fields.apply_to(&mut job);
    job.validate()?;

    let updated = state.repos.jobs.update(&job).await?;
    tracing::info!(job_id = %updated.id, user_id = %auth.user_id(), "Job updated");

    Ok(Json(detail_response(&state, updated).await?))
}

/// DELETE /api/jobs/{slug}
///
/// Applications to the job are removed with it.
pub async fn delete_job(
    AuthUser(auth): AuthUser,
    State(state): State<JobsState>,
    Path(slug): Path<String>,
) -> Result<StatusCode> {
    let job = load_job(&state, &slug).await?;
    authorize(auth.role(), Action::DeleteJob, auth.ownership_of(job.posted_by)).require()?;

    state.repos.jobs.delete(job.id).await?;
    tracing::info!(job_id = %job.id, user_id = %auth.user_id(), "Job deleted");

    Ok(StatusCode::NO_CONTENT)
}
