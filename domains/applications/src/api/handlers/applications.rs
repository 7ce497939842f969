//! Job application API handlers
//!
//! Implements:
//! - POST   /api/applications/apply            Apply for a job (job seekers, admins)
//! - GET    /api/applications                  Reviewer list (admin: all, employer: own jobs)
//! - GET    /api/applications/my-applications  Caller's own applications
//! - GET    /api/applications/stats            Per-status counts within the caller's scope
//! - GET    /api/applications/{id}             Detail within the caller's scope
//! - PATCH  /api/applications/{id}/status      Reviewer status update
//! - POST   /api/applications/{id}/withdraw    Applicant withdrawal
//! - DELETE /api/applications/{id}             Delete (admin)

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use jobboard_auth::{authorize, Action, ApplicationScope, AuthUser, Ownership};
use jobboard_common::{
    is_unique_violation, Error, Ordering, Page, PageParams, Result, ValidatedJson,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::ApplicationsState;
use crate::domain::entities::{Application, JobSnapshot, Review, DUPLICATE_MESSAGE};
use crate::domain::state::ApplicationStatus;
use crate::repository::applications::{
    DEFAULT_APPLICATION_ORDERING, MY_ORDERING_FIELDS, REVIEW_ORDERING_FIELDS,
};
use crate::repository::{
    apply_counter_events_tx, delete_application_tx, find_application_for_update_tx,
    insert_application_tx, save_status_tx, ApplicantProfile, ApplicationFilter, ApplicationRow,
    StatusCounts,
};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Query string of the reviewer list
#[derive(Debug, Default, Deserialize)]
pub struct ListApplicationsQuery {
    pub page: Option<i64>,
    pub ordering: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub job: Option<Uuid>,
    pub search: Option<String>,
}

/// Query string of the applicant's own list
#[derive(Debug, Default, Deserialize)]
pub struct MyApplicationsQuery {
    pub page: Option<i64>,
    pub ordering: Option<String>,
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Job as embedded in application responses
#[derive(Debug, Clone, Serialize)]
pub struct JobSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub location: String,
    pub job_type: String,
    pub status: String,
    pub company: CompanyRef,
}

impl From<JobSnapshot> for JobSummaryResponse {
    fn from(job: JobSnapshot) -> Self {
        Self {
            id: job.id,
            title: job.title,
            slug: job.slug,
            location: job.location,
            job_type: job.job_type,
            status: job.status,
            company: CompanyRef {
                id: job.company_id,
                name: job.company_name,
                slug: job.company_slug,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicantResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
}

impl From<ApplicantProfile> for ApplicantResponse {
    fn from(profile: ApplicantProfile) -> Self {
        let full_name = profile.full_name();
        Self {
            id: profile.id,
            email: profile.email,
            username: profile.username,
            full_name,
            phone: profile.phone,
            location: profile.location,
            resume_url: profile.resume_url,
            linkedin_url: profile.linkedin_url,
            github_url: profile.github_url,
            website_url: profile.website_url,
        }
    }
}

/// Row of the reviewer list
#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub id: Uuid,
    pub job: Option<JobSummaryResponse>,
    pub applicant_name: String,
    pub applicant_email: String,
    pub status: ApplicationStatus,
    pub years_of_experience: Option<i32>,
    pub expected_salary: Option<Decimal>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationListResponse {
    fn new(row: ApplicationRow, job: Option<JobSummaryResponse>) -> Self {
        let applicant_name = row.applicant_name();
        let app = row.application;
        Self {
            id: app.id,
            job,
            applicant_name,
            applicant_email: row.applicant_email,
            status: app.status,
            years_of_experience: app.years_of_experience,
            expected_salary: app.expected_salary,
            applied_at: app.applied_at,
            updated_at: app.updated_at,
        }
    }
}

/// Row of the applicant's own list; reviewer notes are left out
#[derive(Debug, Serialize)]
pub struct MyApplicationResponse {
    pub id: Uuid,
    pub job: Option<JobSummaryResponse>,
    pub company_name: Option<String>,
    pub cover_letter: String,
    pub resume_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub status: ApplicationStatus,
    pub rejection_reason: String,
    pub years_of_experience: Option<i32>,
    pub expected_salary: Option<Decimal>,
    pub availability_date: Option<NaiveDate>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MyApplicationResponse {
    fn new(app: Application, job: Option<JobSummaryResponse>) -> Self {
        let company_name = job.as_ref().map(|j| j.company.name.clone());
        Self {
            id: app.id,
            job,
            company_name,
            cover_letter: app.cover_letter,
            resume_url: app.resume_url,
            portfolio_url: app.portfolio_url,
            linkedin_url: app.linkedin_url,
            status: app.status,
            rejection_reason: app.rejection_reason,
            years_of_experience: app.years_of_experience,
            expected_salary: app.expected_salary,
            availability_date: app.availability_date,
            applied_at: app.applied_at,
            updated_at: app.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationDetailResponse {
    pub id: Uuid,
    pub job: Option<JobSummaryResponse>,
    pub applicant: Option<ApplicantResponse>,
    pub cover_letter: String,
    pub resume_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: ApplicationStatus,
    pub admin_notes: String,
    pub rejection_reason: String,
    pub years_of_experience: Option<i32>,
    pub expected_salary: Option<Decimal>,
    pub availability_date: Option<NaiveDate>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl ApplicationDetailResponse {
    fn new(
        app: Application,
        job: Option<JobSummaryResponse>,
        applicant: Option<ApplicantResponse>,
    ) -> Self {
        Self {
            id: app.id,
            job,
            applicant,
            cover_letter: app.cover_letter,
            resume_url: app.resume_url,
            portfolio_url: app.portfolio_url,
            linkedin_url: app.linkedin_url,
            phone: app.phone,
            email: app.email,
            status: app.status,
            admin_notes: app.admin_notes,
            rejection_reason: app.rejection_reason,
            years_of_experience: app.years_of_experience,
            expected_salary: app.expected_salary,
            availability_date: app.availability_date,
            applied_at: app.applied_at,
            updated_at: app.updated_at,
            reviewed_at: app.reviewed_at,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ApplicationStatsResponse {
    pub total_applications: i64,
    pub pending: i64,
    pub reviewed: i64,
    pub shortlisted: i64,
    pub interviewed: i64,
    pub accepted: i64,
    pub rejected: i64,
    pub withdrawn: i64,
}

impl From<StatusCounts> for ApplicationStatsResponse {
    fn from(counts: StatusCounts) -> Self {
        Self {
            total_applications: counts.total,
            pending: counts.pending,
            reviewed: counts.reviewed,
            shortlisted: counts.shortlisted,
            interviewed: counts.interviewed,
            accepted: counts.accepted,
            rejected: counts.rejected,
            withdrawn: counts.withdrawn,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ApplyRequest {
    pub job: Uuid,
    #[validate(length(max = 10000))]
    #[serde(default)]
    pub cover_letter: String,
    #[validate(url)]
    pub resume_url: Option<String>,
    #[validate(url)]
    pub portfolio_url: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(range(min = 0))]
    pub years_of_experience: Option<i32>,
    pub expected_salary: Option<Decimal>,
    pub availability_date: Option<NaiveDate>,
}

impl ApplyRequest {
    fn into_application(self, applicant_id: Uuid) -> Application {
        let mut app = Application::new(self.job, applicant_id);
        app.cover_letter = self.cover_letter;
        app.resume_url = self.resume_url;
        app.portfolio_url = self.portfolio_url;
        app.linkedin_url = self.linkedin_url;
        app.phone = self.phone;
        app.email = self.email;
        app.years_of_experience = self.years_of_experience;
        app.expected_salary = self.expected_salary;
        app.availability_date = self.availability_date;
        app
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: Option<ApplicationStatus>,
    #[validate(length(max = 10000))]
    pub admin_notes: Option<String>,
    #[validate(length(max = 10000))]
    pub rejection_reason: Option<String>,
}

impl From<UpdateStatusRequest> for Review {
    fn from(req: UpdateStatusRequest) -> Self {
        Self {
            status: req.status,
            admin_notes: req.admin_notes,
            rejection_reason: req.rejection_reason,
        }
    }
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Application '{}' not found", id))
}

async fn lock_application(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<Application> {
    find_application_for_update_tx(tx, id)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn job_summaries(
    state: &ApplicationsState,
    job_ids: impl Iterator<Item = Uuid>,
) -> Result<HashMap<Uuid, JobSummaryResponse>> {
    let mut ids: Vec<Uuid> = job_ids.collect();
    ids.sort();
    ids.dedup();
    Ok(state
        .repos
        .read_models
        .jobs(&ids)
        .await?
        .into_iter()
        .map(|job| (job.id, JobSummaryResponse::from(job)))
        .collect())
}

async fn detail_response(
    state: &ApplicationsState,
    app: Application,
) -> Result<ApplicationDetailResponse> {
    let job = state
        .repos
        .read_models
        .job(app.job_id)
        .await?
        .map(JobSummaryResponse::from);
    let applicant = state
        .repos
        .read_models
        .applicant(app.applicant_id)
        .await?
        .map(ApplicantResponse::from);
    Ok(ApplicationDetailResponse::new(app, job, applicant))
}

/// POST /api/applications/apply
pub async fn apply(
    AuthUser(auth): AuthUser,
    State(state): State<ApplicationsState>,
    ValidatedJson(req): ValidatedJson<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationDetailResponse>)> {
    authorize(auth.role(), Action::Apply, Ownership::NotApplicable).require()?;

    let job = state
        .repos
        .read_models
        .job(req.job)
        .await?
        .ok_or_else(|| Error::Validation(format!("Job '{}' does not exist", req.job)))?;
    job.ensure_accepting_applications(Utc::now())?;

    if state
        .repos
        .applications
        .exists_for(job.id, auth.user_id())
        .await?
    {
        return Err(Error::Validation(DUPLICATE_MESSAGE.to_string()));
    }

    let application = req.into_application(auth.user_id());
    application.validate()?;

    let mut tx = state.repos.begin().await?;
    let (created, event) = match insert_application_tx(&mut tx, &application).await {
        Ok(inserted) => inserted,
        // a concurrent apply slipped past the pre-check
        Err(e) if is_unique_violation(&e) => {
            return Err(Error::Validation(DUPLICATE_MESSAGE.to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    apply_counter_events_tx(&mut tx, &[event]).await?;
    tx.commit().await?;

    tracing::info!(
        application_id = %created.id,
        job_id = %created.job_id,
        user_id = %auth.user_id(),
        "Application submitted"
    );

    let applicant = state
        .repos
        .read_models
        .applicant(created.applicant_id)
        .await?
        .map(ApplicantResponse::from);
    Ok((
        StatusCode::CREATED,
        Json(ApplicationDetailResponse::new(
            created,
            Some(JobSummaryResponse::from(job)),
            applicant,
        )),
    ))
}

/// GET /api/applications
///
/// Job seekers get an empty page; they use `my-applications`.
pub async fn list_applications(
    AuthUser(auth): AuthUser,
    State(state): State<ApplicationsState>,
    Query(query): Query<ListApplicationsQuery>,
) -> Result<Json<Page<ApplicationListResponse>>> {
    let ordering = Ordering::parse(
        query.ordering.as_deref(),
        REVIEW_ORDERING_FIELDS,
        DEFAULT_APPLICATION_ORDERING,
    )?;
    let page = PageParams { page: query.page };
    let filter = ApplicationFilter {
        status: query.status,
        job: query.job,
        search: query.search,
    };

    let (rows, count) = state
        .repos
        .applications
        .list(auth.review_scope(), &filter, &ordering, &page)
        .await?;
    let jobs = job_summaries(&state, rows.iter().map(|r| r.application.job_id)).await?;

    let results = rows
        .into_iter()
        .map(|row| {
            let job = jobs.get(&row.application.job_id).cloned();
            ApplicationListResponse::new(row, job)
        })
        .collect();

    Ok(Json(Page::new(results, count, &page)))
}

/// GET /api/applications/my-applications
pub async fn my_applications(
    AuthUser(auth): AuthUser,
    State(state): State<ApplicationsState>,
    Query(query): Query<MyApplicationsQuery>,
) -> Result<Json<Page<MyApplicationResponse>>> {
    let ordering = Ordering::parse(
        query.ordering.as_deref(),
        MY_ORDERING_FIELDS,
        DEFAULT_APPLICATION_ORDERING,
    )?;
    let page = PageParams { page: query.page };
    let filter = ApplicationFilter {
        status: query.status,
        ..Default::default()
    };

    let (rows, count) = state
        .repos
        .applications
        .list(ApplicationScope::Applicant(auth.user_id()), &filter, &ordering, &page)
        .await?;
    let jobs = job_summaries(&state, rows.iter().map(|r| r.application.job_id)).await?;

    let results = rows
        .into_iter()
        .map(|row| {
            let job = jobs.get(&row.application.job_id).cloned();
            MyApplicationResponse::new(row.application, job)
        })
        .collect();

    Ok(Json(Page::new(results, count, &page)))
}

/// GET /api/applications/stats
pub async fn application_stats(
    AuthUser(auth): AuthUser,
    State(state): State<ApplicationsState>,
) -> Result<Json<ApplicationStatsResponse>> {
    let counts = state
        .repos
        .applications
        .stats(auth.application_scope())
        .await?;
    Ok(Json(ApplicationStatsResponse::from(counts)))
}

/// GET /api/applications/{id}
///
/// Applications outside the caller's scope are reported as missing.
pub async fn get_application(
    AuthUser(auth): AuthUser,
    State(state): State<ApplicationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetailResponse>> {
    let app = state
        .repos
        .applications
        .get_scoped(id, auth.application_scope())
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(detail_response(&state, app).await?))
}

/// PATCH /api/applications/{id}/status
pub async fn update_status(
    AuthUser(auth): AuthUser,
    State(state): State<ApplicationsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<ApplicationDetailResponse>> {
    let mut tx = state.repos.begin().await?;
    let mut app = lock_application(&mut tx, id).await?;
    let posted_by = state
        .repos
        .read_models
        .job(app.job_id)
        .await?
        .and_then(|job| job.posted_by);
    authorize(
        auth.role(),
        Action::UpdateApplicationStatus,
        auth.ownership_of(posted_by),
    )
    .require()?;

    let previous = app.status;
    app.review(Review::from(req), Utc::now())?;
    let saved = save_status_tx(&mut tx, &app).await?;
    tx.commit().await?;

    tracing::info!(
        application_id = %saved.id,
        from = %previous,
        to = %saved.status,
        user_id = %auth.user_id(),
        "Application status updated"
    );

    Ok(Json(detail_response(&state, saved).await?))
}

/// POST /api/applications/{id}/withdraw
pub async fn withdraw(
    AuthUser(auth): AuthUser,
    State(state): State<ApplicationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    let mut tx = state.repos.begin().await?;
    let mut app = lock_application(&mut tx, id).await?;
    authorize(
        auth.role(),
        Action::WithdrawApplication,
        auth.ownership_of(Some(app.applicant_id)),
    )
    .require()?;

    app.withdraw(Utc::now())?;
    save_status_tx(&mut tx, &app).await?;
    tx.commit().await?;

    tracing::info!(application_id = %app.id, user_id = %auth.user_id(), "Application withdrawn");

    Ok(Json(MessageResponse {
        message: "Application withdrawn successfully".to_string(),
    }))
}

/// DELETE /api/applications/{id}
pub async fn delete_application(
    AuthUser(auth): AuthUser,
    State(state): State<ApplicationsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    authorize(auth.role(), Action::DeleteApplication, Ownership::NotApplicable).require()?;

    let mut tx = state.repos.begin().await?;
    let event = delete_application_tx(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    apply_counter_events_tx(&mut tx, &[event]).await?;
    tx.commit().await?;

    tracing::info!(application_id = %id, user_id = %auth.user_id(), "Application deleted");

    Ok(StatusCode::NO_CONTENT)
}
