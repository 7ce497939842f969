//! Company API handlers
//!
//! Implements:
//! - GET    /api/companies         Filtered, searchable, paginated list
//! - POST   /api/companies         Create (admin, employer)
//! - GET    /api/companies/{slug}  Detail
//! - PATCH  /api/companies/{slug}  Update (admin, owning employer)
//! - DELETE /api/companies/{slug}  Delete (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use jobboard_auth::{authorize, Action, AuthUser, Ownership};
use jobboard_common::{
    slugify, with_suffix, Error, Ordering, Page, PageParams, Result, ValidatedJson,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::CompaniesState;
use crate::domain::entities::{Company, CompanySize, CompanyWithJobCount, MIN_FOUNDED_YEAR};
use crate::repository::{CompanyFilter, COMPANY_ORDERING_FIELDS};

/// Query string of the company list
#[derive(Debug, Default, Deserialize)]
pub struct ListCompaniesQuery {
    pub page: Option<i64>,
    pub ordering: Option<String>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub size: Option<CompanySize>,
    pub is_verified: Option<bool>,
}

/// Compact company representation used in lists and nested in jobs
#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub logo_url: Option<String>,
    pub location: Option<String>,
    pub size: Option<CompanySize>,
    pub industry: Option<String>,
    pub is_verified: bool,
    pub job_count: i64,
    pub created_at: DateTime<Utc>,
}

impl CompanyListResponse {
    pub fn new(row: CompanyWithJobCount, media_base_url: &str) -> Self {
        let logo_url = row.company.logo_display_url(media_base_url);
        let c = row.company;
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            logo_url,
            location: c.location,
            size: c.size,
            industry: c.industry,
            is_verified: c.is_verified,
            job_count: row.job_count,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompanyDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub location: Option<String>,
    pub size: Option<CompanySize>,
    pub founded_year: Option<i32>,
    pub industry: Option<String>,
    pub is_verified: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub facebook_url: Option<String>,
    pub created_by: Option<Uuid>,
    pub job_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyDetailResponse {
    pub fn new(company: Company, job_count: i64, media_base_url: &str) -> Self {
        let logo_url = company.logo_display_url(media_base_url);
        Self {
            id: company.id,
            name: company.name,
            slug: company.slug,
            description: company.description,
            website: company.website,
            logo_url,
            location: company.location,
            size: company.size,
            founded_year: company.founded_year,
            industry: company.industry,
            is_verified: company.is_verified,
            email: company.email,
            phone: company.phone,
            linkedin_url: company.linkedin_url,
            twitter_url: company.twitter_url,
            facebook_url: company.facebook_url,
            created_by: company.created_by,
            job_count,
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

/// Editable company profile fields
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CompanyFields {
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    pub size: Option<CompanySize>,
    #[validate(range(min = MIN_FOUNDED_YEAR))]
    pub founded_year: Option<i32>,
    #[validate(length(max = 100))]
    pub industry: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub twitter_url: Option<String>,
    #[validate(url)]
    pub facebook_url: Option<String>,
}

impl CompanyFields {
    fn apply_to(self, company: &mut Company) {
        if let Some(description) = self.description {
            company.description = description;
        }
        set_if_some(&mut company.website, self.website);
        set_if_some(&mut company.logo_url, self.logo_url);
        set_if_some(&mut company.location, self.location);
        set_if_some(&mut company.size, self.size);
        set_if_some(&mut company.founded_year, self.founded_year);
        set_if_some(&mut company.industry, self.industry);
        set_if_some(&mut company.email, self.email);
        set_if_some(&mut company.phone, self.phone);
        set_if_some(&mut company.linkedin_url, self.linkedin_url);
        set_if_some(&mut company.twitter_url, self.twitter_url);
        set_if_some(&mut company.facebook_url, self.facebook_url);
    }
}

fn set_if_some<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: CompanyFields,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Admin only
    pub is_verified: Option<bool>,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: CompanyFields,
}

/// Derive a slug for `name` that no other company uses.
/// `current` is the company's own slug when renaming.
async fn unique_slug(state: &CompaniesState, name: &str, current: Option<&str>) -> Result<String> {
    let base = slugify(name)?;
    let mut taken = state.repos.companies.taken_slugs(&base).await?;
    if let Some(current) = current {
        taken.retain(|s| s != current);
    }
    Ok(with_suffix(&base, &taken))
}

async fn load_company(state: &CompaniesState, slug: &str) -> Result<CompanyWithJobCount> {
    state
        .repos
        .companies
        .get_by_slug(slug)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Company '{}' not found", slug)))
}

/// GET /api/companies
pub async fn list_companies(
    State(state): State<CompaniesState>,
    Query(query): Query<ListCompaniesQuery>,
) -> Result<Json<Page<CompanyListResponse>>> {
    let ordering = Ordering::parse(query.ordering.as_deref(), COMPANY_ORDERING_FIELDS, &["name"])?;
    let page = PageParams { page: query.page };
    let filter = CompanyFilter {
        location: query.location,
        industry: query.industry,
        size: query.size,
        is_verified: query.is_verified,
        search: query.search,
    };

    let (rows, count) = state.repos.companies.list(&filter, &ordering, &page).await?;
    let results = rows
        .into_iter()
        .map(|row| CompanyListResponse::new(row, &state.media_base_url))
        .collect();

    Ok(Json(Page::new(results, count, &page)))
}

/// POST /api/companies
pub async fn create_company(
    AuthUser(auth): AuthUser,
    State(state): State<CompaniesState>,
    ValidatedJson(req): ValidatedJson<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyDetailResponse>)> {
    authorize(auth.role(), Action::CreateCompany, Ownership::NotApplicable).require()?;

    let slug = unique_slug(&state, &req.name, None).await?;
    let mut company = Company::new(req.name, slug, Some(auth.user_id()))?;
    req.fields.apply_to(&mut company);
    company.validate()?;

    let created = state.repos.companies.create(&company).await?;
    tracing::info!(
        company_id = %created.id,
        slug = %created.slug,
        user_id = %auth.user_id(),
        "Company created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CompanyDetailResponse::new(created, 0, &state.media_base_url)),
    ))
}

/// GET /api/companies/{slug}
pub async fn get_company(
    State(state): State<CompaniesState>,
    Path(slug): Path<String>,
) -> Result<Json<CompanyDetailResponse>> {
    let row = load_company(&state, &slug).await?;
    Ok(Json(CompanyDetailResponse::new(
        row.company,
        row.job_count,
        &state.media_base_url,
    )))
}

/// PATCH /api/companies/{slug}
pub async fn update_company(
    AuthUser(auth): AuthUser,
    State(state): State<CompaniesState>,
    Path(slug): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateCompanyRequest>,
) -> Result<Json<CompanyDetailResponse>> {
    let CompanyWithJobCount {
        mut company,
        job_count,
    } = load_company(&state, &slug).await?;

    authorize(
        auth.role(),
        Action::UpdateCompany,
        auth.ownership_of(company.created_by),
    )
    .require()?;

    if let Some(is_verified) = req.is_verified {
        if !auth.is_admin() {
            return Err(Error::Authorization(
                "Only admins can change company verification".to_string(),
            ));
        }
        company.is_verified = is_verified;
    }

    if let Some(name) = req.name {
        if name.trim() != company.name {
            company.slug = unique_slug(&state, &name, Some(&company.slug)).await?;
            company.name = name.trim().to_string();
        }
    }

    req.fields.apply_to(&mut company);
    company.validate()?;

    let updated = state.repos.companies.update(&company).await?;
    tracing::info!(company_id = %updated.id, user_id = %auth.user_id(), "Company updated");

    Ok(Json(CompanyDetailResponse::new(
        updated,
        job_count,
        &state.media_base_url,
    )))
}

/// DELETE /api/companies/{slug}
///
/// Jobs and their applications are removed with the company.
pub async fn delete_company(
    AuthUser(auth): AuthUser,
    State(state): State<CompaniesState>,
    Path(slug): Path<String>,
) -> Result<StatusCode> {
    authorize(auth.role(), Action::DeleteCompany, Ownership::NotApplicable).require()?;

    let row = load_company(&state, &slug).await?;
    state.repos.companies.delete(row.company.id).await?;

    if let Some(logo_path) = &row.company.logo_path {
        if let Err(e) = state.logos.remove(logo_path).await {
            tracing::warn!(
                error = %e,
                logo_path = %logo_path,
                "Failed to remove logo of deleted company"
            );
        }
    }

    tracing::info!(company_id = %row.company.id, user_id = %auth.user_id(), "Company deleted");
    Ok(StatusCode::NO_CONTENT)
}
