//! Company logo upload
//!
//! POST /api/companies/{slug}/logo with a multipart `logo` field.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use jobboard_auth::{authorize, Action, AuthUser};
use jobboard_common::{Error, Result};

use super::companies::CompanyDetailResponse;
use crate::api::middleware::CompaniesState;
use crate::storage::logo_key;

/// Field name carrying the image
const LOGO_FIELD: &str = "logo";

/// POST /api/companies/{slug}/logo
///
/// Same permission as updating the company. The stored key replaces any
/// previous upload and takes priority over `logo_url` in responses.
pub async fn upload_logo(
    AuthUser(auth): AuthUser,
    State(state): State<CompaniesState>,
    Path(slug): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<CompanyDetailResponse>> {
    let row = state
        .repos
        .companies
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Company '{}' not found", slug)))?;
    let company = row.company;

    authorize(
        auth.role(),
        Action::UpdateCompany,
        auth.ownership_of(company.created_by),
    )
    .require()?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::rejected_body(e.status(), format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(LOGO_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::rejected_body(e.status(), format!("Failed to read logo: {}", e)))?;
        upload = Some((content_type, bytes));
        break;
    }

    let (content_type, bytes) = upload
        .ok_or_else(|| Error::Validation(format!("Missing '{}' file field", LOGO_FIELD)))?;

    let key = logo_key(&company.slug, &content_type, &bytes)?;
    let overwrites_current = company.logo_path.as_deref() == Some(key.as_str());
    let previous = company.logo_path.as_deref().filter(|_| !overwrites_current);
    state.logos.store(&key, &bytes).await?;

    // The old file goes only once the row points at the new one
    let updated = match state.repos.companies.set_logo_path(company.id, &key).await {
        Ok(updated) => updated,
        Err(e) => {
            if !overwrites_current {
                discard_logo(&state, &key).await;
            }
            return Err(e);
        }
    };
    if let Some(previous) = previous {
        discard_logo(&state, previous).await;
    }

    tracing::info!(
        company_id = %updated.id,
        logo_path = %key,
        size = bytes.len(),
        "Company logo uploaded"
    );

    Ok(Json(CompanyDetailResponse::new(
        updated,
        row.job_count,
        &state.media_base_url,
    )))
}

async fn discard_logo(state: &CompaniesState, key: &str) {
    if let Err(e) = state.logos.remove(key).await {
        tracing::warn!(error = %e, logo_path = %key, "Failed to remove logo file");
    }
}
