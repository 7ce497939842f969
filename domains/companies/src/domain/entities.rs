//! Company entity

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jobboard_common::{Error, Result};

pub const MIN_FOUNDED_YEAR: i32 = 1800;

/// Headcount bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "company_size")]
pub enum CompanySize {
    #[sqlx(rename = "1-10")]
    #[serde(rename = "1-10")]
    Micro,
    #[sqlx(rename = "11-50")]
    #[serde(rename = "11-50")]
    Small,
    #[sqlx(rename = "51-200")]
    #[serde(rename = "51-200")]
    Medium,
    #[sqlx(rename = "201-500")]
    #[serde(rename = "201-500")]
    Large,
    #[sqlx(rename = "501-1000")]
    #[serde(rename = "501-1000")]
    VeryLarge,
    #[sqlx(rename = "1000+")]
    #[serde(rename = "1000+")]
    Enterprise,
}

impl std::fmt::Display for CompanySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CompanySize::Micro => "1-10",
            CompanySize::Small => "11-50",
            CompanySize::Medium => "51-200",
            CompanySize::Large => "201-500",
            CompanySize::VeryLarge => "501-1000",
            CompanySize::Enterprise => "1000+",
        };
        f.write_str(label)
    }
}

/// Company entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub logo_path: Option<String>,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Company together with its number of active job postings
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanyWithJobCount {
    #[sqlx(flatten)]
    pub company: Company,
    pub job_count: i64,
}

impl Company {
    /// Create a new unverified company. The slug must already be unique.
    pub fn new(name: String, slug: String, created_by: Option<Uuid>) -> Result<Self> {
        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            slug,
            description: String::new(),
            website: None,
            logo_url: None,
            logo_path: None,
            location: None,
            size: None,
            founded_year: None,
            industry: None,
            is_verified: false,
            email: None,
            phone: None,
            linkedin_url: None,
            twitter_url: None,
            facebook_url: None,
            created_by,
            created_at: now,
            updated_at: now,
        };
        company.validate()?;
        Ok(company)
    }

    /// URL clients should render: an uploaded logo wins over an external URL
    pub fn logo_display_url(&self, media_base_url: &str) -> Option<String> {
        match &self.logo_path {
            Some(path) => Some(format!(
                "{}/{}",
                media_base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )),
            None => self.logo_url.clone(),
        }
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.name.len() > 255 {
            return Err(Error::Validation(
                "Company name must be 1-255 characters".to_string(),
            ));
        }

        if let Some(year) = self.founded_year {
            let current_year = Utc::now().year();
            if !(MIN_FOUNDED_YEAR..=current_year).contains(&year) {
                return Err(Error::Validation(format!(
                    "Founded year must be between {} and {}",
                    MIN_FOUNDED_YEAR, current_year
                )));
            }
        }

        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(Error::Validation("Invalid company email".to_string()));
            }
        }

        Ok(())
    }
}
