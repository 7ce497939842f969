//! Job domain entities
//!
//! A `Job` is a posting owned by a company and, optionally, by the user who
//! posted it. `Category` groups postings for browsing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jobboard_common::{check_amount, Error, Result};

/// How much of the job can be done remotely
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(type_name = "remote_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RemoteType {
    FullyRemote,
    Hybrid,
    #[default]
    OnSite,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(type_name = "job_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Freelance,
    Internship,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(type_name = "experience_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    EntryLevel,
    #[default]
    MidLevel,
    SeniorLevel,
    Executive,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(type_name = "salary_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SalaryType {
    Hourly,
    Monthly,
    #[default]
    Yearly,
}

/// Publication status of a posting
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Draft,
    #[default]
    Active,
    Paused,
    Closed,
    Expired,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Draft => write!(f, "draft"),
            JobStatus::Active => write!(f, "active"),
            JobStatus::Paused => write!(f, "paused"),
            JobStatus::Closed => write!(f, "closed"),
            JobStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Job category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub icon: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, slug: String) -> Result<Self> {
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            slug,
            description: String::new(),
            icon: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        category.validate()?;
        Ok(category)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.name.len() > 100 {
            return Err(Error::Validation(
                "Category name must be 1-100 characters".to_string(),
            ));
        }
        if self.icon.len() > 50 {
            return Err(Error::Validation(
                "Category icon must be at most 50 characters".to_string(),
            ));
        }
        Ok(())
    }
}

/// Job posting entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub benefits: String,
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
    pub status: JobStatus,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_urgent: bool,
    pub application_url: Option<String>,
    pub application_email: Option<String>,
    pub accept_applications: bool,
    /// Comma-separated skill names
    pub skills_required: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub company_id: Uuid,
    pub category_id: Option<Uuid>,
    pub posted_by: Option<Uuid>,
    pub views_count: i32,
    pub applications_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create an active, publicly visible posting with default metadata
    pub fn new(
        title: String,
        slug: String,
        description: String,
        company_id: Uuid,
        posted_by: Option<Uuid>,
    ) -> Result<Self> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            slug,
            description,
            requirements: String::new(),
            responsibilities: String::new(),
            benefits: String::new(),
            location: String::new(),
            is_remote: false,
            remote_type: RemoteType::default(),
            job_type: JobType::default(),
            experience_level: ExperienceLevel::default(),
            salary_min: None,
            salary_max: None,
            salary_currency: "USD".to_string(),
            salary_type: SalaryType::default(),
            show_salary: true,
            status: JobStatus::Active,
            is_active: true,
            is_featured: false,
            is_urgent: false,
            application_url: None,
            application_email: None,
            accept_applications: true,
            skills_required: String::new(),
            expires_at: None,
            company_id,
            category_id: None,
            posted_by,
            views_count: 0,
            applications_count: 0,
            created_at: now,
            updated_at: now,
        };
        job.validate()?;
        Ok(job)
    }

    /// Skills split on commas, trimmed, blanks dropped
    pub fn skills_list(&self) -> Vec<String> {
        self.skills_required
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// A posting without an expiry never expires
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    /// Shown in public listings
    pub fn is_publicly_visible(&self) -> bool {
        self.is_active && self.status == JobStatus::Active
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        if self.title.is_empty() || self.title.len() > 255 {
            return Err(Error::Validation(
                "Job title must be 1-255 characters".to_string(),
            ));
        }

        if self.description.trim().is_empty() {
            return Err(Error::Validation(
                "Job description is required".to_string(),
            ));
        }

        if let Some(min) = self.salary_min {
            check_amount("salary_min", min)?;
        }
        if let Some(max) = self.salary_max {
            check_amount("salary_max", max)?;
        }

        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(Error::Validation(
                    "Minimum salary cannot exceed maximum salary".to_string(),
                ));
            }
        }

        if self.salary_currency.len() != 3
            || !self.salary_currency.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(Error::Validation(
                "Salary currency must be a 3-letter uppercase code".to_string(),
            ));
        }

        if let Some(email) = &self.application_email {
            if !email.contains('@') {
                return Err(Error::Validation(
                    "Invalid application email".to_string(),
                ));
            }
        }

        Ok(())
    }
}
