//! Application entities

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jobboard_common::{check_amount, Error, Result};

use crate::domain::state::{ApplicationStateMachine, ApplicationStatus, StatusEvent};

pub const NOT_ACCEPTING_MESSAGE: &str = "This job is no longer accepting applications.";
pub const NOT_ACTIVE_MESSAGE: &str = "This job is not currently active.";
pub const EXPIRED_MESSAGE: &str = "This job posting has expired.";
pub const DUPLICATE_MESSAGE: &str = "You have already applied for this job.";

/// Job application entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_letter: String,
    pub resume_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    /// Contact override for this application
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

/// Reviewer changes to an application
#[derive(Debug, Clone, Default)]
pub struct Review {
    pub status: Option<ApplicationStatus>,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
}

impl Application {
    /// Create a pending application
    pub fn new(job_id: Uuid, applicant_id: Uuid) -> Self {
        let now = Utc::now();
        Application {
            id: Uuid::new_v4(),
            job_id,
            applicant_id,
            cover_letter: String::new(),
            resume_url: None,
            portfolio_url: None,
            linkedin_url: None,
            phone: None,
            email: None,
            status: ApplicationStatus::Pending,
            admin_notes: String::new(),
            rejection_reason: String::new(),
            years_of_experience: None,
            expected_salary: None,
            availability_date: None,
            applied_at: now,
            updated_at: now,
            reviewed_at: None,
        }
    }

    /// Apply a reviewer update. `reviewed_at` is stamped only when the
    /// status actually changes.
    pub fn review(&mut self, review: Review, now: DateTime<Utc>) -> Result<()> {
        if let Some(to) = review.status {
            let next = ApplicationStateMachine::transition(self.status, StatusEvent::Review(to))?;
            if next != self.status {
                self.status = next;
                self.reviewed_at = Some(now);
            }
        }
        if let Some(notes) = review.admin_notes {
            self.admin_notes = notes;
        }
        if let Some(reason) = review.rejection_reason {
            self.rejection_reason = reason;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Applicant withdrawal
    pub fn withdraw(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.status = ApplicationStateMachine::transition(self.status, StatusEvent::Withdraw)?;
        self.updated_at = now;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(years) = self.years_of_experience {
            if years < 0 {
                return Err(Error::Validation(
                    "Years of experience must not be negative".to_string(),
                ));
            }
        }
        if let Some(salary) = self.expected_salary {
            check_amount("expected_salary", salary)?;
        }
        Ok(())
    }
}

/// The parts of a job the application workflow needs, read from the jobs table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct JobSnapshot {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub location: String,
    pub job_type: String,
    pub status: String,
    pub is_active: bool,
    pub accept_applications: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub posted_by: Option<Uuid>,
    pub company_id: Uuid,
    pub company_name: String,
    pub company_slug: String,
}

impl JobSnapshot {
    /// Reject applications to jobs that are closed for applying.
    /// Checks run in a fixed order so the first failing reason is reported.
    pub fn ensure_accepting_applications(&self, now: DateTime<Utc>) -> Result<()> {
        if !self.accept_applications {
            return Err(Error::Validation(NOT_ACCEPTING_MESSAGE.to_string()));
        }
        if !self.is_active || self.status != "active" {
            return Err(Error::Validation(NOT_ACTIVE_MESSAGE.to_string()));
        }
        if self.expires_at.is_some_and(|expires_at| now > expires_at) {
            return Err(Error::Validation(EXPIRED_MESSAGE.to_string()));
        }
        Ok(())
    }
}
