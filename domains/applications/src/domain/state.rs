//! Application status workflow
//!
//! Reviewers (employers and admins) may move an application to any status.
//! The applicant may only withdraw, and only while the application is not
//! accepted or rejected. Those two are terminal from the applicant's side.

use jobboard_common::StateError;
use serde::{Deserialize, Serialize};

pub const WITHDRAW_TERMINAL_MESSAGE: &str =
    "Cannot withdraw an application that has been accepted or rejected";

/// Stored application status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Shortlisted,
    Interviewed,
    Rejected,
    Accepted,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 7] = [
        Self::Pending,
        Self::Reviewed,
        Self::Shortlisted,
        Self::Interviewed,
        Self::Rejected,
        Self::Accepted,
        Self::Withdrawn,
    ];

    /// Accepted and rejected applications can no longer be changed by the applicant
    pub fn is_terminal_for_applicant(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Statuses the applicant can move to from here
    pub fn applicant_transitions(&self) -> &'static [ApplicationStatus] {
        if self.is_terminal_for_applicant() {
            &[]
        } else {
            &[Self::Withdrawn]
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    #[mutants::skip] // Only rendered into log fields
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Reviewed => write!(f, "reviewed"),
            Self::Shortlisted => write!(f, "shortlisted"),
            Self::Interviewed => write!(f, "interviewed"),
            Self::Rejected => write!(f, "rejected"),
            Self::Accepted => write!(f, "accepted"),
            Self::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

/// Events that move an application between statuses
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusEvent {
    /// A reviewer sets the status
    Review(ApplicationStatus),
    /// The applicant withdraws
    Withdraw,
}

impl std::fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Review(to) => write!(f, "review({})", to),
            Self::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// Application status state machine
pub struct ApplicationStateMachine;

impl ApplicationStateMachine {
    /// Attempt a status transition
    pub fn transition(
        current: ApplicationStatus,
        event: StatusEvent,
    ) -> Result<ApplicationStatus, StateError> {
        match event {
            StatusEvent::Review(to) => Ok(to),
            StatusEvent::Withdraw if current.is_terminal_for_applicant() => {
                Err(StateError::GuardFailed(WITHDRAW_TERMINAL_MESSAGE.to_string()))
            }
            // withdrawing twice is a no-op
            StatusEvent::Withdraw => Ok(ApplicationStatus::Withdrawn),
        }
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: ApplicationStatus, event: StatusEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
