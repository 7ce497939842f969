//! Role and ownership authorization policy
//!
//! Every mutating endpoint asks [`authorize`] before touching the store.
//! Read endpoints never fail on role: they narrow the visible rows through
//! an [`ApplicationScope`] instead.

use uuid::Uuid;

use crate::types::AuthRole;

/// Mutations guarded by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateCompany,
    UpdateCompany,
    DeleteCompany,
    CreateCategory,
    CreateJob,
    UpdateJob,
    DeleteJob,
    Apply,
    UpdateApplicationStatus,
    WithdrawApplication,
    DeleteApplication,
}

/// Relationship between the caller and the target resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owner,
    NotOwner,
    /// No existing resource, e.g. on create
    NotApplicable,
}

/// Outcome of a policy check; denials carry a short reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Turn a denial into a 403 error
    pub fn require(self) -> jobboard_common::Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                Err(jobboard_common::Error::Authorization(reason.to_string()))
            }
        }
    }
}

/// Which applications a read endpoint may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationScope {
    All,
    /// Applications to jobs posted by this user
    PostedBy(Uuid),
    /// Applications submitted by this user
    Applicant(Uuid),
    Nothing,
}

/// Map (role, action, ownership) to allow/deny
pub fn authorize(role: AuthRole, action: Action, ownership: Ownership) -> Decision {
    use Action::*;
    use AuthRole::*;

    let owner = ownership == Ownership::Owner;

    match (action, role) {
        (CreateCompany, Admin | Employer) => Decision::Allow,
        (CreateCompany, User) => Decision::Deny("Only admins and employers can create companies"),

        (UpdateCompany, Admin) => Decision::Allow,
        (UpdateCompany, Employer) if owner => Decision::Allow,
        (UpdateCompany, Employer) => Decision::Deny("You can only update companies you created"),
        (UpdateCompany, User) => Decision::Deny("Only employers can update companies"),

        (DeleteCompany, Admin) => Decision::Allow,
        (DeleteCompany, _) => Decision::Deny("Only admins can delete companies"),

        (CreateCategory, Admin) => Decision::Allow,
        (CreateCategory, _) => Decision::Deny("Only admins can create categories"),

        (CreateJob, Admin | Employer) => Decision::Allow,
        (CreateJob, User) => Decision::Deny("Only admins and employers can create jobs"),

        (UpdateJob, Admin) => Decision::Allow,
        (UpdateJob, Employer) if owner => Decision::Allow,
        (UpdateJob, _) => Decision::Deny("You can only update your own job postings"),

        (DeleteJob, Admin) => Decision::Allow,
        (DeleteJob, Employer) if owner => Decision::Allow,
        (DeleteJob, _) => Decision::Deny("You can only delete your own job postings"),

        (Apply, Admin | User) => Decision::Allow,
        (Apply, Employer) => Decision::Deny("Only job seekers can apply for jobs"),

        (UpdateApplicationStatus, Admin) => Decision::Allow,
        (UpdateApplicationStatus, Employer) if owner => Decision::Allow,
        (UpdateApplicationStatus, Employer) => {
            Decision::Deny("You can only update applications to your own jobs")
        }
        (UpdateApplicationStatus, User) => {
            Decision::Deny("Only employers and admins can update application status")
        }

        (WithdrawApplication, _) if owner => Decision::Allow,
        (WithdrawApplication, _) => Decision::Deny("You can only withdraw your own applications"),

        (DeleteApplication, Admin) => Decision::Allow,
        (DeleteApplication, _) => Decision::Deny("Only admins can delete applications"),
    }
}
