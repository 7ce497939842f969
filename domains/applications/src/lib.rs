//! Applications domain: job applications, the status workflow, job
//! application counters and per-status statistics

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::events::ApplicationEvent;
pub use domain::state::{ApplicationStateMachine, ApplicationStatus, StatusEvent};

// Re-export repository types
pub use repository::{
    ApplicantProfile, ApplicationFilter, ApplicationRepository, ApplicationRow,
    ApplicationsReadModels, ApplicationsRepositories, StatusCounts,
};

// Re-export API types
pub use api::routes;
pub use api::ApplicationsState;
