//! Domain events emitted by application writes
//!
//! Produced by the repository inside the write transaction and consumed by
//! the counter maintenance in the same transaction.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationEvent {
    Created { application_id: Uuid, job_id: Uuid },
    Deleted { application_id: Uuid, job_id: Uuid },
}

impl ApplicationEvent {
    /// Job whose counters the event affects
    pub fn job_id(&self) -> Uuid {
        match self {
            Self::Created { job_id, .. } | Self::Deleted { job_id, .. } => *job_id,
        }
    }
}

/// Distinct jobs touched by a batch of events, in first-seen order
pub fn affected_jobs(events: &[ApplicationEvent]) -> Vec<Uuid> {
    let mut jobs: Vec<Uuid> = Vec::with_capacity(events.len());
    for job_id in events.iter().map(ApplicationEvent::job_id) {
        if !jobs.contains(&job_id) {
            jobs.push(job_id);
        }
    }
    jobs
}
