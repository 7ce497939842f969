//! Transaction helpers for the Applications domain
//!
//! Application inserts and deletes emit [`ApplicationEvent`]s; the caller
//! feeds them to [`apply_counter_events_tx`] before committing so the job's
//! `applications_count` moves together with the row.
//!
//! Status changes lock the row first, so a review and a withdrawal of the
//! same application are applied one after the other.

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::applications::APPLICATION_COLUMNS;
use crate::domain::entities::Application;
use crate::domain::events::{affected_jobs, ApplicationEvent};

/// Insert an application within a transaction
pub async fn insert_application_tx(
    tx: &mut Transaction<'_, Postgres>,
    application: &Application,
) -> Result<(Application, ApplicationEvent), sqlx::Error> {
    let query = format!(
        "INSERT INTO applications ({APPLICATION_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
         RETURNING {APPLICATION_COLUMNS}"
    );
    let created = sqlx::query_as::<_, Application>(&query)
        .bind(application.id)
        .bind(application.job_id)
        .bind(application.applicant_id)
        .bind(&application.cover_letter)
        .bind(&application.resume_url)
        .bind(&application.portfolio_url)
        .bind(&application.linkedin_url)
        .bind(&application.phone)
        .bind(&application.email)
        .bind(application.status)
        .bind(&application.admin_notes)
        .bind(&application.rejection_reason)
        .bind(application.years_of_experience)
        .bind(application.expected_salary)
        .bind(application.availability_date)
        .bind(application.applied_at)
        .bind(application.updated_at)
        .bind(application.reviewed_at)
        .fetch_one(&mut **tx)
        .await?;

    let event = ApplicationEvent::Created {
        application_id: created.id,
        job_id: created.job_id,
    };
    Ok((created, event))
}

/// Load an application and lock its row until the transaction ends
pub async fn find_application_for_update_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Application>, sqlx::Error> {
    let query = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Application>(&query)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

/// Persist status, reviewer notes and timestamps of a locked application
pub async fn save_status_tx(
    tx: &mut Transaction<'_, Postgres>,
    application: &Application,
) -> Result<Application, sqlx::Error> {
    let query = format!(
        "UPDATE applications SET \
            status = $2, admin_notes = $3, rejection_reason = $4, reviewed_at = $5, \
            updated_at = $6 \
         WHERE id = $1 \
         RETURNING {APPLICATION_COLUMNS}"
    );
    sqlx::query_as::<_, Application>(&query)
        .bind(application.id)
        .bind(application.status)
        .bind(&application.admin_notes)
        .bind(&application.rejection_reason)
        .bind(application.reviewed_at)
        .bind(application.updated_at)
        .fetch_one(&mut **tx)
        .await
}

/// Delete an application within a transaction. Returns `None` if it did not exist.
pub async fn delete_application_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<ApplicationEvent>, sqlx::Error> {
    let job_id: Option<Uuid> =
        sqlx::query_scalar("DELETE FROM applications WHERE id = $1 RETURNING job_id")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

    Ok(job_id.map(|job_id| ApplicationEvent::Deleted {
        application_id: id,
        job_id,
    }))
}

/// Recompute `applications_count` for every job the events touch.
///
/// The count is derived from the rows rather than incremented, so it stays
/// exact under concurrent writers.
pub async fn apply_counter_events_tx(
    tx: &mut Transaction<'_, Postgres>,
    events: &[ApplicationEvent],
) -> Result<(), sqlx::Error> {
    for job_id in affected_jobs(events) {
        sqlx::query(
            "UPDATE jobs SET applications_count = \
                (SELECT COUNT(*) FROM applications WHERE job_id = $1) \
             WHERE id = $1",
        )
        .bind(job_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
