//! Application workflow integration tests
//!
//! - POST /api/applications/apply
//! - GET /api/applications, /my-applications, /stats, /{id}
//! - PATCH /api/applications/{id}/status
//! - POST /api/applications/{id}/withdraw
//! - DELETE /api/applications/{id}

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use jobboard_jobs::{Job, JobStatus};
use serde_json::{json, Value};
use serial_test::serial;
use uuid::Uuid;

use crate::common::{error_message, TestApp, UserFixture};

/// Acme with one open posting by `poster`
async fn open_job(app: &TestApp, poster: &UserFixture) -> Job {
    let acme = app.create_company("Acme", Some(poster.id())).await.unwrap();
    app.create_job("Backend Engineer", acme.id, Some(poster.id()), |_| {})
        .await
        .unwrap()
}

async fn apply(app: &TestApp, seeker: &UserFixture, job_id: Uuid) -> (StatusCode, Value) {
    app.post(
        "/api/applications/apply",
        seeker.token(),
        json!({
            "job": job_id,
            "cover_letter": "I write Rust",
            "resume_url": "https://cv.example.com/ana.pdf",
            "years_of_experience": 5,
            "expected_salary": "85000"
        }),
    )
    .await
}

fn id_of(body: &Value) -> String {
    body["id"].as_str().unwrap().to_string()
}

mod test_apply {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_seeker_applies_and_poster_shortlists() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let seeker = UserFixture::seeker(&app, "ana").await.unwrap();
        let job = open_job(&app, &poster).await;

        let (status, created) = apply(&app, &seeker, job.id).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "pending");
        assert_eq!(created["job"]["company"]["name"], "Acme");
        assert_eq!(created["applicant"]["username"], "ana");
        assert!(created["reviewed_at"].is_null());
        assert_eq!(app.applications_count(job.id).await.unwrap(), 1);

        let uri = format!("/api/applications/{}/status", id_of(&created));
        let (status, reviewed) = app
            .patch(
                &uri,
                poster.token(),
                json!({"status": "shortlisted", "admin_notes": "strong"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reviewed["status"], "shortlisted");
        assert_eq!(reviewed["admin_notes"], "strong");
        assert!(reviewed["reviewed_at"].is_string());

        // saving the same status again keeps the first review time
        let (_, again) = app
            .patch(&uri, poster.token(), json!({"status": "shortlisted"}))
            .await;
        assert_eq!(again["reviewed_at"], reviewed["reviewed_at"]);
    }

    #[tokio::test]
    #[serial]
    async fn test_duplicate_application_rejected() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let seeker = UserFixture::seeker(&app, "ana").await.unwrap();
        let job = open_job(&app, &poster).await;

        let (status, _) = apply(&app, &seeker, job.id).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = apply(&app, &seeker, job.id).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("You have already applied for this job."));
        assert_eq!(app.applications_count(job.id).await.unwrap(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_closed_postings_refuse_applications() {
        let app = TestApp::new().await.unwrap();
        let seeker = UserFixture::seeker(&app, "ana").await.unwrap();
        let acme = app.create_company("Acme", None).await.unwrap();

        let paused = app
            .create_job("Paused", acme.id, None, |j| j.status = JobStatus::Paused)
            .await
            .unwrap();
        let expired = app
            .create_job("Expired", acme.id, None, |j| {
                j.expires_at = Some(Utc::now() - Duration::days(1));
            })
            .await
            .unwrap();
        let closed = app
            .create_job("No Intake", acme.id, None, |j| j.accept_applications = false)
            .await
            .unwrap();

        let (status, body) = apply(&app, &seeker, paused.id).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("This job is not currently active."));

        let (status, body) = apply(&app, &seeker, expired.id).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("This job posting has expired."));

        let (status, body) = apply(&app, &seeker, closed.id).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("This job is no longer accepting applications."));

        let (status, _) = apply(&app, &seeker, Uuid::new_v4()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_only_job_seekers_apply() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let job = open_job(&app, &poster).await;

        let (status, _) = apply(&app, &poster, job.id).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .post("/api/applications/apply", None, json!({"job": job.id}))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn test_out_of_range_expected_salary_rejected() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let seeker = UserFixture::seeker(&app, "ana").await.unwrap();
        let job = open_job(&app, &poster).await;

        let (status, body) = app
            .post(
                "/api/applications/apply",
                seeker.token(),
                json!({
                    "job": job.id,
                    "cover_letter": "I write Rust",
                    "expected_salary": "100000000000"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("expected_salary"));
        assert_eq!(app.applications_count(job.id).await.unwrap(), 0);
    }
}

mod test_withdraw {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_withdraw_rules() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let ana = UserFixture::seeker(&app, "ana").await.unwrap();
        let bob = UserFixture::seeker(&app, "bob").await.unwrap();
        let job = open_job(&app, &poster).await;

        let (_, created) = apply(&app, &ana, job.id).await;
        let uri = format!("/api/applications/{}/withdraw", id_of(&created));

        let (status, _) = app.post(&uri, bob.token(), json!({})).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.post(&uri, ana.token(), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Application withdrawn successfully");

        // a second withdrawal changes nothing
        let (status, _) = app.post(&uri, ana.token(), json!({})).await;
        assert_eq!(status, StatusCode::OK);

        let (_, mine) = app.get("/api/applications/my-applications", ana.token()).await;
        assert_eq!(mine["results"][0]["status"], "withdrawn");

        let missing = format!("/api/applications/{}/withdraw", Uuid::new_v4());
        let (status, _) = app.post(&missing, ana.token(), json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn test_accepted_application_cannot_be_withdrawn() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let ana = UserFixture::seeker(&app, "ana").await.unwrap();
        let job = open_job(&app, &poster).await;

        let (_, created) = apply(&app, &ana, job.id).await;
        let id = id_of(&created);
        let (status, _) = app
            .patch(
                &format!("/api/applications/{}/status", id),
                poster.token(),
                json!({"status": "accepted"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .post(&format!("/api/applications/{}/withdraw", id), ana.token(), json!({}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("accepted or rejected"));
    }

    #[tokio::test]
    #[serial]
    async fn test_acceptance_racing_withdrawal_is_never_overwritten() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let job = open_job(&app, &poster).await;

        for i in 0..20 {
            let seeker = UserFixture::seeker(&app, &format!("racer{}", i)).await.unwrap();
            let (_, created) = apply(&app, &seeker, job.id).await;
            let id = id_of(&created);
            let status_uri = format!("/api/applications/{}/status", id);
            let withdraw_uri = format!("/api/applications/{}/withdraw", id);

            let ((accepted, _), (withdrawn, _)) = tokio::join!(
                app.patch(&status_uri, poster.token(), json!({"status": "accepted"})),
                app.post(&withdraw_uri, seeker.token(), json!({})),
            );
            assert_eq!(accepted, StatusCode::OK);
            assert!(withdrawn == StatusCode::OK || withdrawn == StatusCode::BAD_REQUEST);

            // Either the withdrawal ran first and was then reviewed, or it was refused
            let (_, detail) = app
                .get(&format!("/api/applications/{}", id), poster.token())
                .await;
            assert_eq!(detail["status"], "accepted", "application {} lost its acceptance", i);
        }
    }
}

mod test_scoping {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_each_role_sees_its_own_slice() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let rival = UserFixture::employer(&app, "rival").await.unwrap();
        let admin = UserFixture::admin(&app).await.unwrap();
        let ana = UserFixture::seeker(&app, "ana").await.unwrap();
        let bob = UserFixture::seeker(&app, "bob").await.unwrap();

        let job = open_job(&app, &poster).await;
        let globex = app.create_company("Globex", Some(rival.id())).await.unwrap();
        let rival_job = app
            .create_job("Designer", globex.id, Some(rival.id()), |_| {})
            .await
            .unwrap();

        let (_, ana_app) = apply(&app, &ana, job.id).await;
        apply(&app, &bob, job.id).await;
        apply(&app, &bob, rival_job.id).await;

        let (status, list) = app.get("/api/applications", poster.token()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["count"], 2);

        let (_, searched) = app.get("/api/applications?search=ana", poster.token()).await;
        assert_eq!(searched["count"], 1);
        assert_eq!(searched["results"][0]["applicant_name"], "ana Tester");

        let (_, all) = app.get("/api/applications", admin.token()).await;
        assert_eq!(all["count"], 3);

        let (status, seeker_list) = app.get("/api/applications", ana.token()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(seeker_list["count"], 0);

        let (_, mine) = app.get("/api/applications/my-applications", bob.token()).await;
        assert_eq!(mine["count"], 2);
        assert!(mine["results"][0].get("admin_notes").is_none());

        let (_, stats) = app.get("/api/applications/stats", rival.token()).await;
        assert_eq!(stats["total_applications"], 1);
        assert_eq!(stats["pending"], 1);

        let (_, admin_stats) = app.get("/api/applications/stats", admin.token()).await;
        assert_eq!(admin_stats["total_applications"], 3);

        let detail = format!("/api/applications/{}", id_of(&ana_app));
        let (status, _) = app.get(&detail, poster.token()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.get(&detail, ana.token()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.get(&detail, rival.token()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.get(&detail, bob.token()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn test_status_updates_limited_to_job_poster_and_admin() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let rival = UserFixture::employer(&app, "rival").await.unwrap();
        let admin = UserFixture::admin(&app).await.unwrap();
        let ana = UserFixture::seeker(&app, "ana").await.unwrap();
        let job = open_job(&app, &poster).await;

        let (_, created) = apply(&app, &ana, job.id).await;
        let uri = format!("/api/applications/{}/status", id_of(&created));

        let (status, _) = app.patch(&uri, rival.token(), json!({"status": "rejected"})).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app.patch(&uri, ana.token(), json!({"status": "accepted"})).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .patch(
                &uri,
                admin.token(),
                json!({"status": "rejected", "rejection_reason": "Position filled"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rejection_reason"], "Position filled");
    }
}

mod test_delete {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_admin_deletes_and_counter_follows() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let admin = UserFixture::admin(&app).await.unwrap();
        let ana = UserFixture::seeker(&app, "ana").await.unwrap();
        let job = open_job(&app, &poster).await;

        let (_, created) = apply(&app, &ana, job.id).await;
        let uri = format!("/api/applications/{}", id_of(&created));
        assert_eq!(app.applications_count(job.id).await.unwrap(), 1);

        let (status, _) = app.delete(&uri, poster.token()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.delete(&uri, admin.token()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(app.applications_count(job.id).await.unwrap(), 0);

        let (status, _) = app.delete(&uri, admin.token()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // applying again after deletion is allowed
        let (status, _) = apply(&app, &ana, job.id).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}
