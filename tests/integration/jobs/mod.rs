//! Job and category endpoint integration tests
//!
//! - GET|POST /api/jobs, GET /api/jobs/{featured,recent,stats}
//! - GET|PATCH|DELETE /api/jobs/{slug}
//! - GET|POST /api/jobs/categories

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use jobboard_jobs::JobStatus;
use rust_decimal::Decimal;
use serde_json::json;
use serial_test::serial;

use crate::common::{error_message, TestApp, UserFixture};

mod test_create_job {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_employer_posts_job() {
        let app = TestApp::new().await.unwrap();
        let employer = UserFixture::employer(&app, "emp").await.unwrap();
        let acme = app.create_company("Acme", Some(employer.id())).await.unwrap();

        let (status, job) = app
            .post(
                "/api/jobs",
                employer.token(),
                json!({
                    "title": "Backend Engineer",
                    "description": "Build APIs",
                    "company": acme.id,
                    "location": "Berlin",
                    "job_type": "full_time",
                    "salary_min": "70000",
                    "salary_max": "90000",
                    "skills_required": "Rust, PostgreSQL"
                }),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(job["slug"], "backend-engineer");
        assert_eq!(job["company"]["slug"], "acme");
        assert_eq!(job["skills_list"], json!(["Rust", "PostgreSQL"]));
        assert_eq!(job["posted_by"], employer.id().to_string());
        assert_eq!(job["applications_count"], 0);
        assert_eq!(job["status"], "active");
    }

    #[tokio::test]
    #[serial]
    async fn test_create_rejects_seekers_and_bad_input() {
        let app = TestApp::new().await.unwrap();
        let seeker = UserFixture::seeker(&app, "seeker").await.unwrap();
        let employer = UserFixture::employer(&app, "emp").await.unwrap();
        let acme = app.create_company("Acme", None).await.unwrap();
        let body = json!({"title": "Dev", "description": "Code", "company": acme.id});

        let (status, _) = app.post("/api/jobs", seeker.token(), body.clone()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .post(
                "/api/jobs",
                employer.token(),
                json!({"title": "Dev", "description": "Code", "company": uuid::Uuid::new_v4()}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .post(
                "/api/jobs",
                employer.token(),
                json!({
                    "title": "Dev",
                    "description": "Code",
                    "company": acme.id,
                    "salary_min": "90000",
                    "salary_max": "10000"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .post(
                "/api/jobs",
                employer.token(),
                json!({
                    "title": "Dev",
                    "description": "Code",
                    "company": acme.id,
                    "salary_max": "100000000000"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("salary_max"));
    }

    #[tokio::test]
    #[serial]
    async fn test_reserved_titles_get_suffixed_slugs() {
        let app = TestApp::new().await.unwrap();
        let employer = UserFixture::employer(&app, "emp").await.unwrap();
        let acme = app.create_company("Acme", None).await.unwrap();

        let (status, job) = app
            .post(
                "/api/jobs",
                employer.token(),
                json!({"title": "Featured", "description": "x", "company": acme.id}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(job["slug"], "featured-2");
    }
}

mod test_list_jobs {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_only_visible_jobs_listed_with_filters() {
        let app = TestApp::new().await.unwrap();
        let acme = app.create_company("Acme", None).await.unwrap();
        let globex = app.create_company("Globex", None).await.unwrap();

        app.create_job("Rust Engineer", acme.id, None, |j| {
            j.location = "Berlin".into();
            j.salary_min = Some(Decimal::new(80_000, 0));
            j.skills_required = "Rust, Tokio".into();
        })
        .await
        .unwrap();
        app.create_job("Designer", globex.id, None, |j| {
            j.location = "Remote".into();
            j.is_remote = true;
            j.is_featured = true;
            j.salary_min = Some(Decimal::new(50_000, 0));
        })
        .await
        .unwrap();
        app.create_job("Draft Role", acme.id, None, |j| j.status = JobStatus::Draft)
            .await
            .unwrap();
        app.create_job("Hidden Role", acme.id, None, |j| j.is_active = false)
            .await
            .unwrap();

        let (status, page) = app.get("/api/jobs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["count"], 2);
        // featured first by default
        assert_eq!(page["results"][0]["title"], "Designer");

        let (_, berlin) = app.get("/api/jobs?location=berl", None).await;
        assert_eq!(berlin["count"], 1);
        assert_eq!(berlin["results"][0]["slug"], "rust-engineer");

        let (_, by_company) = app.get("/api/jobs?search=globex", None).await;
        assert_eq!(by_company["count"], 1);
        assert_eq!(by_company["results"][0]["title"], "Designer");

        let (_, by_skill) = app.get("/api/jobs?skills=tokio", None).await;
        assert_eq!(by_skill["count"], 1);

        // LIKE wildcards in user text are matched literally
        let (_, percent) = app.get("/api/jobs?search=%25", None).await;
        assert_eq!(percent["count"], 0);
        let (_, underscore) = app.get("/api/jobs?location=_", None).await;
        assert_eq!(underscore["count"], 0);

        let (_, by_salary) = app.get("/api/jobs?salary_min=60000", None).await;
        assert_eq!(by_salary["count"], 1);
        assert_eq!(by_salary["results"][0]["title"], "Rust Engineer");

        let (_, remote) = app.get("/api/jobs?is_remote=true", None).await;
        assert_eq!(remote["count"], 1);

        let (_, by_title) = app.get("/api/jobs?ordering=title", None).await;
        assert_eq!(by_title["results"][0]["title"], "Designer");
        assert_eq!(by_title["results"][1]["title"], "Rust Engineer");

        let (status, _) = app.get("/api/jobs?ordering=password", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, empty_ordering) = app.get("/api/jobs?ordering=,", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(empty_ordering["count"], 2);

        let (status, far_page) = app.get("/api/jobs?page=9223372036854775807", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(far_page["count"], 2);
        assert_eq!(far_page["results"], json!([]));
    }

    #[tokio::test]
    #[serial]
    async fn test_featured_recent_and_stats() {
        let app = TestApp::new().await.unwrap();
        let acme = app.create_company("Acme", None).await.unwrap();
        sqlx::query("UPDATE companies SET is_verified = TRUE WHERE id = $1")
            .bind(acme.id)
            .execute(&app.pool)
            .await
            .unwrap();

        app.create_job("Featured Remote", acme.id, None, |j| {
            j.is_featured = true;
            j.is_remote = true;
        })
        .await
        .unwrap();
        app.create_job("Plain", acme.id, None, |_| {}).await.unwrap();
        app.create_job("Paused", acme.id, None, |j| {
            j.status = JobStatus::Paused;
            j.is_featured = true;
        })
        .await
        .unwrap();

        let (_, featured) = app.get("/api/jobs/featured", None).await;
        assert_eq!(featured.as_array().unwrap().len(), 1);
        assert_eq!(featured[0]["title"], "Featured Remote");

        let (_, recent) = app.get("/api/jobs/recent", None).await;
        assert_eq!(recent.as_array().unwrap().len(), 2);

        let (status, stats) = app.get("/api/jobs/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_jobs"], 2);
        assert_eq!(stats["total_companies"], 1);
        assert_eq!(stats["featured_jobs"], 1);
        assert_eq!(stats["remote_jobs"], 1);
    }
}

mod test_job_detail {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_detail_counts_views() {
        let app = TestApp::new().await.unwrap();
        let acme = app.create_company("Acme", None).await.unwrap();
        app.create_job("Backend Engineer", acme.id, None, |j| {
            j.expires_at = Some(Utc::now() - Duration::days(1));
        })
        .await
        .unwrap();

        let (status, first) = app.get("/api/jobs/backend-engineer", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["views_count"], 1);
        assert_eq!(first["is_expired"], true);

        let (_, second) = app.get("/api/jobs/backend-engineer", None).await;
        assert_eq!(second["views_count"], 2);
    }

    #[tokio::test]
    #[serial]
    async fn test_hidden_job_visible_to_poster_and_admin_only() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let other = UserFixture::employer(&app, "other").await.unwrap();
        let admin = UserFixture::admin(&app).await.unwrap();
        let acme = app.create_company("Acme", None).await.unwrap();
        app.create_job("Secret Draft", acme.id, Some(poster.id()), |j| {
            j.status = JobStatus::Draft;
        })
        .await
        .unwrap();

        let (status, _) = app.get("/api/jobs/secret-draft", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.get("/api/jobs/secret-draft", other.token()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.get("/api/jobs/secret-draft", poster.token()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = app.get("/api/jobs/secret-draft", admin.token()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["posted_by_name"], "poster Tester");
    }
}

mod test_update_job {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_only_poster_or_admin_modifies() {
        let app = TestApp::new().await.unwrap();
        let poster = UserFixture::employer(&app, "poster").await.unwrap();
        let other = UserFixture::employer(&app, "other").await.unwrap();
        let admin = UserFixture::admin(&app).await.unwrap();
        let acme = app.create_company("Acme", None).await.unwrap();
        app.create_job("Backend Engineer", acme.id, Some(poster.id()), |_| {})
            .await
            .unwrap();

        let (status, _) = app
            .patch("/api/jobs/backend-engineer", other.token(), json!({"is_urgent": true}))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .patch(
                "/api/jobs/backend-engineer",
                poster.token(),
                json!({"title": "Senior Backend Engineer", "is_urgent": true}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "senior-backend-engineer");
        assert_eq!(body["is_urgent"], true);

        let (status, _) = app.delete("/api/jobs/senior-backend-engineer", other.token()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app.delete("/api/jobs/senior-backend-engineer", admin.token()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}

mod test_categories {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_admin_creates_and_public_lists() {
        let app = TestApp::new().await.unwrap();
        let admin = UserFixture::admin(&app).await.unwrap();
        let employer = UserFixture::employer(&app, "emp").await.unwrap();

        let (status, _) = app
            .post("/api/jobs/categories", employer.token(), json!({"name": "Engineering"}))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, category) = app
            .post(
                "/api/jobs/categories",
                admin.token(),
                json!({"name": "Engineering", "icon": "fa-code"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(category["slug"], "engineering");

        let (status, _) = app
            .post("/api/jobs/categories", admin.token(), json!({"name": "Engineering"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let acme = app.create_company("Acme", None).await.unwrap();
        let category_id: uuid::Uuid =
            serde_json::from_value(category["id"].clone()).unwrap();
        app.create_job("Dev", acme.id, None, |j| j.category_id = Some(category_id))
            .await
            .unwrap();

        let (status, list) = app.get("/api/jobs/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list[0]["name"], "Engineering");
        assert_eq!(list[0]["job_count"], 1);

        let (_, filtered) = app
            .get(&format!("/api/jobs?category={}", category_id), None)
            .await;
        assert_eq!(filtered["count"], 1);
        assert_eq!(filtered["results"][0]["category"]["slug"], "engineering");
    }
}
