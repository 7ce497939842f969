//! Cross-domain consistency checks

use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;

use crate::common::{TestApp, UserFixture};

#[tokio::test]
#[serial]
async fn test_deleting_job_removes_its_applications() {
    let app = TestApp::new().await.unwrap();
    let poster = UserFixture::employer(&app, "poster").await.unwrap();
    let ana = UserFixture::seeker(&app, "ana").await.unwrap();
    let acme = app.create_company("Acme", Some(poster.id())).await.unwrap();
    let job = app
        .create_job("Backend Engineer", acme.id, Some(poster.id()), |_| {})
        .await
        .unwrap();

    let (status, _) = app
        .post("/api/applications/apply", ana.token(), json!({"job": job.id}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, before) = app.get("/api/companies/acme", None).await;
    assert_eq!(before["job_count"], 1);

    let (status, _) = app.delete("/api/jobs/backend-engineer", poster.token()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    let (_, mine) = app.get("/api/applications/my-applications", ana.token()).await;
    assert_eq!(mine["count"], 0);

    let (_, after) = app.get("/api/companies/acme", None).await;
    assert_eq!(after["job_count"], 0);
}

#[tokio::test]
#[serial]
async fn test_counter_matches_rows_after_mixed_operations() {
    let app = TestApp::new().await.unwrap();
    let admin = UserFixture::admin(&app).await.unwrap();
    let acme = app.create_company("Acme", None).await.unwrap();
    let job = app
        .create_job("Backend Engineer", acme.id, None, |_| {})
        .await
        .unwrap();

    let mut ids = Vec::new();
    for name in ["ana", "bob", "cid"] {
        let seeker = UserFixture::seeker(&app, name).await.unwrap();
        let (_, body) = app
            .post("/api/applications/apply", seeker.token(), json!({"job": job.id}))
            .await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }
    let (status, _) = app
        .delete(&format!("/api/applications/{}", ids[1]), admin.token())
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE job_id = $1")
        .bind(job.id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(rows, 2);
    assert_eq!(app.applications_count(job.id).await.unwrap(), 2);
}
