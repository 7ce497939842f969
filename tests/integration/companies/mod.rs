//! Company endpoint integration tests
//!
//! - GET|POST /api/companies
//! - GET|PATCH|DELETE /api/companies/{slug}
//! - POST /api/companies/{slug}/logo

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use serial_test::serial;

use crate::common::{error_code, error_message, TestApp, UserFixture};

const BOUNDARY: &str = "jobboard-test-boundary";

fn logo_upload(slug: &str, token: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"logo\"; filename=\"logo\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(format!("/api/companies/{}/logo", slug))
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

mod test_create_company {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_employer_creates_company_with_unique_slug() {
        let app = TestApp::new().await.unwrap();
        let employer = UserFixture::employer(&app, "emp").await.unwrap();

        let (status, first) = app
            .post(
                "/api/companies",
                employer.token(),
                json!({"name": "Acme Corp", "size": "11-50", "industry": "Software"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["slug"], "acme-corp");
        assert_eq!(first["size"], "11-50");
        assert_eq!(first["created_by"], employer.id().to_string());
        assert_eq!(first["job_count"], 0);

        let (status, second) = app
            .post("/api/companies", employer.token(), json!({"name": "Acme  Corp!"}))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(second["slug"], "acme-corp-2");
    }

    #[tokio::test]
    #[serial]
    async fn test_job_seeker_cannot_create_company() {
        let app = TestApp::new().await.unwrap();
        let seeker = UserFixture::seeker(&app, "seeker").await.unwrap();

        let (status, body) = app
            .post("/api/companies", seeker.token(), json!({"name": "Nope Inc"}))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "AUTHORIZATION_ERROR");
    }

    #[tokio::test]
    #[serial]
    async fn test_invalid_founded_year_rejected() {
        let app = TestApp::new().await.unwrap();
        let employer = UserFixture::employer(&app, "emp").await.unwrap();

        let (status, _) = app
            .post(
                "/api/companies",
                employer.token(),
                json!({"name": "Old Co", "founded_year": 1700}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

mod test_list_companies {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_filters_search_and_job_count() {
        let app = TestApp::new().await.unwrap();
        let acme = app.create_company("Acme", None).await.unwrap();
        app.create_company("Globex", None).await.unwrap();
        sqlx::query("UPDATE companies SET is_verified = TRUE, industry = 'Robotics' WHERE id = $1")
            .bind(acme.id)
            .execute(&app.pool)
            .await
            .unwrap();

        app.create_job("Active Role", acme.id, None, |_| {}).await.unwrap();
        app.create_job("Inactive Role", acme.id, None, |j| j.is_active = false)
            .await
            .unwrap();

        let (status, page) = app.get("/api/companies", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["count"], 2);
        assert_eq!(page["page_size"], 20);
        assert_eq!(page["results"][0]["name"], "Acme");
        assert_eq!(page["results"][0]["job_count"], 1);

        let (_, verified) = app.get("/api/companies?is_verified=true", None).await;
        assert_eq!(verified["count"], 1);

        let (_, searched) = app.get("/api/companies?search=robot", None).await;
        assert_eq!(searched["count"], 1);
        assert_eq!(searched["results"][0]["slug"], "acme");

        let (_, ordered) = app.get("/api/companies?ordering=-name", None).await;
        assert_eq!(ordered["results"][0]["name"], "Globex");

        let (status, _) = app.get("/api/companies?ordering=secret", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, empty) = app.get("/api/companies?page=9", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(empty["results"].as_array().unwrap().len(), 0);
    }
}

mod test_update_company {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_only_owner_or_admin_updates() {
        let app = TestApp::new().await.unwrap();
        let owner = UserFixture::employer(&app, "owner").await.unwrap();
        let other = UserFixture::employer(&app, "other").await.unwrap();
        let admin = UserFixture::admin(&app).await.unwrap();
        app.create_company("Acme", Some(owner.id())).await.unwrap();

        let (status, _) = app
            .patch("/api/companies/acme", other.token(), json!({"location": "Mars"}))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .patch("/api/companies/acme", owner.token(), json!({"name": "Acme Labs"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "acme-labs");

        let (status, _) = app
            .patch("/api/companies/acme-labs", owner.token(), json!({"is_verified": true}))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .patch("/api/companies/acme-labs", admin.token(), json!({"is_verified": true}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_verified"], true);
    }

    #[tokio::test]
    #[serial]
    async fn test_only_admin_deletes() {
        let app = TestApp::new().await.unwrap();
        let owner = UserFixture::employer(&app, "owner").await.unwrap();
        let admin = UserFixture::admin(&app).await.unwrap();
        app.create_company("Acme", Some(owner.id())).await.unwrap();

        let (status, _) = app.delete("/api/companies/acme", owner.token()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.delete("/api/companies/acme", admin.token()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.get("/api/companies/acme", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod test_logo_upload {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_upload_replaces_external_logo_url() {
        let app = TestApp::new().await.unwrap();
        let owner = UserFixture::employer(&app, "owner").await.unwrap();
        app.create_company("Acme", Some(owner.id())).await.unwrap();
        app.patch(
            "/api/companies/acme",
            owner.token(),
            json!({"logo_url": "https://cdn.example.com/acme.png"}),
        )
        .await;

        let png = b"\x89PNG\r\n\x1a\nfake-image";
        let (status, body) = app
            .send(logo_upload("acme", &owner.token, "image/png", png))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["logo_url"], "/media/company_logos/acme.png");
        assert_eq!(
            app.logos.get("company_logos/acme.png").as_deref(),
            Some(&png[..])
        );

        let jpeg = b"\xff\xd8\xff\xe0jfif-bytes";
        let (status, body) = app
            .send(logo_upload("acme", &owner.token, "image/jpeg", jpeg))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["logo_url"], "/media/company_logos/acme.jpg");
        // the replaced png is gone once the row points at the jpg
        assert_eq!(app.logos.keys(), vec!["company_logos/acme.jpg".to_string()]);
    }

    #[tokio::test]
    #[serial]
    async fn test_upload_rejects_bad_files_and_strangers() {
        let app = TestApp::new().await.unwrap();
        let owner = UserFixture::employer(&app, "owner").await.unwrap();
        let other = UserFixture::employer(&app, "other").await.unwrap();
        app.create_company("Acme", Some(owner.id())).await.unwrap();

        let (status, _) = app
            .send(logo_upload("acme", &owner.token, "application/pdf", b"%PDF"))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send(logo_upload("acme", &owner.token, "image/png", b"<html>not a png</html>"))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("does not match"));

        let (status, _) = app
            .send(logo_upload("acme", &other.token, "image/png", b"png"))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(app.logos.keys().is_empty());
    }
}
