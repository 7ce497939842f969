//! Authentication endpoint integration tests
//!
//! - POST /api/auth/register
//! - POST /api/auth/login
//! - POST /api/auth/logout
//! - POST /api/auth/token/refresh
//! - GET|PATCH /api/auth/profile
//! - POST /api/auth/change-password

use axum::http::StatusCode;
use serde_json::{json, Value};
use serial_test::serial;

use crate::common::{error_code, error_message, TestApp, UserFixture, TEST_PASSWORD};

fn register_body(username: &str, role: &str) -> Value {
    json!({
        "email": format!("{}@example.com", username),
        "username": username,
        "first_name": "Ana",
        "last_name": "Silva",
        "password": "s3cret-password",
        "password_confirm": "s3cret-password",
        "role": role,
    })
}

async fn login(app: &TestApp, email: &str, password: &str) -> (StatusCode, Value) {
    app.post(
        "/api/auth/login",
        None,
        json!({"email": email, "password": password}),
    )
    .await
}

mod test_register {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_register_employer_returns_user_and_tokens() {
        let app = TestApp::new().await.unwrap();

        let (status, body) = app
            .post("/api/auth/register", None, register_body("ana", "employer"))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["role"], "employer");
        assert_eq!(body["user"]["full_name"], "Ana Silva");
        assert!(body["user"].get("password_hash").is_none());
        assert!(body["tokens"]["access"].as_str().unwrap().contains('.'));
        assert!(body["tokens"]["refresh"].as_str().unwrap().contains('.'));
    }

    #[tokio::test]
    #[serial]
    async fn test_register_rejects_admin_role_and_mismatch() {
        let app = TestApp::new().await.unwrap();

        let (status, _) = app
            .post("/api/auth/register", None, register_body("mallory", "admin"))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut body = register_body("bob", "user");
        body["password_confirm"] = json!("something-else");
        let (status, body) = app.post("/api/auth/register", None, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("Passwords don't match"));
    }

    #[tokio::test]
    #[serial]
    async fn test_register_duplicate_email() {
        let app = TestApp::new().await.unwrap();

        let (status, _) = app
            .post("/api/auth/register", None, register_body("ana", "user"))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let mut again = register_body("ana2", "user");
        again["email"] = json!("ANA@example.com");
        let (status, body) = app.post("/api/auth/register", None, again).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }
}

mod test_login {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_login_success_and_failure() {
        let app = TestApp::new().await.unwrap();
        let seeker = UserFixture::seeker(&app, "sam").await.unwrap();

        let (status, _) = login(&app, &seeker.user.email, "wrong-password").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = login(&app, &seeker.user.email, TEST_PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");

        let access = body["tokens"]["access"].as_str().unwrap().to_string();
        let (status, profile) = app.get("/api/auth/profile", Some(&access)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["email"], seeker.user.email);
        assert!(!profile["last_login"].is_null());
    }

    #[tokio::test]
    #[serial]
    async fn test_inactive_user_cannot_log_in() {
        let app = TestApp::new().await.unwrap();
        let seeker = UserFixture::seeker(&app, "sleepy").await.unwrap();
        sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
            .bind(seeker.id())
            .execute(&app.pool)
            .await
            .unwrap();

        let (status, _) = login(&app, &seeker.user.email, TEST_PASSWORD).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app.get("/api/auth/profile", seeker.token()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

mod test_tokens {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_refresh_rotates_and_blacklists() {
        let app = TestApp::new().await.unwrap();
        let seeker = UserFixture::seeker(&app, "rot").await.unwrap();
        let (_, body) = login(&app, &seeker.user.email, TEST_PASSWORD).await;
        let first = body["tokens"]["refresh"].as_str().unwrap().to_string();

        let (status, rotated) = app
            .post("/api/auth/token/refresh", None, json!({"refresh": first}))
            .await;
        assert_eq!(status, StatusCode::OK);
        let second = rotated["refresh"].as_str().unwrap().to_string();
        assert_ne!(first, second);

        let (status, body) = app
            .post("/api/auth/token/refresh", None, json!({"refresh": first}))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(error_message(&body).contains("blacklisted"));

        let (status, _) = app
            .post("/api/auth/token/refresh", None, json!({"refresh": second}))
            .await;
        assert_eq!(status, StatusCode::OK);

        let replaced_by: Option<uuid::Uuid> = sqlx::query_scalar(
            "SELECT replaced_by FROM refresh_tokens WHERE user_id = $1 \
             ORDER BY issued_at ASC LIMIT 1",
        )
        .bind(seeker.id())
        .fetch_one(&app.pool)
        .await
        .unwrap();
        assert!(replaced_by.is_some());
    }

    #[tokio::test]
    #[serial]
    async fn test_logout_revokes_refresh_token() {
        let app = TestApp::new().await.unwrap();
        let seeker = UserFixture::seeker(&app, "bye").await.unwrap();
        let (_, body) = login(&app, &seeker.user.email, TEST_PASSWORD).await;
        let access = body["tokens"]["access"].as_str().unwrap().to_string();
        let refresh = body["tokens"]["refresh"].as_str().unwrap().to_string();

        let (status, _) = app
            .post("/api/auth/logout", Some(&access), json!({"refresh": refresh}))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .post("/api/auth/token/refresh", None, json!({"refresh": refresh}))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .post("/api/auth/logout", Some(&access), json!({"refresh": "garbage"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_access_token_cannot_refresh() {
        let app = TestApp::new().await.unwrap();
        let seeker = UserFixture::seeker(&app, "mix").await.unwrap();

        let (status, _) = app
            .post("/api/auth/token/refresh", None, json!({"refresh": seeker.token}))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

mod test_profile {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_update_profile() {
        let app = TestApp::new().await.unwrap();
        let seeker = UserFixture::seeker(&app, "pat").await.unwrap();

        let (status, body) = app
            .patch(
                "/api/auth/profile",
                seeker.token(),
                json!({"location": "Lisbon", "phone": "+351912345678"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"], "Lisbon");
        assert_eq!(body["phone"], "+351912345678");

        let (status, _) = app
            .patch("/api/auth/profile", seeker.token(), json!({"phone": "call me"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_change_password_revokes_refresh_tokens() {
        let app = TestApp::new().await.unwrap();
        let seeker = UserFixture::seeker(&app, "pwd").await.unwrap();
        let (_, body) = login(&app, &seeker.user.email, TEST_PASSWORD).await;
        let refresh = body["tokens"]["refresh"].as_str().unwrap().to_string();

        let (status, body) = app
            .post(
                "/api/auth/change-password",
                seeker.token(),
                json!({
                    "old_password": "not-the-password",
                    "new_password": "brand-new-password",
                    "new_password_confirm": "brand-new-password",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("Old password is incorrect"));

        let (status, _) = app
            .post(
                "/api/auth/change-password",
                seeker.token(),
                json!({
                    "old_password": TEST_PASSWORD,
                    "new_password": "brand-new-password",
                    "new_password_confirm": "brand-new-password",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .post("/api/auth/token/refresh", None, json!({"refresh": refresh}))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = login(&app, &seeker.user.email, "brand-new-password").await;
        assert_eq!(status, StatusCode::OK);
    }
}
