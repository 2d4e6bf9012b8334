//! Authentication API integration tests
//!
//! End-to-end tests for registration, credential sign-in, and the
//! session-gated current-user endpoint, plus decision-level tests for
//! the credential verifier and the OAuth reconciler. These run against a
//! migration-applied Postgres database (`DATABASE_URL` or the local test
//! default); emails are unique per test so the suite can run in parallel.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use sqlx::PgPool;

use gatehouse::auth::decision::{decide, verify_credentials, Decision, DenyReason, SignInAttempt};
use gatehouse::auth::oauth::{OAuthRegistry, PendingAuthorizations};
use gatehouse::auth::users::get_user_by_email;
use gatehouse::routes::create_router;
use gatehouse::server::state::AppState;

use common::auth_helpers::{create_oauth_only_user, create_test_user, unique_email};
use common::database::TestDatabase;

fn test_state(pool: PgPool) -> AppState {
    AppState {
        db_pool: Some(pool),
        oauth: Arc::new(OAuthRegistry::new("http://localhost:3000")),
        pending_authorizations: PendingAuthorizations::new(),
        http: reqwest::Client::new(),
    }
}

async fn create_test_server(pool: PgPool) -> TestServer {
    TestServer::new(create_router(test_state(pool))).unwrap()
}

#[tokio::test]
async fn test_register_success() {
    let db = TestDatabase::new().await;
    let server = create_test_server(db.pool().clone()).await;
    let email = unique_email("register");

    let response = server
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["email"], email.as_str());
    assert!(body.get("id").is_some());
    // The hash never crosses the HTTP boundary
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let db = TestDatabase::new().await;
    let server = create_test_server(db.pool().clone()).await;
    let email = unique_email("duplicate");

    let request = serde_json::json!({
        "email": email,
        "password": "password123"
    });

    let first = server.post("/api/auth/register").json(&request).await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = server.post("/api/auth/register").json(&request).await;
    assert_eq!(second.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let db = TestDatabase::new().await;
    let server = create_test_server(db.pool().clone()).await;

    let response = server
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": "not-an-email",
            "password": "longenough1"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_short_password() {
    let db = TestDatabase::new().await;
    let server = create_test_server(db.pool().clone()).await;

    let response = server
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": "a@b.com",
            "password": "short"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let db = TestDatabase::new().await;
    let server = create_test_server(db.pool().clone()).await;
    let email = unique_email("login");

    create_test_user(db.pool(), &email, "password123")
        .await
        .unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], email.as_str());
}

#[tokio::test]
async fn test_login_incorrect_password() {
    let db = TestDatabase::new().await;
    let server = create_test_server(db.pool().clone()).await;
    let email = unique_email("wrongpw");

    create_test_user(db.pool(), &email, "password123")
        .await
        .unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": email,
            "password": "wrongpassword"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let db = TestDatabase::new().await;
    let server = create_test_server(db.pool().clone()).await;

    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": unique_email("nonexistent"),
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_oauth_only_account_is_denied() {
    let db = TestDatabase::new().await;
    let server = create_test_server(db.pool().clone()).await;
    let email = unique_email("passwordless");

    // Provisioned by a third-party sign-in: no password hash
    create_oauth_only_user(db.pool(), &email).await.unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_me_with_valid_token() {
    let db = TestDatabase::new().await;
    let server = create_test_server(db.pool().clone()).await;
    let email = unique_email("me");

    let user = create_test_user(db.pool(), &email, "password123")
        .await
        .unwrap();

    let response = server
        .get("/api/auth/me")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", user.token)).unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["email"], email.as_str());
}

#[tokio::test]
async fn test_get_me_without_token() {
    let db = TestDatabase::new().await;
    let server = create_test_server(db.pool().clone()).await;

    let response = server.get("/api/auth/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_me_with_invalid_token() {
    let db = TestDatabase::new().await;
    let server = create_test_server(db.pool().clone()).await;

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer invalid.token.here"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// Decision-level tests: the contracts of the credential verifier and the
// OAuth reconciler, independent of the HTTP layer.

#[tokio::test]
async fn test_verify_credentials_outcomes() {
    let db = TestDatabase::new().await;
    let email = unique_email("verify");

    create_test_user(db.pool(), &email, "password123")
        .await
        .unwrap();

    let decision = verify_credentials(db.pool(), &email, "password123").await;
    assert_matches!(decision, Decision::Allow(user) if user.email == email);

    let decision = verify_credentials(db.pool(), &email, "not-the-password").await;
    assert_matches!(decision, Decision::Deny(DenyReason::IncorrectPassword));

    let decision = verify_credentials(db.pool(), &unique_email("ghost"), "password123").await;
    assert_matches!(decision, Decision::Deny(DenyReason::UnknownUser));
}

#[tokio::test]
async fn test_verify_credentials_against_passwordless_account() {
    let db = TestDatabase::new().await;
    let email = unique_email("nohash");

    create_oauth_only_user(db.pool(), &email).await.unwrap();

    let decision = verify_credentials(db.pool(), &email, "anything-at-all").await;
    assert_matches!(decision, Decision::Deny(DenyReason::NoPasswordSet));
}

#[tokio::test]
async fn test_oauth_sign_in_creates_passwordless_user() {
    let db = TestDatabase::new().await;
    let email = unique_email("firstoauth");

    let attempt = SignInAttempt::GitHub {
        email: email.clone(),
    };
    let decision = decide(db.pool(), attempt).await;
    assert_matches!(decision, Decision::Allow(_));

    let user = get_user_by_email(db.pool(), &email).await.unwrap().unwrap();
    assert!(user.password_hash.is_none());
}

#[tokio::test]
async fn test_oauth_sign_in_existing_user_not_duplicated() {
    let db = TestDatabase::new().await;
    let email = unique_email("repeatoauth");

    let first = decide(
        db.pool(),
        SignInAttempt::Google {
            email: email.clone(),
        },
    )
    .await;
    assert_matches!(first, Decision::Allow(_));

    let second = decide(
        db.pool(),
        SignInAttempt::Google {
            email: email.clone(),
        },
    )
    .await;
    assert_matches!(second, Decision::Allow(_));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_oauth_sign_in_reuses_credential_account() {
    let db = TestDatabase::new().await;
    let email = unique_email("linked");

    create_test_user(db.pool(), &email, "password123")
        .await
        .unwrap();

    let decision = decide(
        db.pool(),
        SignInAttempt::GitHub {
            email: email.clone(),
        },
    )
    .await;
    assert_matches!(decision, Decision::Allow(user) if user.password_hash.is_some());
}
