//! Integration tests for the register / login / logout / refetch flow and
//! the surrounding HTTP surface.

use std::sync::Arc;

use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};

use quill_api::{AppState, build_app};

use crate::helpers::{TestApp, UnreachableStore, send, test_config};

fn assert_no_secrets(body: &Value) {
    let text = body.to_string();
    assert!(!text.contains("password"), "leaked password field: {text}");
    assert!(!text.contains("$argon2"), "leaked hash: {text}");
}

#[tokio::test]
async fn register_returns_profile_without_password() {
    let app = TestApp::new().await;

    let response = app.register("alice", "alice@x.com", "secret1").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@x.com");
    assert!(body["id"].is_string());
    assert_no_secrets(&body);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn register_duplicate_email_or_username_conflicts() {
    let app = TestApp::new().await;
    app.register("alice", "alice@x.com", "secret1").await;

    let same_email = app.register("alice2", "alice@x.com", "other").await;
    assert_eq!(same_email.status, StatusCode::CONFLICT);
    assert_eq!(same_email.json()["error"], "CONFLICT");

    let same_name = app.register("alice", "someone@x.com", "other").await;
    assert_eq!(same_name.status, StatusCode::CONFLICT);

    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn register_with_missing_fields_is_rejected_before_the_store() {
    let app = TestApp::new().await;

    for body in [
        json!({ "email": "a@x.com", "password": "pw" }),
        json!({ "username": "a", "password": "pw" }),
        json!({ "username": "a", "email": "a@x.com" }),
        json!({ "username": "", "email": "a@x.com", "password": "pw" }),
    ] {
        let response = app
            .request("POST", "/api/auth/register", Some(body.clone()), None)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(response.json()["error"], "VALIDATION_ERROR");
    }

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn login_sets_session_cookie_and_returns_profile() {
    let app = TestApp::new().await;
    app.register("alice", "alice@x.com", "secret1").await;

    let response = app.login("alice@x.com", "secret1").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["username"], "alice");
    assert_no_secrets(&body);

    let cookies = response.set_cookies();
    let session = cookies
        .iter()
        .find(|c| c.starts_with(&format!("{}=", app.config.auth.cookie_name)))
        .expect("session cookie");
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("Path=/"));
    assert!(session.contains("Max-Age=259200"));
}

#[tokio::test]
async fn login_unknown_email_is_404() {
    let app = TestApp::new().await;

    let response = app.login("ghost@x.com", "secret1").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["message"], "User not found!");
    assert!(response.session_cookie().is_none());
}

#[tokio::test]
async fn login_wrong_password_is_401() {
    let app = TestApp::new().await;
    app.register("alice", "alice@x.com", "secret1").await;

    let response = app.login("alice@x.com", "nope").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["message"], "Wrong credentials!");
    assert!(response.session_cookie().is_none());
}

#[tokio::test]
async fn login_email_is_case_insensitive() {
    let app = TestApp::new().await;
    app.register("alice", "Alice@X.com", "secret1").await;

    let response = app.login("alice@x.com", "secret1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["email"], "alice@x.com");
}

#[tokio::test]
async fn refetch_returns_claims_from_the_cookie() -> anyhow::Result<()> {
    let app = TestApp::new().await;
    let registered = app.register("alice", "alice@x.com", "secret1").await.json();
    let cookie = app
        .login("alice@x.com", "secret1")
        .await
        .session_cookie()
        .ok_or_else(|| anyhow::anyhow!("no session cookie"))?;

    let response = app
        .request("GET", "/api/auth/refetch", None, Some(&cookie))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let claims = response.json();
    assert_eq!(claims["id"], registered["id"]);
    assert_eq!(claims["username"], "alice");
    assert_eq!(claims["email"], "alice@x.com");
    let iat = claims["iat"].as_i64().unwrap_or_default();
    let exp = claims["exp"].as_i64().unwrap_or_default();
    assert_eq!(exp - iat, 72 * 3600);
    Ok(())
}

#[tokio::test]
async fn refetch_without_usable_cookie_is_404() {
    let app = TestApp::new().await;

    for cookie in [None, Some("token="), Some("token=not-a-jwt"), Some("other=1")] {
        let response = app.request("GET", "/api/auth/refetch", None, cookie).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "cookie {cookie:?}");
        assert_eq!(response.json()["error"], "UNAUTHENTICATED");
    }
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/auth/logout", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], "User logged out successfully!");

    let cookies = response.set_cookies();
    let removal = cookies
        .iter()
        .find(|c| c.starts_with("token="))
        .expect("removal cookie");
    assert!(removal.starts_with("token=;"));
    assert!(removal.contains("Max-Age=0"));
    assert!(removal.contains("SameSite=None"));
    assert!(removal.contains("Secure"));
}

#[tokio::test]
async fn copied_token_stays_valid_after_logout() -> anyhow::Result<()> {
    let app = TestApp::new().await;
    app.register("alice", "alice@x.com", "secret1").await;
    let cookie = app
        .login("alice@x.com", "secret1")
        .await
        .session_cookie()
        .ok_or_else(|| anyhow::anyhow!("no session cookie"))?;

    let logout = app
        .request("GET", "/api/auth/logout", None, Some(&cookie))
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    // Without the cookie the client is logged out...
    let fresh = app.request("GET", "/api/auth/refetch", None, None).await;
    assert_eq!(fresh.status, StatusCode::NOT_FOUND);

    // ...but the token itself is still good until it expires.
    let replay = app
        .request("GET", "/api/auth/refetch", None, Some(&cookie))
        .await;
    assert_eq!(replay.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn health_reports_memory_store() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["cloud_images"], false);
}

#[tokio::test]
async fn health_degrades_when_the_store_is_unreachable() {
    let images = tempfile::tempdir().expect("temp image dir");
    let state = AppState::new(test_config(&images), Arc::new(UnreachableStore))
        .await
        .expect("Failed to build app state");
    let router = build_app(state);

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .expect("request");
    let response = send(&router, request).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store_healthy"], false);
}

#[tokio::test]
async fn preflight_allows_only_routed_methods() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/auth/login")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .expect("request");
    let response = app.send(request).await;

    let methods = response
        .headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(methods.contains("GET") && methods.contains("POST"), "{methods}");
    assert!(!methods.contains("PUT"), "{methods}");
    assert!(!methods.contains("DELETE"), "{methods}");
}
