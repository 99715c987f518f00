//! Shared test helpers for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use quill_api::{AppState, build_app};
use quill_core::config::{AppConfig, Argon2Config, DatabaseConfig, StoreProvider};
use quill_core::error::{AppError, AppResult};
use quill_core::traits::{ImageHost, ImageUpload, StoredImage};
use quill_database::{AccountStore, MemoryAccountStore};
use quill_entity::account::{Account, NewAccount};

pub const BOUNDARY: &str = "quill-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Account store behind the router
    pub store: MemoryAccountStore,
    /// Application config
    pub config: AppConfig,
    /// Image directory, removed when the app is dropped
    pub images: TempDir,
}

/// Captured response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// Body parsed as JSON; `Null` when it is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }

    /// Every `Set-Cookie` header value.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// `name=value` of the session cookie, ready for a `Cookie` header.
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookies()
            .into_iter()
            .find(|c| c.starts_with("token="))
            .and_then(|c| c.split(';').next().map(str::to_string))
    }
}

/// Image host that accepts everything without a network.
#[derive(Debug)]
pub struct StubImageHost;

#[async_trait]
impl ImageHost for StubImageHost {
    fn provider_type(&self) -> &str {
        "stub"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn store(&self, upload: ImageUpload) -> AppResult<StoredImage> {
        Ok(StoredImage {
            url: format!("https://cdn.test/{}", upload.file_name),
        })
    }
}

/// Account store whose backend is always unreachable.
#[derive(Debug)]
pub struct UnreachableStore;

#[async_trait]
impl AccountStore for UnreachableStore {
    fn provider(&self) -> StoreProvider {
        StoreProvider::Postgres
    }

    async fn find_by_email(&self, _email: &str) -> AppResult<Option<Account>> {
        Err(AppError::database("connection refused"))
    }

    async fn insert(&self, _account: NewAccount) -> AppResult<Account> {
        Err(AppError::database("connection refused"))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Err(AppError::database("connection refused"))
    }
}

/// Config for tests: in-memory store, cheap hashing, images under `images`.
pub fn test_config(images: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.database = DatabaseConfig::in_memory();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.auth.argon2 = Argon2Config {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
    config.storage.images_dir = images.path().to_string_lossy().into_owned();
    config
}

impl TestApp {
    /// App over an in-memory store with cheap hashing and no cloud credentials.
    pub async fn new() -> Self {
        Self::build(None).await
    }

    /// Same as [`TestApp::new`] but cloud uploads go to `host`.
    pub async fn with_cloud(host: Arc<dyn ImageHost>) -> Self {
        Self::build(Some(host)).await
    }

    async fn build(cloud: Option<Arc<dyn ImageHost>>) -> Self {
        let images = tempfile::tempdir().expect("temp image dir");

        let config = test_config(&images);

        let store = MemoryAccountStore::new();
        let mut state = AppState::new(config.clone(), Arc::new(store.clone()))
            .await
            .expect("Failed to build app state");
        if let Some(host) = cloud {
            state = state.with_cloud_images(host);
        }

        Self {
            router: build_app(state),
            store,
            config,
            images,
        }
    }

    /// Send a request with an optional JSON body and cookie header.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    /// Send a `multipart/form-data` POST built with [`multipart_body`].
    pub async fn multipart(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Send a prepared request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        send(&self.router, request).await
    }


    /// Register an account through the API.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            })),
            None,
        )
        .await
    }

    /// Log in and return the response.
    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": email,
                "password": password,
            })),
            None,
        )
        .await
    }
}

/// Drive `router` with one request and capture the response.
pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec();

    TestResponse {
        status,
        headers,
        bytes,
    }
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text { name: &'a str, value: &'a str },
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

/// Encode `parts` as a `multipart/form-data` body delimited by [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
