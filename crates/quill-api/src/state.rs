//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use quill_auth::SessionManager;
use quill_core::config::AppConfig;
use quill_core::error::AppResult;
use quill_core::traits::ImageHost;
use quill_database::AccountStore;
use quill_storage::{CloudinaryImageHost, LocalImageStore, UploadPolicy};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Account store (PostgreSQL or in-memory)
    pub store: Arc<dyn AccountStore>,
    /// Register / login / logout / refetch flow
    pub sessions: Arc<SessionManager>,
    /// Disk image store behind `/api/upload`
    pub local_images: Arc<dyn ImageHost>,
    /// Cloud image host behind `/api/cloud-upload`
    pub cloud_images: Arc<dyn ImageHost>,
    /// Limits checked before a cloud upload
    pub upload_policy: Arc<UploadPolicy>,
}

impl AppState {
    /// Wire the state around an already connected store.
    pub async fn new(config: AppConfig, store: Arc<dyn AccountStore>) -> AppResult<Self> {
        let sessions = SessionManager::new(Arc::clone(&store), &config.auth)?;
        let local_images = LocalImageStore::new(&config.storage.images_dir).await?;
        let cloud_images = CloudinaryImageHost::new(&config.storage.cloud)?;
        let upload_policy = UploadPolicy::from(&config.storage.cloud);

        Ok(Self {
            config: Arc::new(config),
            store,
            sessions: Arc::new(sessions),
            local_images: Arc::new(local_images),
            cloud_images: Arc::new(cloud_images),
            upload_policy: Arc::new(upload_policy),
        })
    }

    /// Swap the cloud host, e.g. for a stub in tests.
    pub fn with_cloud_images(mut self, host: Arc<dyn ImageHost>) -> Self {
        self.cloud_images = host;
        self
    }

    /// Name of the session cookie.
    pub fn cookie_name(&self) -> &str {
        &self.config.auth.cookie_name
    }
}
