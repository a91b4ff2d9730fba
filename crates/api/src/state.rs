//! Shared application state for the Axum API server.

use std::sync::Arc;

use jobboard_common::config::AppConfig;
use jobboard_common::queue::NotificationQueue;
use jobboard_store::documents::JobDocumentStore;
use jobboard_store::storage::ObjectStorage;
use sqlx::PgPool;

/// Application state shared across all route handlers via Axum `State`.
///
/// Every external client is built once in `main` and handed in here.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub queue: Arc<dyn NotificationQueue>,
    pub storage: Arc<dyn ObjectStorage>,
    pub documents: Arc<dyn JobDocumentStore>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        queue: Arc<dyn NotificationQueue>,
        storage: Arc<dyn ObjectStorage>,
        documents: Arc<dyn JobDocumentStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            pool,
            queue,
            storage,
            documents,
            config,
        }
    }
}
