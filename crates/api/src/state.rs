use std::sync::Arc;
use std::time::Duration;

use ecoleta_core::image_store::ImageStore;

use crate::config::ServerConfig;
use crate::services::{Catalog, PointRegistry, SearchEngine};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ecoleta_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub catalog: Arc<Catalog>,
    pub registry: Arc<PointRegistry>,
    pub search: Arc<SearchEngine>,
}

impl AppState {
    /// Build the services around one pool and one image store.
    pub fn new(pool: ecoleta_db::DbPool, config: ServerConfig, images: Arc<dyn ImageStore>) -> Self {
        let storage_timeout = Duration::from_secs(config.storage_timeout_secs);

        Self {
            catalog: Arc::new(Catalog::new(pool.clone(), Arc::clone(&images), storage_timeout)),
            registry: Arc::new(PointRegistry::new(
                pool.clone(),
                Arc::clone(&images),
                storage_timeout,
            )),
            search: Arc::new(SearchEngine::new(pool.clone(), images, storage_timeout)),
            config: Arc::new(config),
            pool,
        }
    }
}
