//! Read-only access to the material catalog.

use std::sync::Arc;
use std::time::Duration;

use ecoleta_core::image_store::ImageStore;
use ecoleta_core::types::DbId;
use ecoleta_db::repositories::ItemRepo;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::bounded;

/// Catalog entry as returned by `GET /items`.
#[derive(Debug, Serialize)]
pub struct ItemView {
    pub id: DbId,
    pub title: String,
    pub image_url: String,
}

/// Lists catalog items with their icon URLs resolved.
pub struct Catalog {
    pool: PgPool,
    images: Arc<dyn ImageStore>,
    storage_timeout: Duration,
}

impl Catalog {
    pub fn new(pool: PgPool, images: Arc<dyn ImageStore>, storage_timeout: Duration) -> Self {
        Self {
            pool,
            images,
            storage_timeout,
        }
    }

    /// Every catalog item, ascending id.
    pub async fn list_items(&self) -> AppResult<Vec<ItemView>> {
        let items = bounded(self.storage_timeout, "list_items", ItemRepo::list(&self.pool)).await?;

        Ok(items
            .into_iter()
            .map(|item| ItemView {
                image_url: self.images.resolve_url(&item.image),
                id: item.id,
                title: item.title,
            })
            .collect())
    }
}
