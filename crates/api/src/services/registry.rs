//! Point registration and lookup.
//!
//! Registration order: validate the input, confirm every item id exists,
//! store the image (if any), then insert the point and its item
//! associations in one transaction. The item check is repeated inside the
//! transaction. The image write is not part of that transaction; if the
//! insert still fails afterwards the stored file is left behind and logged.

use std::sync::Arc;
use std::time::Duration;

use ecoleta_core::error::CoreError;
use ecoleta_core::image_store::{ImageStore, ImageUpload};
use ecoleta_core::point::NewPoint;
use ecoleta_core::types::DbId;
use ecoleta_db::models::point::Point;
use ecoleta_db::repositories::{ItemRepo, PointRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::bounded;

/// Response body for `POST /points`.
#[derive(Debug, Serialize)]
pub struct CreatedPoint {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
    /// Item ids as associated (duplicates collapsed).
    pub items: Vec<DbId>,
    pub image: Option<String>,
    pub image_url: Option<String>,
}

/// Point fields of the `GET /points/{id}` response.
#[derive(Debug, Serialize)]
pub struct PointView {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemTitle {
    pub title: String,
}

/// Response body for `GET /points/{id}`.
#[derive(Debug, Serialize)]
pub struct PointDetail {
    pub point: PointView,
    pub items: Vec<ItemTitle>,
}

/// Creates points and fetches point details.
pub struct PointRegistry {
    pool: PgPool,
    images: Arc<dyn ImageStore>,
    storage_timeout: Duration,
}

impl PointRegistry {
    pub fn new(pool: PgPool, images: Arc<dyn ImageStore>, storage_timeout: Duration) -> Self {
        Self {
            pool,
            images,
            storage_timeout,
        }
    }

    /// Register a new collection point.
    pub async fn create(
        &self,
        input: NewPoint,
        image: Option<ImageUpload>,
    ) -> AppResult<CreatedPoint> {
        let input = input.validated()?;

        // Reject unknown items before anything durable is written.
        let missing = bounded(
            self.storage_timeout,
            "find_missing_items",
            ItemRepo::find_missing(&self.pool, &input.item_ids),
        )
        .await?;
        if !missing.is_empty() {
            return Err(CoreError::Referential {
                entity: "Item",
                missing,
            }
            .into());
        }

        let image_ref = match image {
            Some(upload) => Some(
                bounded(self.storage_timeout, "store_image", async {
                    self.images.store(upload).await.map_err(CoreError::from)
                })
                .await?,
            ),
            None => None,
        };

        let created = bounded(
            self.storage_timeout,
            "create_point",
            PointRepo::create(&self.pool, &input, image_ref.as_deref()),
        )
        .await;

        let created = match created {
            Ok(created) => created,
            Err(err) => {
                if let Some(image_ref) = &image_ref {
                    tracing::warn!(
                        image_ref = %image_ref,
                        error = %err,
                        "Point creation failed after image was stored; image is orphaned"
                    );
                }
                return Err(err);
            }
        };

        let point = created.point;
        let items = created.item_ids;
        tracing::info!(point_id = point.id, item_count = items.len(), "Point created");

        let image_url = self.image_url(&point);
        Ok(CreatedPoint {
            id: point.id,
            name: point.name,
            email: point.email,
            whatsapp: point.whatsapp,
            latitude: point.latitude,
            longitude: point.longitude,
            city: point.city,
            uf: point.uf,
            items,
            image: point.image,
            image_url,
        })
    }

    /// Fetch a point with the titles of the items it accepts.
    pub async fn get(&self, id: DbId) -> AppResult<PointDetail> {
        let found = bounded(
            self.storage_timeout,
            "get_point",
            PointRepo::find_by_id_with_items(&self.pool, id),
        )
        .await?
        .ok_or(CoreError::NotFound { entity: "Point", id })?;

        let image_url = self.image_url(&found.point);
        let point = found.point;
        Ok(PointDetail {
            point: PointView {
                id: point.id,
                name: point.name,
                email: point.email,
                whatsapp: point.whatsapp,
                latitude: point.latitude,
                longitude: point.longitude,
                city: point.city,
                uf: point.uf,
                image: point.image,
                image_url,
            },
            items: found
                .items
                .into_iter()
                .map(|item| ItemTitle { title: item.title })
                .collect(),
        })
    }

    fn image_url(&self, point: &Point) -> Option<String> {
        point.image.as_deref().map(|r| self.images.resolve_url(r))
    }
}
