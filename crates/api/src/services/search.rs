//! Point search.
//!
//! Predicates combine with AND; the item predicate matches a point that
//! accepts any of the requested items.

use std::sync::Arc;
use std::time::Duration;

use ecoleta_core::image_store::ImageStore;
use ecoleta_core::search::PointFilter;
use ecoleta_core::types::DbId;
use ecoleta_db::repositories::{PointItemRepo, PointRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::bounded;

/// One search hit as returned by `GET /points`.
#[derive(Debug, Serialize)]
pub struct PointSummary {
    pub id: DbId,
    pub image_url: Option<String>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

pub struct SearchEngine {
    pool: PgPool,
    images: Arc<dyn ImageStore>,
    storage_timeout: Duration,
}

impl SearchEngine {
    pub fn new(pool: PgPool, images: Arc<dyn ImageStore>, storage_timeout: Duration) -> Self {
        Self {
            pool,
            images,
            storage_timeout,
        }
    }

    /// Points satisfying every supplied predicate, ascending id.
    pub async fn search(&self, filter: &PointFilter) -> AppResult<Vec<PointSummary>> {
        let matching_ids = match filter.item_ids.as_deref() {
            Some(item_ids) => {
                let ids = bounded(
                    self.storage_timeout,
                    "points_matching_any",
                    PointItemRepo::points_matching_any(&self.pool, item_ids),
                )
                .await?;
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                Some(ids)
            }
            None => None,
        };

        let points = bounded(
            self.storage_timeout,
            "list_points",
            PointRepo::list_filtered(
                &self.pool,
                filter.uf.as_deref(),
                filter.city.as_deref(),
                matching_ids.as_deref(),
            ),
        )
        .await?;

        tracing::debug!(
            unfiltered = filter.is_unfiltered(),
            uf = ?filter.uf,
            city = ?filter.city,
            items = ?filter.item_ids,
            hits = points.len(),
            "Point search"
        );

        Ok(points
            .into_iter()
            .map(|point| PointSummary {
                image_url: point.image.as_deref().map(|r| self.images.resolve_url(r)),
                id: point.id,
                name: point.name,
                latitude: point.latitude,
                longitude: point.longitude,
            })
            .collect())
    }
}
