//! Repository for the `points` table.

use ecoleta_core::point::NewPoint;
use ecoleta_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::RepoError;
use crate::models::point::{Point, PointWithItemIds, PointWithItems};
use crate::repositories::point_item_repo::PointItemRepo;

/// Column list for the `points` table.
const COLUMNS: &str = "id, image, name, email, whatsapp, latitude, longitude, \
    city, uf, created_at, updated_at";

/// Provides create/read operations for collection points.
///
/// Points are never updated or deleted by the application.
pub struct PointRepo;

impl PointRepo {
    /// Insert a point and its item associations atomically.
    ///
    /// Both writes share one transaction: if any item id is unknown, or
    /// either insert fails, the transaction is dropped uncommitted and no
    /// `points` or `point_items` row survives.
    ///
    /// Returns the point with the item ids actually associated (duplicates
    /// collapsed, first occurrence order).
    pub async fn create(
        pool: &PgPool,
        input: &NewPoint,
        image: Option<&str>,
    ) -> Result<PointWithItemIds, RepoError> {
        let mut tx = pool.begin().await?;

        let point = Self::insert(&mut tx, input, image).await?;
        let item_ids = PointItemRepo::attach(&mut tx, point.id, &input.item_ids).await?;

        tx.commit().await?;
        Ok(PointWithItemIds { point, item_ids })
    }

    /// Find a point by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Point>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM points WHERE id = $1");
        sqlx::query_as::<_, Point>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a point by ID, enriched with its items.
    pub async fn find_by_id_with_items(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PointWithItems>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(point) => {
                let items = PointItemRepo::items_for(pool, point.id).await?;
                Ok(Some(PointWithItems { point, items }))
            }
            None => Ok(None),
        }
    }

    /// List points in insertion order, applying each supplied predicate.
    ///
    /// `None` means "do not filter on this column". `ids`, when supplied,
    /// restricts the result to those point ids.
    pub async fn list_filtered(
        pool: &PgPool,
        uf: Option<&str>,
        city: Option<&str>,
        ids: Option<&[DbId]>,
    ) -> Result<Vec<Point>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM points \
             WHERE ($1::TEXT IS NULL OR uf = $1) \
               AND ($2::TEXT IS NULL OR city = $2) \
               AND ($3::BIGINT[] IS NULL OR id = ANY($3)) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Point>(&query)
            .bind(uf)
            .bind(city)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        input: &NewPoint,
        image: Option<&str>,
    ) -> Result<Point, sqlx::Error> {
        let query = format!(
            "INSERT INTO points \
                (image, name, email, whatsapp, latitude, longitude, city, uf) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Point>(&query)
            .bind(image)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.whatsapp)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.city)
            .bind(&input.uf)
            .fetch_one(&mut **tx)
            .await
    }
}
