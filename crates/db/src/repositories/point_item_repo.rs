//! Repository for the `point_items` junction table.
//!
//! Association rows are only ever written inside the transaction that
//! creates their point (see [`PointRepo::create`](super::PointRepo::create)).

use ecoleta_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::RepoError;
use crate::models::item::Item;
use crate::repositories::item_repo::ItemRepo;

/// Provides the point/item many-to-many relation.
pub struct PointItemRepo;

impl PointItemRepo {
    /// Associate `item_ids` with `point_id` within an existing transaction.
    ///
    /// Duplicate ids are collapsed (first occurrence wins). Every id must
    /// exist in the catalog; otherwise nothing is inserted and
    /// [`RepoError::MissingReferences`] lists the unknown ids.
    ///
    /// Returns the associated item ids, deduplicated, in input order.
    pub async fn attach(
        tx: &mut Transaction<'_, Postgres>,
        point_id: DbId,
        item_ids: &[DbId],
    ) -> Result<Vec<DbId>, RepoError> {
        let ids = dedup_preserving_order(item_ids);
        if ids.is_empty() {
            return Err(RepoError::EmptyIdSet { operation: "attach" });
        }

        let missing = ItemRepo::find_missing(&mut **tx, &ids).await?;
        if !missing.is_empty() {
            return Err(RepoError::MissingReferences {
                entity: "Item",
                missing,
            });
        }

        sqlx::query(
            "INSERT INTO point_items (point_id, item_id) \
             SELECT $1, item_id FROM unnest($2::BIGINT[]) AS item_id",
        )
        .bind(point_id)
        .bind(&ids)
        .execute(&mut **tx)
        .await?;

        Ok(ids)
    }

    /// Items associated with a point, in catalog order.
    pub async fn items_for(pool: &PgPool, point_id: DbId) -> Result<Vec<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(
            "SELECT i.id, i.title, i.image, i.created_at, i.updated_at \
             FROM items i \
             JOIN point_items pi ON pi.item_id = i.id \
             WHERE pi.point_id = $1 \
             ORDER BY i.id",
        )
        .bind(point_id)
        .fetch_all(pool)
        .await
    }

    /// Distinct ids of points associated with *any* of `item_ids`,
    /// ascending.
    ///
    /// An empty `item_ids` is a caller error: "no item filter" must skip the
    /// predicate rather than match nothing.
    pub async fn points_matching_any(
        pool: &PgPool,
        item_ids: &[DbId],
    ) -> Result<Vec<DbId>, RepoError> {
        if item_ids.is_empty() {
            return Err(RepoError::EmptyIdSet {
                operation: "points_matching_any",
            });
        }

        let ids = sqlx::query_scalar::<_, DbId>(
            "SELECT DISTINCT point_id \
             FROM point_items \
             WHERE item_id = ANY($1) \
             ORDER BY point_id",
        )
        .bind(item_ids)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }
}

fn dedup_preserving_order(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
