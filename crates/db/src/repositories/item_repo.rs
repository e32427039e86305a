//! Repository for the `items` table (the material catalog).

use ecoleta_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::item::Item;

/// Column list for `items` queries.
const COLUMNS: &str = "id, title, image, created_at, updated_at";

/// Read access to catalog items.
pub struct ItemRepo;

impl ItemRepo {
    /// List every item in catalog order (ascending id).
    pub async fn list(pool: &PgPool) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items ORDER BY id");
        sqlx::query_as::<_, Item>(&query).fetch_all(pool).await
    }

    /// Find an item by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Return the ids from `ids` that have no matching item, in input order.
    ///
    /// Accepts any executor so it can run inside a caller's transaction.
    pub async fn find_missing<'e, E>(executor: E, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, DbId>(
            "SELECT r.id \
             FROM unnest($1::BIGINT[]) WITH ORDINALITY AS r(id, ord) \
             WHERE NOT EXISTS (SELECT 1 FROM items i WHERE i.id = r.id) \
             ORDER BY r.ord",
        )
        .bind(ids)
        .fetch_all(executor)
        .await
    }
}
