//! Collection point model.

use ecoleta_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::item::Item;

/// A row from the `points` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Point {
    pub id: DbId,
    /// Stored image reference, if a photo was uploaded.
    pub image: Option<String>,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A point together with the items it accepts, in catalog order.
#[derive(Debug, Clone, Serialize)]
pub struct PointWithItems {
    pub point: Point,
    pub items: Vec<Item>,
}

/// A freshly created point and the item ids it was associated with.
#[derive(Debug, Clone, Serialize)]
pub struct PointWithItemIds {
    pub point: Point,
    pub item_ids: Vec<DbId>,
}
