//! Catalog item model.

use ecoleta_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `items` table: one category of recyclable material.
///
/// Items are seeded by migration and never written by the application.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub title: String,
    /// Stored image reference, resolved to a URL by the image store.
    pub image: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
