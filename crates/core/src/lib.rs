//! Domain types, validation, and image storage for the collection-point
//! directory. No database or HTTP dependencies.

pub mod error;
pub mod image_store;
pub mod point;
pub mod search;
pub mod types;
