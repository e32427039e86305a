//! Row models.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row. Input DTOs live in `ecoleta_core` because they are
//! validated before they reach this crate.

pub mod item;
pub mod point;
