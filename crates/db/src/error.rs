use ecoleta_core::types::DbId;

/// Errors raised by repositories that enforce more than SQL constraints.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Referenced rows do not exist. Raised before any association row is
    /// written, so the enclosing transaction can be rolled back cleanly.
    #[error("Unknown {entity} ids: {missing:?}")]
    MissingReferences {
        entity: &'static str,
        missing: Vec<DbId>,
    },

    /// An id-set argument was empty where at least one id is required.
    #[error("Empty id set passed to {operation}")]
    EmptyIdSet { operation: &'static str },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
