use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A single input field failed validation. `field` is the wire name.
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// One or more referenced rows do not exist.
    #[error("Unknown {entity} ids: {missing:?}")]
    Referential {
        entity: &'static str,
        missing: Vec<DbId>,
    },

    /// Transient failure writing to durable storage (image or database).
    /// Safe to retry the whole request.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::InvalidField`].
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}
