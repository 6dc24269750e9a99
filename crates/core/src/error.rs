use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A parent chain revisited an entity it had already passed through.
    #[error("Cycle detected: {entity} with id {id} is its own ancestor")]
    CycleDetected { entity: &'static str, id: DbId },
}
