use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during image store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No image with this id exists.
    #[error("image not found: {0}")]
    NotFound(Uuid),

    /// The referenced owning recipe does not exist.
    #[error("recipe not found: {0}")]
    OwnerNotFound(i32),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}
