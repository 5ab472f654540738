//! Error types for the diff crate.

use cairn_store::StoreError;
use cairn_types::ObjectId;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A tree referenced by the diff was not found in the store.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for DiffError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => DiffError::ObjectNotFound(id),
            other => DiffError::Store(other),
        }
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
