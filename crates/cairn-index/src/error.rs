//! Error types for the index crate.

use cairn_types::ObjectId;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The specified path was not found in the index.
    #[error("path not found in index: {0}")]
    PathNotFound(String),

    /// An object referenced by the index was not found in the store.
    #[error("object not found in store: {0}")]
    ObjectNotFound(ObjectId),

    /// One or more entries have unresolved conflicts.
    #[error("unresolved conflict at path(s): {}", .0.join(", "))]
    UnresolvedConflict(Vec<String>),

    #[error("store error: {0}")]
    Store(cairn_store::StoreError),

    /// An invalid path was provided.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl From<cairn_store::StoreError> for IndexError {
    fn from(err: cairn_store::StoreError) -> Self {
        match err {
            cairn_store::StoreError::NotFound(id) => Self::ObjectNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
