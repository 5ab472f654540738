//! Error types for working tree operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing the working tree.
#[derive(Debug, thiserror::Error)]
pub enum WorktreeError {
    /// The path is not a clean repository-relative path, or names metadata.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("walk error: {0}")]
    Walk(String),

    #[error("store error: {0}")]
    Store(#[from] cairn_store::StoreError),
}

impl WorktreeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for working tree results.
pub type WorktreeResult<T> = Result<T, WorktreeError>;
