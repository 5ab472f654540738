//! Error types for stash operations.

use cairn_diff::DiffError;
use cairn_index::IndexError;
use cairn_refs::RefError;
use cairn_store::StoreError;
use cairn_types::ObjectId;
use cairn_worktree::WorktreeError;

/// Errors that can occur while creating or reinstating stash entries.
#[derive(Debug, thiserror::Error)]
pub enum StashError {
    /// Index and working tree both match HEAD.
    #[error("no local changes to save")]
    NothingToStash,

    /// These paths changed since the entry was created and were left alone.
    #[error("stash conflicts at path(s): {}", paths.join(", "))]
    StashConflict { paths: Vec<String> },

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// The selected entry is not in the stash log (or the log is unreadable).
    #[error("invalid stash entry: {0}")]
    InvalidEntry(String),

    /// HEAD does not resolve to a commit yet.
    #[error("cannot stash before the initial commit")]
    NoInitialCommit,

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("index error: {0}")]
    Index(IndexError),

    #[error("ref error: {0}")]
    Ref(#[from] RefError),

    #[error("working tree error: {0}")]
    Worktree(WorktreeError),

    #[error("diff error: {0}")]
    Diff(DiffError),
}

impl From<StoreError> for StashError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::ObjectNotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<IndexError> for StashError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::ObjectNotFound(id) => Self::ObjectNotFound(id),
            other => Self::Index(other),
        }
    }
}

impl From<WorktreeError> for StashError {
    fn from(err: WorktreeError) -> Self {
        match err {
            WorktreeError::Store(store) => store.into(),
            other => Self::Worktree(other),
        }
    }
}

impl From<DiffError> for StashError {
    fn from(err: DiffError) -> Self {
        match err {
            DiffError::ObjectNotFound(id) => Self::ObjectNotFound(id),
            other => Self::Diff(other),
        }
    }
}

/// Convenience alias for stash results.
pub type StashResult<T> = Result<T, StashError>;
