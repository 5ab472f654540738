use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The index matches HEAD.
    #[error("nothing to commit")]
    NothingToCommit,

    #[error("store error: {0}")]
    Store(#[from] cairn_store::StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] cairn_refs::RefError),

    #[error("index error: {0}")]
    Index(#[from] cairn_index::IndexError),

    #[error("working tree error: {0}")]
    Worktree(#[from] cairn_worktree::WorktreeError),

    #[error("diff error: {0}")]
    Diff(#[from] cairn_diff::DiffError),

    #[error("stash error: {0}")]
    Stash(#[from] cairn_stash::StashError),
}

pub type SdkResult<T> = Result<T, SdkError>;
