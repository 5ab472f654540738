//! High-level SDK for Cairn.
//!
//! [`Repository`] owns one instance of every collaborator (object store,
//! refs, index, working tree) and wires them together for the everyday
//! workflow:
//!
//! ```ignore
//! use cairn_sdk::{RepoConfig, Repository};
//!
//! let mut repo = Repository::in_memory(RepoConfig::default())?;
//! repo.write_file("test", b"111")?;
//! repo.add("test")?;
//! repo.commit("initial")?;
//!
//! repo.write_file("test", b"222")?;
//! repo.stashes().create(Some("s1"))?;
//! assert_eq!(repo.read_file("test")?.as_deref(), Some(&b"111"[..]));
//!
//! repo.stashes().apply(cairn_sdk::StashRef::Latest)?;
//! ```

pub mod config;
pub mod error;
pub mod repository;
pub mod stashes;

pub use config::{RepoConfig, CONFIG_FILE, DEFAULT_METADATA_DIR};
pub use error::{SdkError, SdkResult};
pub use repository::Repository;
pub use stashes::Stashes;

pub use cairn_diff::{FilePatch, TreeChange, TreeDiff};
pub use cairn_stash::{ApplyOptions, StashConfig, StashEntry, StashList, StashRef};
pub use cairn_types::ObjectId;
pub use cairn_worktree::{FileStatus, RepositoryStatus};
