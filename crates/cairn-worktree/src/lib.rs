//! Working tree access and status computation for Cairn.
//!
//! The [`WorkingTree`] trait is the only way the rest of Cairn touches file
//! content. Two backends ship with the crate:
//!
//! - [`MemoryWorkTree`] -- a `BTreeMap` of path to bytes, for tests and embedding
//! - [`DiskWorkTree`] -- a directory on disk, skipping the metadata directory
//!   and anything matched by `.cairnignore`
//!
//! On top of the trait, [`WorkingTree::snapshot`] captures tracked content as
//! a tree object and [`WorkingTree::reset`] checks a tree out over the tracked
//! paths. [`compute_status`] classifies every path into exactly one
//! [`FileStatus`] bucket.

pub mod disk;
pub mod error;
pub mod memory;
pub mod status;
pub mod traits;

pub use disk::{DiskWorkTree, IGNORE_FILE};
pub use error::{WorktreeError, WorktreeResult};
pub use memory::MemoryWorkTree;
pub use status::{compute_status, FileStatus, RepositoryStatus};
pub use traits::{tracked_paths, TrackedPaths, WorkingTree};
