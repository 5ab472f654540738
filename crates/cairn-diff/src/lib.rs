//! Diff engine for Cairn.
//!
//! # Key Types
//!
//! - [`TreeDiff`] / [`TreeChange`] -- per-path changes between two flat trees
//! - [`BlobDiff`] / [`DiffHunk`] / [`DiffLine`] -- line-level diff of two blobs
//! - [`FilePatch`] -- a tree change together with its line diff
//!
//! Tree diffs never pair deletions with additions: a moved file shows up as
//! one `Deleted` and one `Added` change.

pub mod blob_diff;
pub mod error;
pub mod patch;
pub mod tree_diff;

pub use blob_diff::{diff_blobs, BlobDiff, DiffHunk, DiffLine};
pub use error::{DiffError, DiffResult};
pub use patch::{diff_patches, FilePatch};
pub use tree_diff::{diff_tree_objects, diff_trees, TreeChange, TreeDiff};
