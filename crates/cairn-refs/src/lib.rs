//! Reference management for Cairn.
//!
//! Named references point at commits (branches, tags) or at the current stash
//! log record (`refs/stash`). They are the human-readable entry points into
//! the object store, analogous to git refs.
//!
//! - **Branches** are mutable pointers that advance with each commit.
//! - **Tags** are immutable; delete and recreate to move one.
//! - **`refs/stash`** names the current stash log object; it moves on every
//!   stash push or drop and disappears when the stash is cleared.
//! - **HEAD** names the current branch, or a detached commit.
//!
//! # Modules
//!
//! - [`error`] -- Error types for ref operations
//! - [`types`] -- [`Ref`] and [`Head`]
//! - [`traits`] -- The [`RefStore`] storage interface
//! - [`names`] -- Branch/tag name validation
//! - [`memory`] -- In-memory [`InMemoryRefStore`]

pub mod error;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use memory::InMemoryRefStore;
pub use names::{validate_branch_name, validate_tag_name};
pub use traits::RefStore;
pub use types::{Head, Ref, STASH_REF};
