//! Staging index for Cairn.
//!
//! The index records, for every tracked path, the blob that the next commit
//! will contain. It is independent of on-disk content: a file can be staged
//! at one version and edited further in the working tree.
//!
//! # Key Types
//!
//! - [`Index`] -- The in-memory staging area (BTreeMap-backed)
//! - [`IndexEntry`] -- A tracked path with its blob id, mode and conflict flag

pub mod entry;
pub mod error;
pub mod index;
pub mod path;

pub use entry::IndexEntry;
pub use error::{IndexError, IndexResult};
pub use index::Index;
pub use path::check_path;
