//! Content-addressed object storage for Cairn.
//!
//! A hash-keyed object store analogous to git's `.git/objects/` directory.
//! Blobs, trees, commits and stash records are immutable objects identified
//! by their BLAKE3 hash (domain-separated by object kind).
//!
//! # Object Types
//!
//! - [`Blob`] -- raw file content
//! - [`Tree`] -- flat listing mapping repository paths to blobs
//! - [`Commit`] -- a tree plus lineage, author, message and timestamp
//! - [`ObjectKind::Stash`] -- opaque stash log records (interpreted by `cairn-stash`)
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Writing identical content twice yields the same id and stores one copy.
//! 3. The store never interprets object contents -- it is a pure key-value store.
//! 4. Errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use object::{Blob, Commit, EntryMode, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::ObjectStore;
