//! Stash for Cairn.
//!
//! A stash entry shelves the difference between HEAD and the current state,
//! keeping what was staged apart from what was only edited. Creating an entry
//! writes two commits on top of the base commit:
//!
//! ```text
//!   base ── index commit ── working commit (only if the working tree differs)
//! ```
//!
//! and then resets the index and the tracked part of the working tree back to
//! the base. Applying diffs base -> index and index -> working and replays
//! both, path by path, refusing paths that changed since.
//!
//! Entries live in a stack-ordered [`StashLog`] stored as an object and
//! pointed to by `refs/stash`.
//!
//! # Key Types
//!
//! - [`StashManager`] -- create, list, apply, pop, drop, clear
//! - [`StashContext`] -- the explicit store, refs, index and working tree handles
//! - [`StashEntry`] / [`StashList`] -- immutable records and list snapshots
//! - [`StashRef`] -- selects an entry by position, id or as the latest

pub mod config;
pub mod entry;
pub mod error;
pub mod manager;
pub mod reconcile;

pub use config::{StashConfig, DEFAULT_AUTHOR};
pub use entry::{ApplyOptions, StashEntry, StashList, StashLog, StashRef};
pub use error::{StashError, StashResult};
pub use manager::{StashContext, StashManager};
