//! Foundation types for Cairn.
//!
//! Every other Cairn crate depends on `cairn-types`. It deliberately holds
//! only the identifiers and clocks shared by the object store, the refs, the
//! index and the stash machinery.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (BLAKE3 hash)
//! - [`Stamp`] -- Monotonic logical timestamp used to order commits and stash entries

pub mod error;
pub mod object;
pub mod temporal;

pub use error::TypeError;
pub use object::ObjectId;
pub use temporal::Stamp;
