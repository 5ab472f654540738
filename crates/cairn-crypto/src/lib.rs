//! Content hashing for Cairn.
//!
//! Every object kind is hashed under its own domain tag so that a blob and a
//! tree with identical bytes never share an [`ObjectId`](cairn_types::ObjectId).
//! All hashing wraps BLAKE3; there is no custom cryptography here.

pub mod hasher;

pub use hasher::ContentHasher;
