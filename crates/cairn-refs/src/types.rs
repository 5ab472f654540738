//! Core reference types.

use serde::{Deserialize, Serialize};
use cairn_types::ObjectId;

/// Canonical name of the stash pointer.
pub const STASH_REF: &str = "refs/stash";

/// A named reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ref {
    /// Mutable pointer to the tip commit of a line of work.
    Branch {
        /// Short branch name (e.g. "main", "feature/auth").
        name: String,
        target: ObjectId,
    },

    /// Immutable pointer to a commit.
    Tag {
        name: String,
        target: ObjectId,
        message: String,
    },

    /// Pointer to the current stash log object.
    Stash { log: ObjectId },
}

impl Ref {
    pub fn branch(name: impl Into<String>, target: ObjectId) -> Self {
        Ref::Branch {
            name: name.into(),
            target,
        }
    }

    /// Returns the canonical name for this ref (e.g. "refs/heads/main").
    pub fn canonical_name(&self) -> String {
        match self {
            Ref::Branch { name, .. } => format!("refs/heads/{name}"),
            Ref::Tag { name, .. } => format!("refs/tags/{name}"),
            Ref::Stash { .. } => STASH_REF.to_string(),
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Ref::Branch { .. })
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Ref::Tag { .. })
    }

    /// The object this ref points to.
    pub fn target(&self) -> &ObjectId {
        match self {
            Ref::Branch { target, .. } | Ref::Tag { target, .. } => target,
            Ref::Stash { log } => log,
        }
    }
}

/// The state of HEAD: either symbolic (pointing to a branch) or detached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Head {
    /// HEAD names a branch, which may not have any commits yet.
    Symbolic(String),
    /// HEAD points directly at a commit.
    Detached(ObjectId),
}
