//! Tree-level diff: compare two flat trees path by path.

use std::collections::BTreeSet;

use cairn_store::{EntryMode, ObjectStore, Tree};
use cairn_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::DiffResult;

/// The result of comparing two trees, ordered by path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDiff {
    pub changes: Vec<TreeChange>,
}

impl TreeDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// The change touching `path`, if any.
    pub fn get(&self, path: &str) -> Option<&TreeChange> {
        self.changes
            .binary_search_by(|c| c.path().cmp(path))
            .ok()
            .map(|i| &self.changes[i])
    }

    /// Every changed path, in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(TreeChange::path)
    }
}

/// A single per-path change between two trees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeChange {
    Added {
        path: String,
        new_id: ObjectId,
        mode: EntryMode,
    },
    Deleted {
        path: String,
        old_id: ObjectId,
        mode: EntryMode,
    },
    /// Content or mode (or both) changed.
    Modified {
        path: String,
        old_id: ObjectId,
        new_id: ObjectId,
        old_mode: EntryMode,
        new_mode: EntryMode,
    },
}

impl TreeChange {
    pub fn path(&self) -> &str {
        match self {
            TreeChange::Added { path, .. }
            | TreeChange::Deleted { path, .. }
            | TreeChange::Modified { path, .. } => path,
        }
    }

    /// Blob id before the change, `None` for additions.
    pub fn old_id(&self) -> Option<&ObjectId> {
        match self {
            TreeChange::Added { .. } => None,
            TreeChange::Deleted { old_id, .. } | TreeChange::Modified { old_id, .. } => {
                Some(old_id)
            }
        }
    }

    /// Blob id after the change, `None` for deletions.
    pub fn new_id(&self) -> Option<&ObjectId> {
        match self {
            TreeChange::Deleted { .. } => None,
            TreeChange::Added { new_id, .. } | TreeChange::Modified { new_id, .. } => {
                Some(new_id)
            }
        }
    }
}

/// Compare two trees read from the store.
///
/// `old_tree` of `None` compares against the empty tree.
pub fn diff_trees(
    store: &dyn ObjectStore,
    old_tree: Option<&ObjectId>,
    new_tree: &ObjectId,
) -> DiffResult<TreeDiff> {
    let old = match old_tree {
        Some(id) => store.read_tree(id)?,
        None => Tree::empty(),
    };
    let new = store.read_tree(new_tree)?;
    Ok(diff_tree_objects(Some(&old), &new))
}

/// Compare two trees already in memory.
pub fn diff_tree_objects(old_tree: Option<&Tree>, new_tree: &Tree) -> TreeDiff {
    let empty = Tree::empty();
    let old = old_tree.unwrap_or(&empty);

    let paths: BTreeSet<&str> = old.paths().chain(new_tree.paths()).collect();
    let mut changes = Vec::new();
    for path in paths {
        let change = match (old.get(path), new_tree.get(path)) {
            (None, Some(n)) => TreeChange::Added {
                path: path.to_string(),
                new_id: n.object_id,
                mode: n.mode,
            },
            (Some(o), None) => TreeChange::Deleted {
                path: path.to_string(),
                old_id: o.object_id,
                mode: o.mode,
            },
            (Some(o), Some(n)) if o.object_id != n.object_id || o.mode != n.mode => {
                TreeChange::Modified {
                    path: path.to_string(),
                    old_id: o.object_id,
                    new_id: n.object_id,
                    old_mode: o.mode,
                    new_mode: n.mode,
                }
            }
            _ => continue,
        };
        changes.push(change);
    }
    TreeDiff { changes }
}
