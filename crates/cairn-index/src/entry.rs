//! Index entry type.

use serde::{Deserialize, Serialize};
use cairn_store::{EntryMode, TreeEntry};
use cairn_types::ObjectId;

/// An entry in the staging index, representing a tracked file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Slash-separated path relative to the repository root.
    pub path: String,
    /// Blob holding the staged content.
    pub object_id: ObjectId,
    pub mode: EntryMode,
    /// Set while a merge left this path unresolved.
    pub conflict: bool,
}

impl IndexEntry {
    pub fn new(path: impl Into<String>, object_id: ObjectId, mode: EntryMode) -> Self {
        Self {
            path: path.into(),
            object_id,
            mode,
            conflict: false,
        }
    }

    pub fn to_tree_entry(&self) -> TreeEntry {
        TreeEntry::new(self.mode, self.path.clone(), self.object_id)
    }
}

impl From<&TreeEntry> for IndexEntry {
    fn from(te: &TreeEntry) -> Self {
        Self::new(te.path.clone(), te.object_id, te.mode)
    }
}
