//! Per-file patches: a tree diff with the line diff of every changed blob.

use std::fmt;

use cairn_store::ObjectStore;
use cairn_types::ObjectId;

use crate::blob_diff::{diff_blobs, BlobDiff};
use crate::error::DiffResult;
use crate::tree_diff::{diff_trees, TreeChange};

/// One changed path and its content diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePatch {
    pub change: TreeChange,
    pub diff: BlobDiff,
}

/// Diff two trees down to line level.
pub fn diff_patches(
    store: &dyn ObjectStore,
    old_tree: Option<&ObjectId>,
    new_tree: &ObjectId,
) -> DiffResult<Vec<FilePatch>> {
    let tree_diff = diff_trees(store, old_tree, new_tree)?;
    let read = |id: Option<&ObjectId>| -> DiffResult<Vec<u8>> {
        Ok(match id {
            Some(id) => store.read_blob(id)?,
            None => Vec::new(),
        })
    };

    tree_diff
        .changes
        .into_iter()
        .map(|change| {
            let old = read(change.old_id())?;
            let new = read(change.new_id())?;
            Ok(FilePatch {
                diff: diff_blobs(&old, &new),
                change,
            })
        })
        .collect()
}

impl fmt::Display for FilePatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.change.path();
        let (old, new) = match self.change {
            TreeChange::Added { .. } => ("/dev/null".to_string(), format!("b/{path}")),
            TreeChange::Deleted { .. } => (format!("a/{path}"), "/dev/null".to_string()),
            TreeChange::Modified { .. } => (format!("a/{path}"), format!("b/{path}")),
        };
        writeln!(f, "--- {old}")?;
        writeln!(f, "+++ {new}")?;
        write!(f, "{}", self.diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_store::{EntryMode, InMemoryObjectStore, Tree, TreeEntry};

    fn tree(store: &InMemoryObjectStore, files: &[(&str, &[u8])]) -> ObjectId {
        let entries = files
            .iter()
            .map(|(path, content)| {
                TreeEntry::new(EntryMode::Regular, *path, store.write_blob(content).unwrap())
            })
            .collect();
        store.write_tree(&Tree::new(entries)).unwrap()
    }

    #[test]
    fn patch_for_edit_and_addition() {
        let store = InMemoryObjectStore::new();
        let old = tree(&store, &[("test", b"111\n")]);
        let new = tree(&store, &[("test", b"222\n"), ("new", b"hello\n")]);

        let patches = diff_patches(&store, Some(&old), &new).unwrap();
        assert_eq!(patches.len(), 2);

        assert_eq!(patches[0].change.path(), "new");
        assert_eq!(
            patches[0].to_string(),
            "--- /dev/null\n+++ b/new\n@@ -1,0 +1,1 @@\n+hello\n"
        );
        assert_eq!(
            patches[1].to_string(),
            "--- a/test\n+++ b/test\n@@ -1,1 +1,1 @@\n-111\n+222\n"
        );
    }
}
