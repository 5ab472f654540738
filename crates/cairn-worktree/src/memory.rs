use std::collections::BTreeMap;

use cairn_index::check_path;

use crate::error::{WorktreeError, WorktreeResult};
use crate::traits::WorkingTree;

/// A working tree held entirely in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryWorkTree {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryWorkTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow every file, keyed by path.
    pub fn files(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.files
    }
}

fn validate(path: &str) -> WorktreeResult<()> {
    check_path(path).map_err(|reason| WorktreeError::InvalidPath(format!("{path:?}: {reason}")))
}

impl WorkingTree for MemoryWorkTree {
    fn read(&self, path: &str) -> WorktreeResult<Option<Vec<u8>>> {
        validate(path)?;
        Ok(self.files.get(path).cloned())
    }

    fn write(&mut self, path: &str, content: &[u8]) -> WorktreeResult<()> {
        validate(path)?;
        self.files.insert(path.to_string(), content.to_vec());
        Ok(())
    }

    fn remove(&mut self, path: &str) -> WorktreeResult<bool> {
        validate(path)?;
        Ok(self.files.remove(path).is_some())
    }

    fn list(&self) -> WorktreeResult<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{tracked_paths, TrackedPaths};
    use cairn_index::Index;
    use cairn_store::{Blob, EntryMode, InMemoryObjectStore, ObjectStore, Tree, TreeEntry};
    use std::sync::Arc;

    #[test]
    fn read_write_remove() {
        let mut wt = MemoryWorkTree::new();
        assert!(wt.read("test").unwrap().is_none());
        wt.write("test", b"111").unwrap();
        assert_eq!(wt.read("test").unwrap().unwrap(), b"111");
        assert_eq!(wt.content_id("test").unwrap(), Some(Blob::id_of(b"111")));
        assert!(wt.remove("test").unwrap());
        assert!(!wt.remove("test").unwrap());
    }

    #[test]
    fn rejects_invalid_paths() {
        let mut wt = MemoryWorkTree::new();
        assert!(matches!(wt.write("../escape", b"x"), Err(WorktreeError::InvalidPath(_))));
    }

    #[test]
    fn snapshot_covers_tracked_paths_only() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
        let mut index = Index::new(Arc::clone(&store));
        index.stage_file("tracked", b"v1", EntryMode::Regular).unwrap();
        index.stage_file("deleted", b"gone", EntryMode::Regular).unwrap();

        let mut wt = MemoryWorkTree::new();
        wt.write("tracked", b"v2").unwrap();
        wt.write("untracked", b"ignored by snapshot").unwrap();

        let tracked = tracked_paths(&index, None);
        let tree_id = wt.snapshot(store.as_ref(), &tracked).unwrap();
        let tree = store.read_tree(&tree_id).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("tracked").unwrap().object_id, Blob::id_of(b"v2"));
    }

    #[test]
    fn reset_restores_tree_and_spares_untracked() {
        let store = InMemoryObjectStore::new();
        let base = store.write_blob(b"111").unwrap();
        let tree = Tree::new(vec![TreeEntry::new(EntryMode::Regular, "test", base)]);

        let mut wt = MemoryWorkTree::new();
        wt.write("test", b"222").unwrap();
        wt.write("added", b"staged new file").unwrap();
        wt.write("notes.txt", b"untracked").unwrap();

        let tracked: TrackedPaths = [
            ("test".to_string(), EntryMode::Regular),
            ("added".to_string(), EntryMode::Regular),
        ]
        .into_iter()
        .collect();
        wt.reset(&store, &tree, &tracked).unwrap();

        assert_eq!(wt.read("test").unwrap().unwrap(), b"111");
        assert!(wt.read("added").unwrap().is_none());
        assert_eq!(wt.read("notes.txt").unwrap().unwrap(), b"untracked");
    }
}
