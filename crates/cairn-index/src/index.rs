//! The core Index structure managing tracked entries in memory.
//!
//! The [`Index`] manages a `BTreeMap<String, IndexEntry>`. All operations are
//! in-memory; blobs and trees go through the shared object store. Reading the
//! working tree is the caller's job.

use std::collections::BTreeMap;
use std::sync::Arc;

use cairn_store::{EntryMode, ObjectStore, Tree};
use cairn_types::ObjectId;
use tracing::debug;

use crate::entry::IndexEntry;
use crate::error::{IndexError, IndexResult};
use crate::path::check_path;

/// The staging index: the content the next commit will record, per path.
pub struct Index {
    entries: BTreeMap<String, IndexEntry>,
    /// Tree id of the current entries (invalidated on changes).
    tree_cache: Option<ObjectId>,
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("entries", &self.entries.len())
            .field("tree_cache", &self.tree_cache)
            .finish()
    }
}

impl Index {
    /// Create a new empty index backed by the given store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            entries: BTreeMap::new(),
            tree_cache: None,
            store,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Entries in path order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn tree_cache(&self) -> Option<ObjectId> {
        self.tree_cache
    }

    // ---------------------------------------------------------------
    // Stage operations
    // ---------------------------------------------------------------

    /// Stage `content` at `path`, writing the blob to the store.
    ///
    /// Returns the blob id. Staging a path clears any conflict on it.
    pub fn stage_file(
        &mut self,
        path: &str,
        content: &[u8],
        mode: EntryMode,
    ) -> IndexResult<ObjectId> {
        validate(path)?;
        let object_id = self.store.write_blob(content)?;
        self.insert(IndexEntry::new(path, object_id, mode));
        Ok(object_id)
    }

    /// Stage an object that is already in the store (checkout, stash apply).
    pub fn stage_object(
        &mut self,
        path: &str,
        object_id: ObjectId,
        mode: EntryMode,
    ) -> IndexResult<()> {
        validate(path)?;
        self.insert(IndexEntry::new(path, object_id, mode));
        Ok(())
    }

    fn insert(&mut self, entry: IndexEntry) {
        self.entries.insert(entry.path.clone(), entry);
        self.tree_cache = None;
    }

    /// Stop tracking a path. Staging its deletion, in git terms.
    pub fn remove(&mut self, path: &str) -> IndexResult<IndexEntry> {
        let removed = self
            .entries
            .remove(path)
            .ok_or_else(|| IndexError::PathNotFound(path.to_string()))?;
        self.tree_cache = None;
        Ok(removed)
    }

    // ---------------------------------------------------------------
    // Conflict management
    // ---------------------------------------------------------------

    pub fn mark_conflict(&mut self, path: &str) -> IndexResult<()> {
        let entry = self
            .entries
            .get_mut(path)
            .ok_or_else(|| IndexError::PathNotFound(path.to_string()))?;
        entry.conflict = true;
        self.tree_cache = None;
        Ok(())
    }

    /// Resolve a conflict by staging the given object.
    pub fn resolve_conflict(&mut self, path: &str, object_id: ObjectId) -> IndexResult<()> {
        let entry = self
            .entries
            .get_mut(path)
            .filter(|e| e.conflict)
            .ok_or_else(|| IndexError::PathNotFound(format!("no conflict at path: {path}")))?;
        entry.object_id = object_id;
        entry.conflict = false;
        self.tree_cache = None;
        Ok(())
    }

    pub fn has_conflicts(&self) -> bool {
        self.entries.values().any(|e| e.conflict)
    }

    pub fn conflict_paths(&self) -> Vec<String> {
        self.entries
            .values()
            .filter(|e| e.conflict)
            .map(|e| e.path.clone())
            .collect()
    }

    // ---------------------------------------------------------------
    // Snapshot / reset
    // ---------------------------------------------------------------

    /// Write every entry as one tree and return its id.
    ///
    /// Fails while any entry is conflicted.
    pub fn write_tree(&mut self) -> IndexResult<ObjectId> {
        if let Some(cached) = self.tree_cache {
            return Ok(cached);
        }
        if self.has_conflicts() {
            return Err(IndexError::UnresolvedConflict(self.conflict_paths()));
        }

        let tree = Tree::new(self.entries.values().map(IndexEntry::to_tree_entry).collect());
        let tree_id = self.store.write_tree(&tree)?;
        debug!(tree = %tree_id.short_hex(), entries = tree.len(), "index written");

        self.tree_cache = Some(tree_id);
        Ok(tree_id)
    }

    /// Replace the whole index with the entries of a stored tree.
    pub fn read_tree(&mut self, tree_id: &ObjectId) -> IndexResult<()> {
        let tree = self.store.read_tree(tree_id)?;
        self.entries = tree
            .entries
            .iter()
            .map(|te| (te.path.clone(), IndexEntry::from(te)))
            .collect();
        self.tree_cache = Some(*tree_id);
        debug!(tree = %tree_id.short_hex(), entries = self.entries.len(), "index reset");
        Ok(())
    }
}

fn validate(path: &str) -> IndexResult<()> {
    check_path(path).map_err(|reason| IndexError::InvalidPath(format!("{path:?}: {reason}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_store::InMemoryObjectStore;

    fn make_store() -> Arc<dyn ObjectStore> {
        Arc::new(InMemoryObjectStore::new())
    }

    fn make_index() -> Index {
        Index::new(make_store())
    }

    #[test]
    fn new_index_is_empty() {
        let idx = make_index();
        assert!(idx.is_empty());
        assert_eq!(idx.len(), 0);
        assert!(!idx.has_conflicts());
    }

    #[test]
    fn stage_file_adds_entry() {
        let mut idx = make_index();
        let id = idx
            .stage_file("hello.txt", b"hello world", EntryMode::Regular)
            .unwrap();

        let entry = idx.get("hello.txt").unwrap();
        assert_eq!(entry.object_id, id);
        assert_eq!(entry.mode, EntryMode::Regular);
        assert!(idx.contains("hello.txt"));
    }

    #[test]
    fn stage_file_rejects_bad_paths() {
        let mut idx = make_index();
        for path in ["", "/abs", "a/../b"] {
            let result = idx.stage_file(path, b"data", EntryMode::Regular);
            assert!(matches!(result, Err(IndexError::InvalidPath(_))), "{path:?}");
        }
    }

    #[test]
    fn restaging_replaces_content() {
        let mut idx = make_index();
        idx.stage_file("test1", b"t1-111", EntryMode::Regular).unwrap();
        let v2 = idx.stage_file("test1", b"t1-222", EntryMode::Regular).unwrap();
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.get("test1").unwrap().object_id, v2);
    }

    #[test]
    fn remove_entry() {
        let mut idx = make_index();
        idx.stage_file("file.txt", b"content", EntryMode::Regular).unwrap();
        let removed = idx.remove("file.txt").unwrap();
        assert_eq!(removed.path, "file.txt");
        assert!(idx.is_empty());
        assert!(matches!(idx.remove("file.txt"), Err(IndexError::PathNotFound(_))));
    }

    #[test]
    fn conflict_workflow() {
        let mut idx = make_index();
        idx.stage_file("conflict.txt", b"ours", EntryMode::Regular).unwrap();

        idx.mark_conflict("conflict.txt").unwrap();
        assert!(idx.has_conflicts());
        assert_eq!(idx.conflict_paths(), vec!["conflict.txt".to_string()]);

        let resolved = ObjectId::from_bytes(b"resolved content");
        idx.resolve_conflict("conflict.txt", resolved).unwrap();
        assert!(!idx.has_conflicts());
        assert_eq!(idx.get("conflict.txt").unwrap().object_id, resolved);
    }

    #[test]
    fn resolve_without_conflict_errors() {
        let mut idx = make_index();
        idx.stage_file("clean.txt", b"ok", EntryMode::Regular).unwrap();
        let result = idx.resolve_conflict("clean.txt", ObjectId::from_bytes(b"x"));
        assert!(matches!(result, Err(IndexError::PathNotFound(_))));
    }

    #[test]
    fn write_tree_and_read_tree_roundtrip() {
        let store = make_store();
        let mut idx = Index::new(Arc::clone(&store));
        idx.stage_file("alpha.txt", b"alpha content", EntryMode::Regular).unwrap();
        idx.stage_file("dir/beta.txt", b"beta content", EntryMode::Executable).unwrap();

        let tree_id = idx.write_tree().unwrap();
        assert_eq!(idx.tree_cache(), Some(tree_id));

        let mut idx2 = Index::new(Arc::clone(&store));
        idx2.stage_file("stale.txt", b"dropped on reset", EntryMode::Regular).unwrap();
        idx2.read_tree(&tree_id).unwrap();

        assert_eq!(idx2.len(), 2);
        assert!(idx2.get("stale.txt").is_none());
        assert_eq!(idx2.get("dir/beta.txt").unwrap().mode, EntryMode::Executable);
        assert_eq!(idx2.write_tree().unwrap(), tree_id);
    }

    #[test]
    fn write_tree_fails_with_conflicts() {
        let mut idx = make_index();
        idx.stage_file("file.txt", b"data", EntryMode::Regular).unwrap();
        idx.mark_conflict("file.txt").unwrap();

        let result = idx.write_tree();
        assert!(matches!(result, Err(IndexError::UnresolvedConflict(paths)) if paths == ["file.txt"]));
    }

    #[test]
    fn read_missing_tree_reports_object() {
        let mut idx = make_index();
        let missing = ObjectId::from_bytes(b"missing tree");
        assert!(matches!(
            idx.read_tree(&missing),
            Err(IndexError::ObjectNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn tree_cache_invalidated_on_changes() {
        let mut idx = make_index();
        idx.stage_file("a.txt", b"aaa", EntryMode::Regular).unwrap();
        let first = idx.write_tree().unwrap();
        assert!(idx.tree_cache().is_some());

        idx.stage_file("b.txt", b"bbb", EntryMode::Regular).unwrap();
        assert!(idx.tree_cache().is_none());
        assert_ne!(idx.write_tree().unwrap(), first);
    }

    #[test]
    fn stage_object_by_id() {
        let store = make_store();
        let oid = store.write_blob(b"pre-stored").unwrap();

        let mut idx = Index::new(store);
        idx.stage_object("pre.txt", oid, EntryMode::Regular).unwrap();
        assert_eq!(idx.get("pre.txt").unwrap().object_id, oid);
    }
}
