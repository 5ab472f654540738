use std::collections::HashMap;
use std::sync::RwLock;

use cairn_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. Objects are held behind a `RwLock` and
/// cloned on read/write.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.objects()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.objects()?.is_empty())
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> StoreResult<u64> {
        Ok(self.objects()?.values().map(StoredObject::size).sum())
    }

    fn objects(
        &self,
    ) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<ObjectId, StoredObject>>> {
        self.objects
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        Ok(self.objects()?.get(id).cloned())
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }
        let mut map = self
            .objects
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        // Same id always maps to the same content, so an existing entry wins.
        map.entry(id).or_insert_with(|| object.clone());
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.objects()?.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.objects.read().map(|m| m.len()).unwrap_or_default();
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::*;
    use cairn_types::Stamp;

    #[test]
    fn write_and_read_blob() {
        let store = InMemoryObjectStore::new();
        let id = store.write_blob(b"hello world").unwrap();
        assert!(!id.is_null());
        assert_eq!(store.read_blob(&id).unwrap(), b"hello world");
    }

    #[test]
    fn write_is_idempotent() {
        let store = InMemoryObjectStore::new();
        let id1 = store.write_blob(b"same").unwrap();
        let id2 = store.write_blob(b"same").unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.total_bytes().unwrap(), 4);
    }

    #[test]
    fn tree_and_commit_helpers() {
        let store = InMemoryObjectStore::new();
        let blob = store.write_blob(b"t1-111").unwrap();
        let tree = Tree::new(vec![TreeEntry::new(EntryMode::Regular, "test1", blob)]);
        let tree_id = store.write_tree(&tree).unwrap();
        assert_eq!(store.read_tree(&tree_id).unwrap(), tree);

        let commit = Commit::new(tree_id, vec![], "tester", "init", Stamp::new(1, 0));
        let commit_id = store.write_commit(&commit).unwrap();
        assert_eq!(store.read_commit(&commit_id).unwrap(), commit);
        assert!(store.exists(&commit_id).unwrap());
    }

    #[test]
    fn read_missing_object() {
        let store = InMemoryObjectStore::new();
        let id = ObjectId::from_bytes(b"nope");
        assert!(store.read(&id).unwrap().is_none());
        assert!(matches!(
            store.read_tree(&id),
            Err(StoreError::NotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn typed_read_rejects_wrong_kind() {
        let store = InMemoryObjectStore::new();
        let blob = store.write_blob(b"just bytes").unwrap();
        assert!(matches!(
            store.read_commit(&blob),
            Err(StoreError::CorruptObject { .. })
        ));
    }

    #[test]
    fn empty_store() {
        let store = InMemoryObjectStore::default();
        assert!(store.is_empty().unwrap());
        assert_eq!(format!("{store:?}"), "InMemoryObjectStore { object_count: 0 }");
    }
}
