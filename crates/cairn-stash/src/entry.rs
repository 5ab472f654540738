//! Stash records, the stash log and selectors.

use std::ops::Index;

use cairn_store::{ObjectKind, StoreResult, StoredObject};
use cairn_types::{ObjectId, Stamp};
use serde::{Deserialize, Serialize};

/// One shelved change set. Immutable once written to the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashEntry {
    /// The working commit, or the index commit when there is none.
    pub id: ObjectId,
    pub comment: String,
    /// Branch HEAD named when the entry was created.
    pub branch: Option<String>,
    pub base_commit: ObjectId,
    pub index_commit: ObjectId,
    /// Absent when the working tree matched the index exactly.
    pub working_commit: Option<ObjectId>,
    pub base_tree: ObjectId,
    pub index_tree: ObjectId,
    /// Equal to `index_tree` when there is no working commit.
    pub working_tree: ObjectId,
    pub created_at: Stamp,
}

impl StashEntry {
    pub fn has_staged_changes(&self) -> bool {
        self.index_tree != self.base_tree
    }

    pub fn has_unstaged_changes(&self) -> bool {
        self.working_tree != self.index_tree
    }
}

/// Picks one entry of the stash log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StashRef {
    /// The most recent entry, position 0.
    #[default]
    Latest,
    /// Zero-based position, most recent first.
    Position(usize),
    Id(ObjectId),
}

impl From<&StashEntry> for StashRef {
    fn from(entry: &StashEntry) -> Self {
        StashRef::Id(entry.id)
    }
}

impl From<usize> for StashRef {
    fn from(position: usize) -> Self {
        StashRef::Position(position)
    }
}

impl From<ObjectId> for StashRef {
    fn from(id: ObjectId) -> Self {
        StashRef::Id(id)
    }
}

impl std::fmt::Display for StashRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StashRef::Latest => write!(f, "stash@{{0}}"),
            StashRef::Position(n) => write!(f, "stash@{{{n}}}"),
            StashRef::Id(id) => write!(f, "{}", id.short_hex()),
        }
    }
}

/// How [`StashManager::apply_with`](crate::StashManager::apply_with) reinstates an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Restage what was staged. When false, staged content only reaches the
    /// working tree.
    pub reinstate_index: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            reinstate_index: true,
        }
    }
}

/// The stored stack of entries, most recent first.
///
/// Serialized as a single `Stash` object; `refs/stash` names the current one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashLog {
    entries: Vec<StashEntry>,
}

impl StashLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&StashEntry> {
        self.entries.first()
    }

    /// Position of the selected entry, if present.
    pub fn position(&self, selector: StashRef) -> Option<usize> {
        match selector {
            StashRef::Latest => (!self.entries.is_empty()).then_some(0),
            StashRef::Position(n) => (n < self.entries.len()).then_some(n),
            StashRef::Id(id) => self.entries.iter().position(|e| e.id == id),
        }
    }

    pub fn get(&self, selector: StashRef) -> Option<&StashEntry> {
        self.position(selector).map(|i| &self.entries[i])
    }

    /// Push onto the top of the stack. Ids are unique within a log.
    pub(crate) fn push(&mut self, entry: StashEntry) -> bool {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return false;
        }
        self.entries.insert(0, entry);
        true
    }

    pub(crate) fn remove(&mut self, position: usize) -> StashEntry {
        self.entries.remove(position)
    }

    pub fn snapshot(&self) -> StashList {
        StashList {
            entries: self.entries.clone(),
        }
    }

    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        StoredObject::encode_json(ObjectKind::Stash, self)
    }

    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.decode_json(ObjectKind::Stash)
    }
}

/// An owned copy of the stash log taken at one point in time.
///
/// Later creates or drops do not affect a list already taken.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StashList {
    entries: Vec<StashEntry>,
}

impl StashList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&StashEntry> {
        self.entries.first()
    }

    pub fn get(&self, position: usize) -> Option<&StashEntry> {
        self.entries.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StashEntry> {
        self.entries.iter()
    }
}

impl Index<usize> for StashList {
    type Output = StashEntry;

    fn index(&self, position: usize) -> &StashEntry {
        &self.entries[position]
    }
}

impl IntoIterator for StashList {
    type Item = StashEntry;
    type IntoIter = std::vec::IntoIter<StashEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a StashList {
    type Item = &'a StashEntry;
    type IntoIter = std::slice::Iter<'a, StashEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tag: &[u8], logical: u32) -> StashEntry {
        let id = ObjectId::from_bytes(tag);
        StashEntry {
            id,
            comment: format!("entry {logical}"),
            branch: Some("main".into()),
            base_commit: ObjectId::from_bytes(b"base"),
            index_commit: id,
            working_commit: None,
            base_tree: ObjectId::from_bytes(b"B"),
            index_tree: ObjectId::from_bytes(b"I"),
            working_tree: ObjectId::from_bytes(b"I"),
            created_at: Stamp::new(1, logical),
        }
    }

    #[test]
    fn push_is_lifo_and_unique() {
        let mut log = StashLog::new();
        assert!(log.push(entry(b"one", 0)));
        assert!(log.push(entry(b"two", 1)));
        assert!(!log.push(entry(b"one", 2)));

        assert_eq!(log.len(), 2);
        assert_eq!(log.latest().unwrap().id, ObjectId::from_bytes(b"two"));
        assert_eq!(log.position(StashRef::Latest), Some(0));
        assert_eq!(log.position(StashRef::Position(1)), Some(1));
        assert_eq!(log.position(StashRef::Position(2)), None);
        assert_eq!(log.position(ObjectId::from_bytes(b"one").into()), Some(1));
    }

    #[test]
    fn latest_of_empty_log_is_none() {
        let log = StashLog::new();
        assert_eq!(log.position(StashRef::Latest), None);
        assert!(log.get(StashRef::default()).is_none());
    }

    #[test]
    fn snapshot_is_detached_from_log() {
        let mut log = StashLog::new();
        log.push(entry(b"one", 0));
        let list = log.snapshot();
        log.remove(0);

        assert!(log.is_empty());
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].comment, "entry 0");
        assert_eq!(list.iter().count(), 1);
        assert_eq!((&list).into_iter().count(), 1);
    }

    #[test]
    fn log_survives_storage_encoding() {
        let mut log = StashLog::new();
        log.push(entry(b"one", 0));
        let stored = log.to_stored_object().unwrap();
        assert_eq!(stored.kind, ObjectKind::Stash);
        assert_eq!(StashLog::from_stored_object(&stored).unwrap(), log);
    }

    #[test]
    fn entry_change_flags() {
        let e = entry(b"one", 0);
        assert!(e.has_staged_changes());
        assert!(!e.has_unstaged_changes());
    }

    #[test]
    fn selector_display() {
        assert_eq!(StashRef::Latest.to_string(), "stash@{0}");
        assert_eq!(StashRef::Position(3).to_string(), "stash@{3}");
    }
}
