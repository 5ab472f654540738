use std::collections::BTreeMap;

use cairn_index::Index;
use cairn_store::{Blob, EntryMode, ObjectStore, Tree, TreeEntry};
use cairn_types::ObjectId;
use tracing::debug;

use crate::error::WorktreeResult;

/// Paths the repository tracks, with the mode each should be recorded with.
pub type TrackedPaths = BTreeMap<String, EntryMode>;

/// Every path in the index plus every path in `base`.
///
/// The index mode wins where both know a path.
pub fn tracked_paths(index: &Index, base: Option<&Tree>) -> TrackedPaths {
    let mut tracked: TrackedPaths = base
        .map(|tree| {
            tree.entries
                .iter()
                .map(|e| (e.path.clone(), e.mode))
                .collect()
        })
        .unwrap_or_default();
    tracked.extend(index.entries().map(|e| (e.path.clone(), e.mode)));
    tracked
}

/// File content addressed by repository-relative path.
///
/// Paths are slash-separated and validated by each backend.
pub trait WorkingTree: Send {
    /// Read a file. Returns `Ok(None)` if it does not exist.
    fn read(&self, path: &str) -> WorktreeResult<Option<Vec<u8>>>;

    /// Create or overwrite a file, creating parent directories as needed.
    fn write(&mut self, path: &str, content: &[u8]) -> WorktreeResult<()>;

    /// Delete a file. Returns `Ok(false)` if it did not exist.
    fn remove(&mut self, path: &str) -> WorktreeResult<bool>;

    /// Every visible file, sorted. Ignored files are not listed.
    fn list(&self) -> WorktreeResult<Vec<String>>;

    /// The blob id the file's current content would be stored under.
    fn content_id(&self, path: &str) -> WorktreeResult<Option<ObjectId>> {
        Ok(self.read(path)?.map(|content| Blob::id_of(&content)))
    }

    /// Write the current content of every tracked path to the store and
    /// return the id of a tree describing it. Tracked paths that are absent
    /// on disk are left out of the tree.
    fn snapshot(&self, store: &dyn ObjectStore, tracked: &TrackedPaths) -> WorktreeResult<ObjectId> {
        let mut entries = Vec::with_capacity(tracked.len());
        for (path, mode) in tracked {
            if let Some(content) = self.read(path)? {
                let blob = store.write_blob(&content)?;
                entries.push(TreeEntry::new(*mode, path.clone(), blob));
            }
        }
        let tree_id = store.write_tree(&Tree::new(entries))?;
        debug!(tree = %tree_id.short_hex(), tracked = tracked.len(), "working tree snapshot");
        Ok(tree_id)
    }

    /// Make the tracked part of the working tree match `tree`.
    ///
    /// Tracked paths missing from `tree` are deleted, every path of `tree` is
    /// written unless it already holds the right content. Untracked files are
    /// never touched.
    fn reset(
        &mut self,
        store: &dyn ObjectStore,
        tree: &Tree,
        tracked: &TrackedPaths,
    ) -> WorktreeResult<()> {
        for path in tracked.keys() {
            if tree.get(path).is_none() {
                self.remove(path)?;
            }
        }
        for entry in &tree.entries {
            self.checkout(store, &entry.path, Some(&entry.object_id))?;
        }
        Ok(())
    }

    /// Put one blob (or its absence) at `path`.
    fn checkout(
        &mut self,
        store: &dyn ObjectStore,
        path: &str,
        blob: Option<&ObjectId>,
    ) -> WorktreeResult<()> {
        match blob {
            Some(id) => {
                if self.content_id(path)?.as_ref() != Some(id) {
                    let content = store.read_blob(id)?;
                    self.write(path, &content)?;
                }
            }
            None => {
                self.remove(path)?;
            }
        }
        Ok(())
    }
}
