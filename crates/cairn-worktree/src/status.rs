//! Repository status: a partition of every known path into one bucket.
//!
//! Classification compares three sources, HEAD's tree, the index and the
//! working tree. Rules are checked in order and the first match wins, so a
//! path lands in at most one bucket:
//!
//! 1. conflicted index entry: `MergeConflict`
//! 2. in index, not in HEAD: `Added`
//! 3. in index and HEAD with a different blob or mode: `Staged`
//! 4. in HEAD, not in index: `Removed`
//! 5. in index, absent from the working tree: `Missing`
//! 6. in index, working content differs: `Modified`
//! 7. only in the working tree: `Untracked`

use std::collections::BTreeSet;

use cairn_index::Index;
use cairn_store::{ObjectStore, Tree};
use cairn_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::WorktreeResult;
use crate::traits::WorkingTree;

/// The bucket a path falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileStatus {
    Added,
    MergeConflict,
    Missing,
    Modified,
    Removed,
    Staged,
    Untracked,
}

/// Disjoint sets of paths, one per [`FileStatus`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStatus {
    pub added: BTreeSet<String>,
    pub merge_conflict: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub staged: BTreeSet<String>,
    pub untracked: BTreeSet<String>,
}

impl RepositoryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, status: FileStatus) -> &BTreeSet<String> {
        match status {
            FileStatus::Added => &self.added,
            FileStatus::MergeConflict => &self.merge_conflict,
            FileStatus::Missing => &self.missing,
            FileStatus::Modified => &self.modified,
            FileStatus::Removed => &self.removed,
            FileStatus::Staged => &self.staged,
            FileStatus::Untracked => &self.untracked,
        }
    }

    fn bucket_mut(&mut self, status: FileStatus) -> &mut BTreeSet<String> {
        match status {
            FileStatus::Added => &mut self.added,
            FileStatus::MergeConflict => &mut self.merge_conflict,
            FileStatus::Missing => &mut self.missing,
            FileStatus::Modified => &mut self.modified,
            FileStatus::Removed => &mut self.removed,
            FileStatus::Staged => &mut self.staged,
            FileStatus::Untracked => &mut self.untracked,
        }
    }

    /// Every bucket paired with its status, in a fixed order.
    pub fn buckets(&self) -> [(FileStatus, &BTreeSet<String>); 7] {
        [
            (FileStatus::Added, &self.added),
            (FileStatus::MergeConflict, &self.merge_conflict),
            (FileStatus::Missing, &self.missing),
            (FileStatus::Modified, &self.modified),
            (FileStatus::Removed, &self.removed),
            (FileStatus::Staged, &self.staged),
            (FileStatus::Untracked, &self.untracked),
        ]
    }

    /// The bucket holding `path`, if any.
    pub fn status_of(&self, path: &str) -> Option<FileStatus> {
        self.buckets()
            .into_iter()
            .find(|(_, set)| set.contains(path))
            .map(|(status, _)| status)
    }

    /// Total number of classified paths.
    pub fn len(&self) -> usize {
        self.buckets().iter().map(|(_, set)| set.len()).sum()
    }

    /// No changes of any kind, untracked files included.
    pub fn is_clean(&self) -> bool {
        self.len() == 0
    }

    /// Changes that a stash would capture: everything except untracked files.
    pub fn has_tracked_changes(&self) -> bool {
        self.len() > self.untracked.len()
    }
}

/// Classify every path known to HEAD, the index or the working tree.
///
/// `head_tree` is `None` before the first commit.
pub fn compute_status(
    store: &dyn ObjectStore,
    head_tree: Option<&ObjectId>,
    index: &Index,
    worktree: &dyn WorkingTree,
) -> WorktreeResult<RepositoryStatus> {
    let head = match head_tree {
        Some(id) => store.read_tree(id)?,
        None => Tree::empty(),
    };
    let on_disk = worktree.list()?;

    let mut paths: BTreeSet<&str> = head.paths().collect();
    paths.extend(index.entries().map(|e| e.path.as_str()));
    paths.extend(on_disk.iter().map(String::as_str));

    let mut status = RepositoryStatus::new();
    for path in paths {
        let staged = index.get(path);
        let committed = head.get(path);

        let bucket = match (committed, staged) {
            (_, Some(entry)) if entry.conflict => Some(FileStatus::MergeConflict),
            (None, Some(_)) => Some(FileStatus::Added),
            (Some(c), Some(entry)) if c.object_id != entry.object_id || c.mode != entry.mode => {
                Some(FileStatus::Staged)
            }
            (Some(_), None) => Some(FileStatus::Removed),
            (_, Some(entry)) => match worktree.content_id(path)? {
                None => Some(FileStatus::Missing),
                Some(id) if id != entry.object_id => Some(FileStatus::Modified),
                Some(_) => None,
            },
            (None, None) => Some(FileStatus::Untracked),
        };

        if let Some(bucket) = bucket {
            status.bucket_mut(bucket).insert(path.to_string());
        }
    }
    Ok(status)
}
