//! Per-path reconciliation plan for applying a stash entry.
//!
//! Given the entry's base, index and working trees, every path touched by
//! either diff (base -> index, index -> working) gets a [`PathPlan`]: what the
//! index should hold, what the working tree should hold, and which live
//! states are safe to overwrite.

use cairn_diff::diff_tree_objects;
use cairn_index::IndexEntry;
use cairn_store::{Tree, TreeEntry};
use cairn_types::ObjectId;

/// What applying does to the index at one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexTarget {
    /// Not staged in the entry (or staging is not being reinstated).
    Untouched,
    Stage(TreeEntry),
    Remove,
}

impl IndexTarget {
    fn object_id(&self) -> Option<ObjectId> {
        match self {
            IndexTarget::Stage(entry) => Some(entry.object_id),
            IndexTarget::Untouched | IndexTarget::Remove => None,
        }
    }
}

/// Why a path cannot be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Divergence {
    /// The live index entry is an unresolved merge conflict.
    IndexConflicted,
    /// The live index holds neither the base nor the target blob.
    Index,
    /// The working tree holds neither the base nor the target content.
    Worktree,
}

/// Reinstate plan for one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPlan {
    pub path: String,
    /// The path in the base tree.
    pub base: Option<TreeEntry>,
    pub index: IndexTarget,
    /// Final working tree content, `None` to delete.
    pub worktree: Option<TreeEntry>,
}

impl PathPlan {
    fn base_id(&self) -> Option<ObjectId> {
        self.base.as_ref().map(|e| e.object_id)
    }

    /// Check the live state of the path against what the entry expects.
    ///
    /// Content is compared by blob id. A side is acceptable when it still
    /// holds the base content or already holds the target.
    pub fn check(
        &self,
        live_index: Option<&IndexEntry>,
        live_content: Option<ObjectId>,
    ) -> Result<(), Divergence> {
        if live_index.is_some_and(|e| e.conflict) {
            return Err(Divergence::IndexConflicted);
        }

        let base = self.base_id();
        let staged = live_index.map(|e| e.object_id);
        let index_ok = staged == base
            || (self.index != IndexTarget::Untouched && staged == self.index.object_id());
        if !index_ok {
            return Err(Divergence::Index);
        }

        let target = self.worktree.as_ref().map(|e| e.object_id);
        if live_content != base && live_content != target {
            return Err(Divergence::Worktree);
        }
        Ok(())
    }
}

/// Build the plan for every path that differs between the three trees.
///
/// Plans come back in path order.
pub fn plan(base: &Tree, index: &Tree, working: &Tree, reinstate_index: bool) -> Vec<PathPlan> {
    let staged = diff_tree_objects(Some(base), index);
    let unstaged = diff_tree_objects(Some(index), working);

    let mut paths: Vec<&str> = staged.paths().chain(unstaged.paths()).collect();
    paths.sort_unstable();
    paths.dedup();

    paths
        .into_iter()
        .map(|path| {
            let index_target = if reinstate_index && staged.get(path).is_some() {
                match index.get(path) {
                    Some(entry) => IndexTarget::Stage(entry.clone()),
                    None => IndexTarget::Remove,
                }
            } else {
                IndexTarget::Untouched
            };
            PathPlan {
                path: path.to_string(),
                base: base.get(path).cloned(),
                index: index_target,
                worktree: working.get(path).cloned(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_store::{Blob, EntryMode};

    fn file(path: &str, content: &str) -> TreeEntry {
        TreeEntry::new(EntryMode::Regular, path, Blob::id_of(content.as_bytes()))
    }

    fn id(content: &str) -> Option<ObjectId> {
        Some(Blob::id_of(content.as_bytes()))
    }

    fn live(path: &str, content: &str) -> IndexEntry {
        IndexEntry::from(&file(path, content))
    }

    /// Three files as in a typical mixed stash:
    /// `both` staged then edited, `staged` staged only, `edited` edited only.
    fn mixed() -> (Tree, Tree, Tree) {
        let base = Tree::new(vec![
            file("both", "b0"),
            file("staged", "s0"),
            file("edited", "e0"),
            file("same", "x"),
        ]);
        let index = Tree::new(vec![
            file("both", "b1"),
            file("staged", "s1"),
            file("edited", "e0"),
            file("same", "x"),
        ]);
        let working = Tree::new(vec![
            file("both", "b2"),
            file("staged", "s1"),
            file("edited", "e1"),
            file("same", "x"),
        ]);
        (base, index, working)
    }

    #[test]
    fn plan_splits_staged_and_unstaged() {
        let (base, index, working) = mixed();
        let plans = plan(&base, &index, &working, true);

        let paths: Vec<_> = plans.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["both", "edited", "staged"]);

        assert_eq!(plans[0].index, IndexTarget::Stage(file("both", "b1")));
        assert_eq!(plans[0].worktree, Some(file("both", "b2")));
        assert_eq!(plans[1].index, IndexTarget::Untouched);
        assert_eq!(plans[1].worktree, Some(file("edited", "e1")));
        assert_eq!(plans[2].index, IndexTarget::Stage(file("staged", "s1")));
    }

    #[test]
    fn without_reinstate_index_nothing_is_staged() {
        let (base, index, working) = mixed();
        let plans = plan(&base, &index, &working, false);
        assert!(plans.iter().all(|p| p.index == IndexTarget::Untouched));
        assert_eq!(plans[2].worktree, Some(file("staged", "s1")));
    }

    #[test]
    fn staged_deletion_removes_from_index() {
        let base = Tree::new(vec![file("gone", "g")]);
        let empty = Tree::empty();
        let plans = plan(&base, &empty, &empty, true);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].index, IndexTarget::Remove);
        assert_eq!(plans[0].worktree, None);
        assert_eq!(plans[0].check(Some(&live("gone", "g")), id("g")), Ok(()));
        assert_eq!(plans[0].check(None, None), Ok(()));
    }

    #[test]
    fn check_accepts_base_or_target() {
        let (base, index, working) = mixed();
        let both = &plan(&base, &index, &working, true)[0];

        assert_eq!(both.check(Some(&live("both", "b0")), id("b0")), Ok(()));
        assert_eq!(both.check(Some(&live("both", "b1")), id("b2")), Ok(()));
    }

    #[test]
    fn check_rejects_diverged_sides() {
        let (base, index, working) = mixed();
        let plans = plan(&base, &index, &working, true);
        let both = &plans[0];
        let edited = &plans[1];

        assert_eq!(
            both.check(Some(&live("both", "other")), id("b0")),
            Err(Divergence::Index)
        );
        assert_eq!(
            both.check(Some(&live("both", "b0")), id("other")),
            Err(Divergence::Worktree)
        );
        assert_eq!(both.check(Some(&live("both", "b0")), None), Err(Divergence::Worktree));
        // Unstaged-only paths expect the index to still hold the base.
        assert_eq!(
            edited.check(Some(&live("edited", "e1")), id("e0")),
            Err(Divergence::Index)
        );

        let mut conflicted = live("both", "b0");
        conflicted.conflict = true;
        assert_eq!(
            both.check(Some(&conflicted), id("b0")),
            Err(Divergence::IndexConflicted)
        );
    }

    #[test]
    fn added_path_accepts_absence() {
        let base = Tree::empty();
        let index = Tree::new(vec![file("new", "n")]);
        let plans = plan(&base, &index, &index, true);
        assert_eq!(plans[0].base, None);
        assert_eq!(plans[0].check(None, None), Ok(()));
        assert_eq!(
            plans[0].check(None, id("squatter")),
            Err(Divergence::Worktree)
        );
    }
}
