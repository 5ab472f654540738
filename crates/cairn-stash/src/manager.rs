//! The stash manager: create, enumerate, apply and discard stash entries.

use cairn_diff::{diff_patches, diff_trees, FilePatch, TreeDiff};
use cairn_index::Index;
use cairn_refs::{Ref, RefStore, STASH_REF};
use cairn_store::{Commit, ObjectStore};
use cairn_types::Stamp;
use cairn_worktree::{tracked_paths, WorkingTree};
use tracing::{debug, info, warn};

use crate::config::StashConfig;
use crate::entry::{ApplyOptions, StashEntry, StashList, StashLog, StashRef};
use crate::error::{StashError, StashResult};
use crate::reconcile::{self, IndexTarget};

/// The collaborators every stash operation works against.
///
/// Operations that only read or rewrite the stash log take `&StashContext`;
/// create and apply need it mutably to touch the index and working tree.
pub struct StashContext<'a> {
    pub store: &'a dyn ObjectStore,
    pub refs: &'a dyn RefStore,
    pub index: &'a mut Index,
    pub worktree: &'a mut dyn WorkingTree,
}

/// Stash operations. Holds configuration only; all state lives in the
/// object store and `refs/stash`.
#[derive(Clone, Debug, Default)]
pub struct StashManager {
    config: StashConfig,
}

impl StashManager {
    pub fn new(config: StashConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StashConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Create
    // ---------------------------------------------------------------

    /// Shelve staged and unstaged changes, then reset the index and the
    /// tracked part of the working tree to HEAD.
    ///
    /// Untracked files are neither recorded nor touched. Without a comment
    /// the entry is labelled `WIP on <branch>: <short id> <subject>`.
    pub fn create(
        &self,
        ctx: &mut StashContext<'_>,
        comment: Option<&str>,
    ) -> StashResult<StashEntry> {
        let base_commit = ctx
            .refs
            .resolve_head()?
            .ok_or(StashError::NoInitialCommit)?;
        let base = ctx.store.read_commit(&base_commit)?;
        let base_tree = ctx.store.read_tree(&base.tree)?;

        let index_tree = ctx.index.write_tree()?;
        let tracked = tracked_paths(&*ctx.index, Some(&base_tree));
        let working_tree = ctx.worktree.snapshot(ctx.store, &tracked)?;

        if index_tree == base.tree && working_tree == index_tree {
            return Err(StashError::NothingToStash);
        }

        let mut log = read_log(ctx)?;
        let branch = ctx.refs.current_branch()?;
        let created_at = log
            .latest()
            .map(|latest| Stamp::after(&latest.created_at))
            .unwrap_or_else(Stamp::now);

        let label = format!(
            "{}: {} {}",
            branch.as_deref().unwrap_or("(no branch)"),
            base_commit.short_hex(),
            base.subject()
        );
        let comment = match comment {
            Some(c) if !c.trim().is_empty() => c.to_string(),
            _ => format!("WIP on {label}"),
        };

        let author = self.config.author();
        let index_commit = ctx.store.write_commit(&Commit::new(
            index_tree,
            vec![base_commit],
            author,
            format!("index on {label}"),
            created_at,
        ))?;
        let working_commit = if working_tree != index_tree {
            Some(ctx.store.write_commit(&Commit::new(
                working_tree,
                vec![index_commit],
                author,
                comment.clone(),
                created_at,
            ))?)
        } else {
            None
        };

        let entry = StashEntry {
            id: working_commit.unwrap_or(index_commit),
            comment,
            branch,
            base_commit,
            index_commit,
            working_commit,
            base_tree: base.tree,
            index_tree,
            working_tree,
            created_at,
        };
        if !log.push(entry.clone()) {
            return Err(StashError::InvalidEntry(format!(
                "duplicate stash id {}",
                entry.id.short_hex()
            )));
        }
        write_log(ctx, &log)?;

        ctx.worktree.reset(ctx.store, &base_tree, &tracked)?;
        ctx.index.read_tree(&base.tree)?;

        info!(
            id = %entry.id.short_hex(),
            base = %base_commit.short_hex(),
            staged = entry.has_staged_changes(),
            unstaged = entry.has_unstaged_changes(),
            comment = %entry.comment,
            "stash created"
        );
        Ok(entry)
    }

    // ---------------------------------------------------------------
    // Enumerate
    // ---------------------------------------------------------------

    /// Snapshot of all entries, most recent first.
    pub fn list(&self, ctx: &StashContext<'_>) -> StashResult<StashList> {
        Ok(read_log(ctx)?.snapshot())
    }

    pub fn count(&self, ctx: &StashContext<'_>) -> StashResult<usize> {
        Ok(read_log(ctx)?.len())
    }

    pub fn get(&self, ctx: &StashContext<'_>, selector: StashRef) -> StashResult<StashEntry> {
        read_log(ctx)?
            .get(selector)
            .cloned()
            .ok_or_else(|| invalid(selector))
    }

    /// What applying the entry would change relative to its base.
    pub fn show(&self, ctx: &StashContext<'_>, selector: StashRef) -> StashResult<TreeDiff> {
        let entry = self.get(ctx, selector)?;
        Ok(diff_trees(
            ctx.store,
            Some(&entry.base_tree),
            &entry.working_tree,
        )?)
    }

    /// [`show`](Self::show) down to line level.
    pub fn show_patch(
        &self,
        ctx: &StashContext<'_>,
        selector: StashRef,
    ) -> StashResult<Vec<FilePatch>> {
        let entry = self.get(ctx, selector)?;
        Ok(diff_patches(
            ctx.store,
            Some(&entry.base_tree),
            &entry.working_tree,
        )?)
    }

    // ---------------------------------------------------------------
    // Apply
    // ---------------------------------------------------------------

    /// Apply with the configured defaults.
    pub fn apply(&self, ctx: &mut StashContext<'_>, selector: StashRef) -> StashResult<StashEntry> {
        let options = ApplyOptions {
            reinstate_index: self.config.reinstate_index,
        };
        self.apply_with(ctx, selector, options)
    }

    /// Reinstate an entry over the current index and working tree.
    ///
    /// Each path is applied whole or not at all. Paths whose live index or
    /// working content is neither the entry's base nor its target are left
    /// untouched and reported in [`StashError::StashConflict`] once every
    /// other path has been written. The entry stays in the log.
    pub fn apply_with(
        &self,
        ctx: &mut StashContext<'_>,
        selector: StashRef,
        options: ApplyOptions,
    ) -> StashResult<StashEntry> {
        let entry = self.get(ctx, selector)?;
        let base = ctx.store.read_tree(&entry.base_tree)?;
        let index = ctx.store.read_tree(&entry.index_tree)?;
        let working = ctx.store.read_tree(&entry.working_tree)?;

        let plans = reconcile::plan(&base, &index, &working, options.reinstate_index);
        let mut conflicts = Vec::new();
        let mut ready = Vec::with_capacity(plans.len());

        for plan in &plans {
            let live_content = ctx.worktree.content_id(&plan.path)?;
            match plan.check(ctx.index.get(&plan.path), live_content) {
                Ok(()) => ready.push(plan),
                Err(divergence) => {
                    warn!(path = %plan.path, ?divergence, "stash path diverged; left untouched");
                    conflicts.push(plan.path.clone());
                }
            }
        }

        // Deletions go first so a file can take the place of a directory
        // emptied by them, and the other way round.
        ready.sort_by_key(|plan| plan.worktree.is_some());
        for plan in ready {
            let content = plan.worktree.as_ref().map(|e| &e.object_id);
            ctx.worktree.checkout(ctx.store, &plan.path, content)?;
            match &plan.index {
                IndexTarget::Untouched => {}
                IndexTarget::Stage(e) => ctx.index.stage_object(&plan.path, e.object_id, e.mode)?,
                IndexTarget::Remove => {
                    if ctx.index.contains(&plan.path) {
                        ctx.index.remove(&plan.path)?;
                    }
                }
            }
            debug!(path = %plan.path, index = ?plan.index, "stash path applied");
        }

        if !conflicts.is_empty() {
            warn!(id = %entry.id.short_hex(), conflicts = conflicts.len(), "stash applied with conflicts");
            return Err(StashError::StashConflict { paths: conflicts });
        }

        info!(
            id = %entry.id.short_hex(),
            paths = plans.len(),
            reinstate_index = options.reinstate_index,
            "stash applied"
        );
        Ok(entry)
    }

    /// Apply, then drop the entry. On any failure the entry stays.
    pub fn pop(&self, ctx: &mut StashContext<'_>, selector: StashRef) -> StashResult<StashEntry> {
        let entry = self.apply(ctx, selector)?;
        self.drop(ctx, StashRef::from(&entry))
    }

    // ---------------------------------------------------------------
    // Discard
    // ---------------------------------------------------------------

    /// Remove one entry from the log. The index and working tree are not
    /// touched.
    pub fn drop(&self, ctx: &StashContext<'_>, selector: StashRef) -> StashResult<StashEntry> {
        let mut log = read_log(ctx)?;
        let position = log.position(selector).ok_or_else(|| invalid(selector))?;
        let entry = log.remove(position);
        write_log(ctx, &log)?;

        info!(id = %entry.id.short_hex(), position, remaining = log.len(), "stash dropped");
        Ok(entry)
    }

    /// Remove every entry. Returns how many there were.
    pub fn clear(&self, ctx: &StashContext<'_>) -> StashResult<usize> {
        let count = read_log(ctx)?.len();
        ctx.refs.delete_ref(STASH_REF)?;
        info!(count, "stash cleared");
        Ok(count)
    }
}

fn invalid(selector: StashRef) -> StashError {
    StashError::InvalidEntry(format!("no stash entry {selector}"))
}

fn read_log(ctx: &StashContext<'_>) -> StashResult<StashLog> {
    match ctx.refs.read_ref(STASH_REF)? {
        None => Ok(StashLog::new()),
        Some(Ref::Stash { log }) => {
            let stored = ctx.store.read_required(&log)?;
            Ok(StashLog::from_stored_object(&stored)?)
        }
        Some(other) => Err(StashError::InvalidEntry(format!(
            "{STASH_REF} holds {} instead of a stash log",
            other.canonical_name()
        ))),
    }
}

/// Store `log` and move `refs/stash` to it. An empty log removes the ref.
fn write_log(ctx: &StashContext<'_>, log: &StashLog) -> StashResult<()> {
    if log.is_empty() {
        ctx.refs.delete_ref(STASH_REF)?;
        return Ok(());
    }
    let id = ctx.store.write(&log.to_stored_object()?)?;
    ctx.refs.write_ref(STASH_REF, &Ref::Stash { log: id })?;
    debug!(log = %id.short_hex(), entries = log.len(), "stash log written");
    Ok(())
}
