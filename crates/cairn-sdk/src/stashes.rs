//! The stash facade returned by [`Repository::stashes`].

use cairn_diff::{FilePatch, TreeDiff};
use cairn_stash::{ApplyOptions, StashEntry, StashList, StashRef};

use crate::error::SdkResult;
use crate::repository::Repository;

/// Stash operations bound to one repository.
///
/// Selectors accept anything convertible to [`StashRef`]: a position, an
/// [`ObjectId`](cairn_types::ObjectId), a `&StashEntry`, or `StashRef::Latest`.
pub struct Stashes<'a> {
    repo: &'a mut Repository,
}

impl<'a> Stashes<'a> {
    pub(crate) fn new(repo: &'a mut Repository) -> Self {
        Self { repo }
    }

    /// Shelve local changes. `None` generates a `WIP on ...` comment.
    pub fn create(&mut self, comment: Option<&str>) -> SdkResult<StashEntry> {
        let (stash, mut ctx) = self.repo.stash_parts();
        Ok(stash.create(&mut ctx, comment)?)
    }

    pub fn list(&mut self) -> SdkResult<StashList> {
        let (stash, ctx) = self.repo.stash_parts();
        Ok(stash.list(&ctx)?)
    }

    pub fn count(&mut self) -> SdkResult<usize> {
        let (stash, ctx) = self.repo.stash_parts();
        Ok(stash.count(&ctx)?)
    }

    /// The most recent entry, if any.
    pub fn first(&mut self) -> SdkResult<Option<StashEntry>> {
        Ok(self.list()?.into_iter().next())
    }

    pub fn get(&mut self, selector: impl Into<StashRef>) -> SdkResult<StashEntry> {
        let (stash, ctx) = self.repo.stash_parts();
        Ok(stash.get(&ctx, selector.into())?)
    }

    pub fn show(&mut self, selector: impl Into<StashRef>) -> SdkResult<TreeDiff> {
        let (stash, ctx) = self.repo.stash_parts();
        Ok(stash.show(&ctx, selector.into())?)
    }

    pub fn show_patch(&mut self, selector: impl Into<StashRef>) -> SdkResult<Vec<FilePatch>> {
        let (stash, ctx) = self.repo.stash_parts();
        Ok(stash.show_patch(&ctx, selector.into())?)
    }

    pub fn apply(&mut self, selector: impl Into<StashRef>) -> SdkResult<StashEntry> {
        let (stash, mut ctx) = self.repo.stash_parts();
        Ok(stash.apply(&mut ctx, selector.into())?)
    }

    pub fn apply_with(
        &mut self,
        selector: impl Into<StashRef>,
        options: ApplyOptions,
    ) -> SdkResult<StashEntry> {
        let (stash, mut ctx) = self.repo.stash_parts();
        Ok(stash.apply_with(&mut ctx, selector.into(), options)?)
    }

    pub fn pop(&mut self, selector: impl Into<StashRef>) -> SdkResult<StashEntry> {
        let (stash, mut ctx) = self.repo.stash_parts();
        Ok(stash.pop(&mut ctx, selector.into())?)
    }

    pub fn drop(&mut self, selector: impl Into<StashRef>) -> SdkResult<StashEntry> {
        let (stash, ctx) = self.repo.stash_parts();
        Ok(stash.drop(&ctx, selector.into())?)
    }

    /// Remove every entry and return how many there were.
    pub fn clear(&mut self) -> SdkResult<usize> {
        let (stash, ctx) = self.repo.stash_parts();
        Ok(stash.clear(&ctx)?)
    }
}
