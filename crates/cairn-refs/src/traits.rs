//! The [`RefStore`] trait defining the reference storage interface.

use cairn_types::ObjectId;

use crate::error::Result;
use crate::types::{Head, Ref};

/// Storage backend for named references.
///
/// Implementations must be thread-safe (`Send + Sync`). The namespace follows
/// git's layout:
///
/// - `refs/heads/*` for branches
/// - `refs/tags/*` for tags
/// - `refs/stash` for the stash log pointer
pub trait RefStore: Send + Sync {
    /// Read a ref by its canonical name (e.g. "refs/heads/main").
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    fn read_ref(&self, name: &str) -> Result<Option<Ref>>;

    /// Create or update a ref at the given canonical name.
    ///
    /// Fails if a tag already exists at `name`.
    fn write_ref(&self, name: &str, reference: &Ref) -> Result<()>;

    /// Delete a ref. Returns `Ok(false)` if it did not exist.
    fn delete_ref(&self, name: &str) -> Result<bool>;

    /// List all refs whose canonical name starts with `prefix`, sorted by name.
    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Ref)>>;

    /// Returns `Ok(None)` if HEAD has not been set.
    fn head(&self) -> Result<Option<Head>>;

    /// Point HEAD at a branch (symbolic ref).
    fn set_head(&self, branch: &str) -> Result<()>;

    fn set_head_detached(&self, commit: ObjectId) -> Result<()>;

    fn branches(&self) -> Result<Vec<(String, Ref)>> {
        self.list_refs("refs/heads/")
    }

    fn tags(&self) -> Result<Vec<(String, Ref)>> {
        self.list_refs("refs/tags/")
    }

    /// The branch HEAD names, or `None` when detached or unset.
    fn current_branch(&self) -> Result<Option<String>> {
        Ok(match self.head()? {
            Some(Head::Symbolic(name)) => Some(name),
            _ => None,
        })
    }

    /// The commit HEAD currently resolves to.
    ///
    /// `None` means HEAD is unset or names a branch with no commits yet.
    fn resolve_head(&self) -> Result<Option<ObjectId>> {
        match self.head()? {
            Some(Head::Symbolic(branch)) => Ok(self
                .read_ref(&format!("refs/heads/{branch}"))?
                .map(|r| *r.target())),
            Some(Head::Detached(commit)) => Ok(Some(commit)),
            None => Ok(None),
        }
    }

    /// Advance whatever HEAD points at to `commit`.
    ///
    /// A symbolic HEAD moves its branch; a detached or unset HEAD is detached
    /// at `commit`.
    fn advance_head(&self, commit: ObjectId) -> Result<()> {
        match self.head()? {
            Some(Head::Symbolic(branch)) => {
                self.write_ref(&format!("refs/heads/{branch}"), &Ref::branch(branch, commit))
            }
            _ => self.set_head_detached(commit),
        }
    }
}
