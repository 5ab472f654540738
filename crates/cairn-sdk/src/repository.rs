use std::path::{Path, PathBuf};
use std::sync::Arc;

use cairn_index::{Index, IndexError};
use cairn_refs::{InMemoryRefStore, RefStore};
use cairn_stash::{StashContext, StashManager};
use cairn_store::{Commit, EntryMode, InMemoryObjectStore, ObjectStore};
use cairn_types::{ObjectId, Stamp};
use cairn_worktree::{compute_status, DiskWorkTree, MemoryWorkTree, RepositoryStatus, WorkingTree};
use tracing::info;

use crate::config::{RepoConfig, CONFIG_FILE, DEFAULT_METADATA_DIR};
use crate::error::{SdkError, SdkResult};
use crate::stashes::Stashes;

/// A Cairn repository: objects and refs in memory, files in a working tree.
pub struct Repository {
    config: RepoConfig,
    root: Option<PathBuf>,
    store: Arc<dyn ObjectStore>,
    refs: InMemoryRefStore,
    index: Index,
    worktree: Box<dyn WorkingTree>,
    stash: StashManager,
}

impl Repository {
    /// A repository whose working tree lives in memory.
    pub fn in_memory(config: RepoConfig) -> SdkResult<Self> {
        Self::assemble(config, None, Box::new(MemoryWorkTree::new()))
    }

    /// A repository over the directory `root`, which must exist.
    ///
    /// Reads `<root>/.cairn/config.toml` when present.
    pub fn init_at(root: impl AsRef<Path>) -> SdkResult<Self> {
        let root = root.as_ref();
        let config_path = root.join(DEFAULT_METADATA_DIR).join(CONFIG_FILE);
        let config = if config_path.is_file() {
            RepoConfig::load(&config_path)?
        } else {
            RepoConfig::default()
        };
        Self::init_at_with(root, config)
    }

    /// A repository over `root` with an explicit configuration.
    pub fn init_at_with(root: impl AsRef<Path>, config: RepoConfig) -> SdkResult<Self> {
        let root = root.as_ref().to_path_buf();
        let worktree = DiskWorkTree::open(&root, config.metadata_dir.clone())?;
        Self::assemble(config, Some(root), Box::new(worktree))
    }

    fn assemble(
        config: RepoConfig,
        root: Option<PathBuf>,
        worktree: Box<dyn WorkingTree>,
    ) -> SdkResult<Self> {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
        let refs = InMemoryRefStore::new();
        refs.set_head(&config.default_branch)?;

        info!(
            branch = %config.default_branch,
            root = ?root,
            "repository initialized"
        );
        Ok(Self {
            index: Index::new(Arc::clone(&store)),
            stash: StashManager::new(config.stash_config()),
            config,
            root,
            store,
            refs,
            worktree,
        })
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// Root directory, `None` for an in-memory working tree.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub fn refs(&self) -> &dyn RefStore {
        &self.refs
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    // ---- Working tree ----

    pub fn write_file(&mut self, path: &str, content: &[u8]) -> SdkResult<()> {
        Ok(self.worktree.write(path, content)?)
    }

    pub fn read_file(&self, path: &str) -> SdkResult<Option<Vec<u8>>> {
        Ok(self.worktree.read(path)?)
    }

    pub fn remove_file(&mut self, path: &str) -> SdkResult<bool> {
        Ok(self.worktree.remove(path)?)
    }

    /// Blob id of the staged content at `path`.
    pub fn staged_id(&self, path: &str) -> Option<ObjectId> {
        self.index.get(path).map(|e| e.object_id)
    }

    /// Staged content at `path`.
    pub fn read_staged(&self, path: &str) -> SdkResult<Option<Vec<u8>>> {
        match self.staged_id(path) {
            Some(id) => Ok(Some(self.store.read_blob(&id)?)),
            None => Ok(None),
        }
    }

    // ---- Index ----

    /// Stage the working tree content of `path`, or its deletion when the
    /// file is gone.
    pub fn add(&mut self, path: &str) -> SdkResult<()> {
        match self.worktree.read(path)? {
            Some(content) => {
                let mode = self.index.get(path).map(|e| e.mode).unwrap_or_default();
                self.index.stage_file(path, &content, mode)?;
            }
            None if self.index.contains(path) => {
                self.index.remove(path)?;
            }
            None => return Err(IndexError::PathNotFound(path.to_string()).into()),
        }
        Ok(())
    }

    /// Stage every visible file and every deletion of a tracked one.
    pub fn add_all(&mut self) -> SdkResult<()> {
        let listed = self.worktree.list()?;
        let gone: Vec<String> = self
            .index
            .entries()
            .filter(|e| listed.binary_search(&e.path).is_err())
            .map(|e| e.path.clone())
            .collect();
        for path in listed.iter().chain(&gone) {
            self.add(path)?;
        }
        Ok(())
    }

    /// Stage `content` at `path` with an explicit mode, without touching the
    /// working tree.
    pub fn stage(&mut self, path: &str, content: &[u8], mode: EntryMode) -> SdkResult<ObjectId> {
        Ok(self.index.stage_file(path, content, mode)?)
    }

    // ---- History ----

    /// Record the index as a new commit and advance HEAD to it.
    pub fn commit(&mut self, message: &str) -> SdkResult<ObjectId> {
        let tree = self.index.write_tree()?;
        let parent = self.refs.resolve_head()?;

        let timestamp = match &parent {
            Some(id) => {
                let previous = self.store.read_commit(id)?;
                if previous.tree == tree {
                    return Err(SdkError::NothingToCommit);
                }
                Stamp::after(&previous.timestamp)
            }
            None if self.index.is_empty() => return Err(SdkError::NothingToCommit),
            None => Stamp::now(),
        };

        let commit = Commit::new(
            tree,
            parent.into_iter().collect(),
            self.config.author.clone(),
            message,
            timestamp,
        );
        let id = self.store.write_commit(&commit)?;
        self.refs.advance_head(id)?;

        info!(commit = %id.short_hex(), tree = %tree.short_hex(), subject = commit.subject(), "committed");
        Ok(id)
    }

    pub fn head_commit(&self) -> SdkResult<Option<ObjectId>> {
        Ok(self.refs.resolve_head()?)
    }

    pub fn current_branch(&self) -> SdkResult<Option<String>> {
        Ok(self.refs.current_branch()?)
    }

    /// Classify every path against HEAD, the index and the working tree.
    pub fn status(&self) -> SdkResult<RepositoryStatus> {
        let head_tree = match self.refs.resolve_head()? {
            Some(id) => Some(self.store.read_commit(&id)?.tree),
            None => None,
        };
        Ok(compute_status(
            self.store.as_ref(),
            head_tree.as_ref(),
            &self.index,
            self.worktree.as_ref(),
        )?)
    }

    // ---- Stash ----

    /// Stash operations on this repository.
    pub fn stashes(&mut self) -> Stashes<'_> {
        Stashes::new(self)
    }

    pub(crate) fn stash_parts(&mut self) -> (&StashManager, StashContext<'_>) {
        let ctx = StashContext {
            store: self.store.as_ref(),
            refs: &self.refs,
            index: &mut self.index,
            worktree: self.worktree.as_mut(),
        };
        (&self.stash, ctx)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .field("index", &self.index)
            .field("refs", &self.refs)
            .finish_non_exhaustive()
    }
}
