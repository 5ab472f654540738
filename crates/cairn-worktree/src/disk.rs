//! Working tree backed by a directory on disk.

use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cairn_index::check_path;
use ignore::WalkBuilder;
use tracing::debug;

use crate::error::{WorktreeError, WorktreeResult};
use crate::traits::WorkingTree;

/// Per-directory ignore file honoured by [`DiskWorkTree::list`].
pub const IGNORE_FILE: &str = ".cairnignore";

/// A working tree rooted at a directory.
///
/// The metadata directory (e.g. `.cairn`) directly under the root is never
/// listed, read or written.
#[derive(Clone, Debug)]
pub struct DiskWorkTree {
    root: PathBuf,
    metadata_dir: String,
}

impl DiskWorkTree {
    /// Open an existing directory as a working tree.
    pub fn open(root: impl Into<PathBuf>, metadata_dir: impl Into<String>) -> WorktreeResult<Self> {
        let root = root.into();
        let meta = fs::metadata(&root).map_err(|e| WorktreeError::io(&root, e))?;
        if !meta.is_dir() {
            return Err(WorktreeError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root,
            metadata_dir: metadata_dir.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> WorktreeResult<PathBuf> {
        check_path(path)
            .map_err(|reason| WorktreeError::InvalidPath(format!("{path:?}: {reason}")))?;
        if path.split('/').next() == Some(self.metadata_dir.as_str()) {
            return Err(WorktreeError::InvalidPath(format!(
                "{path:?}: inside metadata directory"
            )));
        }
        Ok(self.root.join(path))
    }

    /// Remove now-empty directories between `file` and the root.
    fn prune_empty_parents(&self, file: &Path) {
        let mut dir = file.parent();
        while let Some(d) = dir {
            if d == self.root || fs::remove_dir(d).is_err() {
                break;
            }
            dir = d.parent();
        }
    }
}

/// Whether `full` names a regular file. A directory at `full`, or a file
/// standing where one of its parent directories should be, means no file is
/// tracked there.
fn holds_file(full: &Path) -> bool {
    fs::metadata(full).is_ok_and(|m| m.is_file())
}

impl WorkingTree for DiskWorkTree {
    fn read(&self, path: &str) -> WorktreeResult<Option<Vec<u8>>> {
        let full = self.resolve(path)?;
        match fs::read(&full) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound || !holds_file(&full) => Ok(None),
            Err(e) => Err(WorktreeError::io(full, e)),
        }
    }

    fn write(&mut self, path: &str, content: &[u8]) -> WorktreeResult<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| WorktreeError::io(parent, e))?;
        }
        if full.is_dir() {
            // Only an empty directory gives way; untracked content inside stays.
            fs::remove_dir(&full).map_err(|e| WorktreeError::io(&full, e))?;
            debug!(path, "empty directory replaced by file");
        }
        fs::write(&full, content).map_err(|e| WorktreeError::io(&full, e))
    }

    fn remove(&mut self, path: &str) -> WorktreeResult<bool> {
        let full = self.resolve(path)?;
        match fs::remove_file(&full) {
            Ok(()) => {
                self.prune_empty_parents(&full);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound || !holds_file(&full) => Ok(false),
            Err(e) => Err(WorktreeError::io(full, e)),
        }
    }

    fn list(&self) -> WorktreeResult<Vec<String>> {
        let metadata_dir = self.metadata_dir.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .parents(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .add_custom_ignore_filename(IGNORE_FILE)
            .filter_entry(move |entry| {
                !(entry.depth() == 1 && entry.file_name() == OsStr::new(&metadata_dir))
            });

        let mut files = Vec::new();
        for result in builder.build() {
            let entry = result.map_err(|e| WorktreeError::Walk(e.to_string()))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| WorktreeError::Walk(e.to_string()))?;
            let path: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.push(path.join("/"));
        }
        files.sort();
        debug!(root = %self.root.display(), files = files.len(), "working tree listed");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, DiskWorkTree) {
        let dir = tempfile::tempdir().unwrap();
        let wt = DiskWorkTree::open(dir.path(), ".cairn").unwrap();
        (dir, wt)
    }

    #[test]
    fn write_read_nested() {
        let (_dir, mut wt) = open_temp();
        wt.write("src/deep/file.txt", b"content").unwrap();
        assert_eq!(wt.read("src/deep/file.txt").unwrap().unwrap(), b"content");
        assert!(wt.read("src/missing").unwrap().is_none());
    }

    #[test]
    fn remove_prunes_empty_directories() {
        let (dir, mut wt) = open_temp();
        wt.write("a/b/c.txt", b"x").unwrap();
        assert!(wt.remove("a/b/c.txt").unwrap());
        assert!(!dir.path().join("a").exists());
        assert!(dir.path().exists());
        assert!(!wt.remove("a/b/c.txt").unwrap());
    }

    #[test]
    fn directory_or_file_prefix_reads_as_absent() {
        let (_dir, mut wt) = open_temp();
        wt.write("a/b", b"inner").unwrap();
        assert!(wt.read("a").unwrap().is_none());
        assert!(wt.content_id("a").unwrap().is_none());
        assert!(!wt.remove("a").unwrap());

        wt.remove("a/b").unwrap();
        wt.write("a", b"file").unwrap();
        assert!(wt.read("a/b").unwrap().is_none());
        assert!(!wt.remove("a/b").unwrap());
        assert_eq!(wt.read("a").unwrap().unwrap(), b"file");
    }

    #[test]
    fn write_replaces_only_empty_directory() {
        let (dir, mut wt) = open_temp();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        wt.write("a", b"file").unwrap();
        assert_eq!(wt.read("a").unwrap().unwrap(), b"file");

        wt.write("b/keep.txt", b"untracked").unwrap();
        assert!(matches!(wt.write("b", b"file"), Err(WorktreeError::Io { .. })));
        assert_eq!(wt.read("b/keep.txt").unwrap().unwrap(), b"untracked");
    }

    #[test]
    fn list_skips_metadata_and_ignored() {
        let (dir, mut wt) = open_temp();
        fs::create_dir_all(dir.path().join(".cairn")).unwrap();
        fs::write(dir.path().join(".cairn/config.toml"), "author = \"x\"").unwrap();
        wt.write(IGNORE_FILE, b"*.log\n").unwrap();
        wt.write("keep.txt", b"1").unwrap();
        wt.write("sub/also.txt", b"2").unwrap();
        wt.write("debug.log", b"noise").unwrap();

        let files = wt.list().unwrap();
        assert_eq!(files, [IGNORE_FILE, "keep.txt", "sub/also.txt"]);
    }

    #[test]
    fn metadata_paths_are_rejected() {
        let (_dir, mut wt) = open_temp();
        assert!(matches!(
            wt.write(".cairn/config.toml", b"x"),
            Err(WorktreeError::InvalidPath(_))
        ));
    }

    #[test]
    fn open_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            DiskWorkTree::open(&file, ".cairn"),
            Err(WorktreeError::InvalidPath(_))
        ));
        assert!(matches!(
            DiskWorkTree::open(dir.path().join("absent"), ".cairn"),
            Err(WorktreeError::Io { .. })
        ));
    }
}
