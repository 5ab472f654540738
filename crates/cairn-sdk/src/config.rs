//! Repository configuration, read from `<root>/.cairn/config.toml`.

use std::path::Path;

use cairn_stash::StashConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Directory holding repository metadata, relative to the root.
pub const DEFAULT_METADATA_DIR: &str = ".cairn";

/// Configuration file name inside the metadata directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Repository settings. Every field is optional in the file.
///
/// ```toml
/// author = "alice"
/// default_branch = "trunk"
///
/// [stash]
/// reinstate_index = false
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Author recorded on commits, and on stash commits unless
    /// `stash.author` says otherwise.
    pub author: String,
    /// Branch HEAD names in a fresh repository.
    pub default_branch: String,
    /// Directory the working tree walk never enters.
    pub metadata_dir: String,
    pub stash: StashConfig,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            author: "cairn".into(),
            default_branch: "main".into(),
            metadata_dir: DEFAULT_METADATA_DIR.into(),
            stash: StashConfig::default(),
        }
    }
}

impl RepoConfig {
    pub fn from_toml_str(source: &str) -> SdkResult<Self> {
        toml::from_str(source).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read a config file.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// The stash settings with the repository author filled in.
    pub fn stash_config(&self) -> StashConfig {
        let mut stash = self.stash.clone();
        stash.author.get_or_insert_with(|| self.author.clone());
        stash
    }
}
