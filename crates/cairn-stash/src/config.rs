//! Stash configuration.

use serde::{Deserialize, Serialize};

/// Author recorded on stash commits when none is configured.
pub const DEFAULT_AUTHOR: &str = "cairn";

/// Settings for [`StashManager`](crate::StashManager).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StashConfig {
    /// Author of index and working commits. Falls back to [`DEFAULT_AUTHOR`].
    pub author: Option<String>,
    /// Default for [`ApplyOptions::reinstate_index`](crate::ApplyOptions).
    pub reinstate_index: bool,
}

impl StashConfig {
    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or(DEFAULT_AUTHOR)
    }
}

impl Default for StashConfig {
    fn default() -> Self {
        Self {
            author: None,
            reinstate_index: true,
        }
    }
}
