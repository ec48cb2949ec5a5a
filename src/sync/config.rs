use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

/// Configuration for mirroring the data directory to a git remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Whether the sync worker runs at all
    pub enabled: bool,
    /// Working tree to commit from
    pub repo_dir: PathBuf,
    /// Remote to push to (default: "origin")
    pub remote: String,
    /// Branch to push (default: "main")
    pub branch: String,
    /// Commit message for every sync
    pub commit_message: String
}

impl SyncConfig {
    /// Creates a sync configuration from environment variables
    pub fn from_env(enabled: bool, repo_dir: PathBuf) -> Self {
        let defaults = Self::default();

        Self {
            enabled,
            repo_dir,
            remote: env::var("SYNC_REMOTE").unwrap_or(defaults.remote),
            branch: env::var("SYNC_BRANCH").unwrap_or(defaults.branch),
            commit_message: env::var("SYNC_COMMIT_MESSAGE").unwrap_or(defaults.commit_message)
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            repo_dir: PathBuf::from("."),
            remote: "origin".to_string(),
            branch: "main".to_string(),
            commit_message: "Auto-update from match submission".to_string()
        }
    }
}
