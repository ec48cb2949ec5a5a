use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

/// Persistent disk mounted on the hosted deployment
pub const HOSTED_DATA_DIR: &str = "/var/data";

const LOCK_FILE: &str = ".lock";

/// Configuration for where rating data lives on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the player store and match logs
    pub data_dir: PathBuf,
    /// Player store file name (default: "characters.json")
    pub players_file: String,
    /// Head-to-head match log file name (default: "match_log.json")
    pub match_log_file: String,
    /// Free-for-all log file name (default: "placement_log.json")
    pub placement_log_file: String,
    /// Most recent submission summary (default: "last_result.json")
    pub last_result_file: String
}

impl StorageConfig {
    /// Resolves the storage layout from the environment. An explicit
    /// directory wins; otherwise `RENDER` selects the hosted disk and
    /// anything else falls back to the working directory.
    pub fn from_env(data_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir
            .or_else(|| env::var("DATA_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| {
                if env::var("RENDER").is_ok() {
                    PathBuf::from(HOSTED_DATA_DIR)
                } else {
                    PathBuf::from(".")
                }
            });

        Self {
            data_dir,
            ..Self::default()
        }
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(&self.players_file)
    }

    pub fn match_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.match_log_file)
    }

    pub fn placement_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.placement_log_file)
    }

    pub fn last_result_path(&self) -> PathBuf {
        self.data_dir.join(&self.last_result_file)
    }

    /// Advisory lock file shared by every process using this directory
    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join(LOCK_FILE)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            players_file: "characters.json".to_string(),
            match_log_file: "match_log.json".to_string(),
            placement_log_file: "placement_log.json".to_string(),
            last_result_file: "last_result.json".to_string()
        }
    }
}
