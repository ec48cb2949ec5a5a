use std::{
    fs::{self, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf}
};

use fs4::fs_std::FileExt;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info};

use super::{
    config::StorageConfig,
    store::{Persistence, StoreError, StoreGuard}
};
use crate::model::{
    rating_store::RatingStore,
    structures::{
        match_record::{LastResult, MatchRecord},
        placement_record::PlacementRecord
    }
};

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Pretty-printed JSON files under a single data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    config: StorageConfig
}

impl JsonStore {
    /// Opens the store, creating the data directory if needed.
    pub fn open(config: StorageConfig) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.data_dir).map_err(io_error(&config.data_dir))?;

        debug!(data_dir = %config.data_dir.display(), "Opened JSON store");
        Ok(JsonStore { config })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Serialization {
                path: path.to_path_buf(),
                source
            })
    }

    fn tmp_path(path: &Path) -> PathBuf {
        path.with_extension("json.tmp")
    }

    /// Writes `bytes` to the sibling temp file of `path` and returns it.
    fn stage_bytes(path: &Path, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        let tmp = Self::tmp_path(path);
        fs::write(&tmp, bytes).map_err(io_error(&tmp))?;
        Ok(tmp)
    }

    fn serialize<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<String, StoreError> {
        serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialization {
            path: path.to_path_buf(),
            source
        })
    }

    /// Writes to a sibling temp file and renames it over `path`, so readers
    /// never observe a half-written file.
    fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let tmp = Self::stage_bytes(path, bytes)?;
        fs::rename(&tmp, path).map_err(io_error(path))
    }

    fn write<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
        Self::write_bytes(path, Self::serialize(path, value)?.as_bytes())
    }

    fn remove(path: &Path) -> Result<(), StoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source
            })
        }
    }

    fn backup_path(path: &Path, label: &str) -> PathBuf {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("data");
        path.with_file_name(format!("{}_backup_{}.json", stem, label))
    }
}

/// Several files replaced as one unit. Every file is staged next to its
/// target before any target is touched; if a rename fails partway, the
/// targets already replaced get their previous contents back.
#[derive(Default)]
struct Transaction {
    staged: Vec<(PathBuf, PathBuf)>
}

impl Transaction {
    fn stage<T: Serialize + ?Sized>(&mut self, path: &Path, value: &T) -> Result<(), StoreError> {
        let json = JsonStore::serialize(path, value)?;
        let tmp = JsonStore::stage_bytes(path, json.as_bytes())?;
        self.staged.push((path.to_path_buf(), tmp));
        Ok(())
    }

    fn previous(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source
            })
        }
    }

    fn restore(path: &Path, previous: Option<&[u8]>) -> Result<(), StoreError> {
        match previous {
            Some(bytes) => JsonStore::write_bytes(path, bytes),
            None => JsonStore::remove(path)
        }
    }

    fn commit(mut self) -> Result<(), StoreError> {
        let previous = self
            .staged
            .iter()
            .map(|(target, _)| Self::previous(target))
            .collect::<Result<Vec<_>, _>>()?;

        for (i, (target, tmp)) in self.staged.iter().enumerate() {
            if let Err(source) = fs::rename(tmp, target) {
                for ((done, _), before) in self.staged[..i].iter().zip(&previous) {
                    if let Err(e) = Self::restore(done, before.as_deref()) {
                        error!(path = %done.display(), "Failed to roll back: {}", e);
                    }
                }

                return Err(StoreError::Io {
                    path: target.clone(),
                    source
                });
            }
        }

        self.staged.clear();
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        for (_, tmp) in &self.staged {
            let _ = fs::remove_file(tmp);
        }
    }
}

impl Persistence for JsonStore {
    /// Takes an exclusive advisory lock on the data directory. Separate
    /// processes sharing the directory queue up here.
    fn lock(&self) -> Result<StoreGuard, StoreError> {
        let path = self.config.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(io_error(&path))?;

        file.lock_exclusive().map_err(io_error(&path))?;
        Ok(StoreGuard::file(file))
    }

    fn load_rating_store(&self) -> Result<RatingStore, StoreError> {
        Ok(Self::read(&self.config.players_path())?.unwrap_or_default())
    }

    fn save_rating_store(&self, store: &RatingStore) -> Result<(), StoreError> {
        Self::write(&self.config.players_path(), store)
    }

    fn load_match_log(&self) -> Result<Vec<MatchRecord>, StoreError> {
        Ok(Self::read(&self.config.match_log_path())?.unwrap_or_default())
    }

    fn load_placement_log(&self) -> Result<Vec<PlacementRecord>, StoreError> {
        Ok(Self::read(&self.config.placement_log_path())?.unwrap_or_default())
    }

    fn load_last_result(&self) -> Result<Option<LastResult>, StoreError> {
        Self::read(&self.config.last_result_path())
    }

    fn commit_match(&self, record: &MatchRecord, store: &RatingStore, last: &LastResult) -> Result<(), StoreError> {
        let mut log = self.load_match_log()?;
        log.push(record.clone());

        let mut tx = Transaction::default();
        tx.stage(&self.config.match_log_path(), &log)?;
        tx.stage(&self.config.players_path(), store)?;
        tx.stage(&self.config.last_result_path(), last)?;
        tx.commit()
    }

    fn commit_placement(&self, record: &PlacementRecord, store: &RatingStore) -> Result<(), StoreError> {
        let mut log = self.load_placement_log()?;
        log.push(record.clone());

        let mut tx = Transaction::default();
        tx.stage(&self.config.placement_log_path(), &log)?;
        tx.stage(&self.config.players_path(), store)?;
        tx.commit()
    }

    fn commit_rebuild(
        &self,
        store: &RatingStore,
        match_log: &[MatchRecord],
        placement_log: &[PlacementRecord],
        last: Option<&LastResult>
    ) -> Result<(), StoreError> {
        let mut tx = Transaction::default();
        tx.stage(&self.config.match_log_path(), match_log)?;
        tx.stage(&self.config.placement_log_path(), placement_log)?;
        tx.stage(&self.config.players_path(), store)?;
        if let Some(last) = last {
            tx.stage(&self.config.last_result_path(), last)?;
        }
        tx.commit()
    }

    fn backup(&self, label: &str) -> Result<(), StoreError> {
        let paths = [
            self.config.players_path(),
            self.config.match_log_path(),
            self.config.placement_log_path()
        ];

        for path in paths.iter().filter(|p| p.exists()) {
            let target = Self::backup_path(path, label);
            fs::copy(path, &target).map_err(io_error(&target))?;
            info!(from = %path.display(), to = %target.display(), "Backup created");
        }

        Ok(())
    }

    fn reset(&self) -> Result<(), StoreError> {
        Self::remove(&self.config.players_path())?;
        Self::remove(&self.config.match_log_path())?;
        Self::remove(&self.config.placement_log_path())?;
        Self::remove(&self.config.last_result_path())
    }
}
