use std::{fs::File, path::PathBuf};

use thiserror::Error;

use crate::model::{
    rating_store::RatingStore,
    structures::{
        match_record::{LastResult, MatchRecord},
        placement_record::PlacementRecord
    }
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("Failed to (de)serialize {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error
    },

    #[error("Store lock poisoned")]
    Poisoned
}

/// Exclusive hold on a store for one read-modify-write. Dropping it
/// releases the lock.
#[derive(Debug, Default)]
pub struct StoreGuard {
    _lock_file: Option<File>
}

impl StoreGuard {
    pub fn file(lock_file: File) -> Self {
        StoreGuard {
            _lock_file: Some(lock_file)
        }
    }
}

/// Where ratings and logs are kept. A store with no data yet must load as
/// empty rather than fail.
///
/// Every write that touches more than one file goes through a `commit_*`
/// method, which either lands completely or leaves the store as it was.
pub trait Persistence {
    /// Blocks until no other writer holds the store. Stores that cannot be
    /// shared between processes need no lock.
    fn lock(&self) -> Result<StoreGuard, StoreError> {
        Ok(StoreGuard::default())
    }

    fn load_rating_store(&self) -> Result<RatingStore, StoreError>;
    /// Replaces the ratings alone, for changes that are not logged (decay, badges).
    fn save_rating_store(&self, store: &RatingStore) -> Result<(), StoreError>;

    fn load_match_log(&self) -> Result<Vec<MatchRecord>, StoreError>;
    fn load_placement_log(&self) -> Result<Vec<PlacementRecord>, StoreError>;
    fn load_last_result(&self) -> Result<Option<LastResult>, StoreError>;

    /// Appends `record` to the match log and replaces the ratings and the last result.
    fn commit_match(&self, record: &MatchRecord, store: &RatingStore, last: &LastResult) -> Result<(), StoreError>;

    /// Appends `record` to the placement log and replaces the ratings.
    fn commit_placement(&self, record: &PlacementRecord, store: &RatingStore) -> Result<(), StoreError>;

    /// Swaps in the output of a replay: both logs, the ratings and, when
    /// there is one, the last result.
    fn commit_rebuild(
        &self,
        store: &RatingStore,
        match_log: &[MatchRecord],
        placement_log: &[PlacementRecord],
        last: Option<&LastResult>
    ) -> Result<(), StoreError>;

    /// Snapshots current data under `label` before a destructive rewrite.
    fn backup(&self, _label: &str) -> Result<(), StoreError> {
        Ok(())
    }

    /// Removes all ratings, logs and the last result.
    fn reset(&self) -> Result<(), StoreError>;
}
