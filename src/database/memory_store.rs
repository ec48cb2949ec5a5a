use std::sync::{Mutex, MutexGuard};

use super::store::{Persistence, StoreError};
use crate::model::{
    rating_store::RatingStore,
    structures::{
        match_record::{LastResult, MatchRecord},
        placement_record::PlacementRecord
    }
};

#[derive(Debug, Default, Clone)]
struct MemoryState {
    ratings: RatingStore,
    matches: Vec<MatchRecord>,
    placements: Vec<PlacementRecord>,
    last_result: Option<LastResult>,
    backups: Vec<String>,
    fail_writes: bool
}

/// Keeps everything in process memory. Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels passed to `backup`, oldest first.
    pub fn backups(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.state()?.backups.clone())
    }

    /// While set, every write fails without changing anything, the way a
    /// full disk would.
    pub fn fail_writes(&self, fail: bool) -> Result<(), StoreError> {
        self.state()?.fail_writes = fail;
        Ok(())
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }

    fn writable(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        let state = self.state()?;
        if state.fail_writes {
            return Err(StoreError::Io {
                path: "memory".into(),
                source: std::io::Error::other("simulated write failure")
            });
        }

        Ok(state)
    }
}

impl Persistence for MemoryStore {
    fn load_rating_store(&self) -> Result<RatingStore, StoreError> {
        Ok(self.state()?.ratings.clone())
    }

    fn save_rating_store(&self, store: &RatingStore) -> Result<(), StoreError> {
        self.writable()?.ratings = store.clone();
        Ok(())
    }

    fn load_match_log(&self) -> Result<Vec<MatchRecord>, StoreError> {
        Ok(self.state()?.matches.clone())
    }

    fn load_placement_log(&self) -> Result<Vec<PlacementRecord>, StoreError> {
        Ok(self.state()?.placements.clone())
    }

    fn load_last_result(&self) -> Result<Option<LastResult>, StoreError> {
        Ok(self.state()?.last_result.clone())
    }

    fn commit_match(&self, record: &MatchRecord, store: &RatingStore, last: &LastResult) -> Result<(), StoreError> {
        let mut state = self.writable()?;
        state.matches.push(record.clone());
        state.ratings = store.clone();
        state.last_result = Some(last.clone());
        Ok(())
    }

    fn commit_placement(&self, record: &PlacementRecord, store: &RatingStore) -> Result<(), StoreError> {
        let mut state = self.writable()?;
        state.placements.push(record.clone());
        state.ratings = store.clone();
        Ok(())
    }

    fn commit_rebuild(
        &self,
        store: &RatingStore,
        match_log: &[MatchRecord],
        placement_log: &[PlacementRecord],
        last: Option<&LastResult>
    ) -> Result<(), StoreError> {
        let mut state = self.writable()?;
        state.ratings = store.clone();
        state.matches = match_log.to_vec();
        state.placements = placement_log.to_vec();
        if let Some(last) = last {
            state.last_result = Some(last.clone());
        }
        Ok(())
    }

    fn backup(&self, label: &str) -> Result<(), StoreError> {
        self.writable()?.backups.push(label.to_string());
        Ok(())
    }

    fn reset(&self) -> Result<(), StoreError> {
        let mut state = self.writable()?;
        let backups = std::mem::take(&mut state.backups);
        *state = MemoryState {
            backups,
            ..MemoryState::default()
        };
        Ok(())
    }
}
