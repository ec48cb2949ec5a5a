use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    database::store::{Persistence, StoreError, StoreGuard},
    model::{
        decay::decay,
        error::RatingError,
        match_engine::MatchRatingEngine,
        placement::PlacementRankingEngine,
        rating_store::{LeaderboardRow, RatingStore},
        rating_utils::format_timestamp,
        replay::ReplayEngine,
        structures::{
            character::Character,
            match_record::{LastResult, MatchFacts, MatchRecord},
            placement_record::PlacementRecord,
            rating_parameters::RatingParameters,
            winner::Winner
        }
    },
    sync::{DirtyReason, SyncNotifier}
};

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error(transparent)]
    Rating(#[from] RatingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Processor lock poisoned")]
    Poisoned
}

/// Raw match facts as reported by a submitter. Character and winner tags
/// are validated by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSubmission {
    pub player1: String,
    pub character1: String,
    pub player2: String,
    pub character2: String,
    pub winner: String,
    pub three_stock: bool
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadToHead {
    pub wins: usize,
    pub losses: usize,
    /// Percent of matches won, one decimal
    pub win_rate: f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub name: String,
    pub global_rating: i32,
    /// Highest rated first
    pub ratings: Vec<(Character, i32)>,
    pub total_characters: usize,
    pub best_character: Option<Character>,
    pub worst_character: Option<Character>,
    pub total_matches: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub placement_rating: Option<i32>,
    pub badges: Vec<String>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RebuildSummary {
    pub players: usize,
    pub matches: usize,
    pub sessions: usize
}

/// Percentage rounded to one decimal, half to even. Zero when nothing was played.
fn win_rate(wins: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    (wins as f64 / total as f64 * 1000.0).round_ties_even() / 10.0
}

fn validate_pair(player1: &str, player2: &str) -> Result<(), RatingError> {
    if player1.is_empty() || player2.is_empty() {
        return Err(RatingError::EmptyPlayerName);
    }
    if player1 == player2 {
        return Err(RatingError::DuplicateParticipant(player1.to_string()));
    }

    Ok(())
}

/// Drives the rating engines against a persistence backend.
///
/// Every operation that reads or writes ratings holds the processor lock and
/// the store lock for its whole read-modify-write, so two submissions never
/// interleave, whether they come from threads or from separate processes
/// sharing a data directory, and a rebuild never overlaps a submission.
pub struct RatingProcessor<P: Persistence> {
    persistence: P,
    engine: ReplayEngine,
    notifier: Option<Box<dyn SyncNotifier>>,
    lock: Mutex<()>
}

impl<P: Persistence> RatingProcessor<P> {
    pub fn new(persistence: P) -> Self {
        Self::with_parameters(persistence, RatingParameters::default())
    }

    pub fn with_parameters(persistence: P, params: RatingParameters) -> Self {
        RatingProcessor {
            persistence,
            engine: ReplayEngine::new(MatchRatingEngine::new(params), PlacementRankingEngine::default()),
            notifier: None,
            lock: Mutex::new(())
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn SyncNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn lock(&self) -> Result<(MutexGuard<'_, ()>, StoreGuard), ProcessorError> {
        let guard = self.lock.lock().map_err(|_| ProcessorError::Poisoned)?;
        let store_guard = self.persistence.lock()?;
        Ok((guard, store_guard))
    }

    fn notify(&self, reason: DirtyReason) {
        if let Some(notifier) = &self.notifier {
            notifier.mark_dirty(reason);
        }
    }

    /// Rates a head-to-head match played at `now` and persists it.
    ///
    /// The log entry, both ratings and the last result are committed together.
    /// On error none of them has changed.
    pub fn submit_match(&self, submission: &MatchSubmission, now: NaiveDateTime) -> Result<MatchRecord, ProcessorError> {
        validate_pair(&submission.player1, &submission.player2)?;
        let facts = MatchFacts {
            timestamp: Some(format_timestamp(now)),
            player1: submission.player1.clone(),
            character1: Character::parse(&submission.character1)?,
            player2: submission.player2.clone(),
            character2: Character::parse(&submission.character2)?,
            winner: submission.winner.parse::<Winner>()?,
            three_stock: submission.three_stock
        };

        let _guard = self.lock()?;
        let mut store = self.persistence.load_rating_store()?;

        let projection = self.engine.apply(&mut store, &facts);
        store.player_mut(&facts.player1).touch(now.date());
        store.player_mut(&facts.player2).touch(now.date());

        let record = MatchRecord { facts, projection };
        self.persistence
            .commit_match(&record, &store, &LastResult::from(&record))?;

        info!(
            p1 = %record.facts.player1,
            p2 = %record.facts.player2,
            winner = %record.facts.winner_name(),
            diff1 = record.projection.diff1,
            diff2 = record.projection.diff2,
            "Match recorded"
        );
        self.notify(DirtyReason::MatchSubmitted);

        Ok(record)
    }

    /// Rates a free-for-all session. `order` runs from first place to last.
    pub fn submit_placement(&self, order: &[String], now: NaiveDateTime) -> Result<PlacementRecord, ProcessorError> {
        PlacementRankingEngine::validate(order)?;

        let _guard = self.lock()?;
        let mut store = self.persistence.load_rating_store()?;

        let prior = store.placement_ratings(order);
        let results = self.engine.placement_engine.apply_placements(order, &prior)?;
        for result in &results {
            let player = store.player_mut(&result.player);
            player.set_placement_rating(result.rating_after);
            player.touch(now.date());
        }

        let record = PlacementRecord {
            timestamp: Some(format_timestamp(now)),
            order: order.to_vec(),
            results
        };
        self.persistence.commit_placement(&record, &store)?;

        info!(participants = order.len(), "Placement session recorded");
        self.notify(DirtyReason::PlacementSubmitted);

        Ok(record)
    }

    /// Zero for a player who has never played.
    pub fn global_rating(&self, player: &str) -> Result<i32, ProcessorError> {
        let _guard = self.lock()?;
        Ok(self.persistence.load_rating_store()?.global_rating(player))
    }

    /// Record of `player_a` against `player_b`, from `player_a`'s side.
    pub fn head_to_head(&self, player_a: &str, player_b: &str) -> Result<HeadToHead, ProcessorError> {
        let _guard = self.lock()?;

        let store = self.persistence.load_rating_store()?;
        for player in [player_a, player_b] {
            if !store.contains(player) {
                return Err(RatingError::MissingPlayer(player.to_string()).into());
            }
        }

        let log = self.persistence.load_match_log()?;
        let (wins, losses) = log
            .iter()
            .filter(|r| r.facts.is_between(player_a, player_b))
            .fold((0, 0), |(w, l), r| {
                if r.facts.winner_name() == player_a {
                    (w + 1, l)
                } else {
                    (w, l + 1)
                }
            });

        Ok(HeadToHead {
            wins,
            losses,
            win_rate: win_rate(wins, wins + losses)
        })
    }

    /// Decays every player as of `today`, then ranks them by global rating.
    pub fn leaderboard(&self, today: NaiveDate) -> Result<Vec<LeaderboardRow>, ProcessorError> {
        let _guard = self.lock()?;
        let mut store = self.persistence.load_rating_store()?;

        let decayed = store
            .players_mut()
            .filter_map(|(name, record)| decay(record, today).map(|_| name.clone()))
            .collect_vec();

        if !decayed.is_empty() {
            debug!(players = ?decayed, "Decayed inactive players");
            self.persistence.save_rating_store(&store)?;
            self.notify(DirtyReason::Decayed);
        }

        Ok(store.leaderboard())
    }

    /// Decays `name` as of `today`, then summarizes their record.
    pub fn player_stats(&self, name: &str, today: NaiveDate) -> Result<PlayerStats, ProcessorError> {
        let _guard = self.lock()?;
        let mut store = self.persistence.load_rating_store()?;

        let record = store
            .get_mut(name)
            .ok_or_else(|| RatingError::MissingPlayer(name.to_string()))?;
        let decayed = decay(record, today).is_some();
        let record = record.clone();

        if decayed {
            self.persistence.save_rating_store(&store)?;
            self.notify(DirtyReason::Decayed);
        }

        let log = self.persistence.load_match_log()?;
        let (wins, losses) = log
            .iter()
            .filter(|r| r.facts.involves(name))
            .fold((0, 0), |(w, l), r| {
                if r.facts.winner_name() == name {
                    (w + 1, l)
                } else {
                    (w, l + 1)
                }
            });
        let (best_character, worst_character) = record.best_and_worst().unzip();

        Ok(PlayerStats {
            name: name.to_string(),
            global_rating: store.global_rating(name),
            ratings: record
                .ratings
                .iter()
                .map(|(c, r)| (*c, *r))
                .sorted_by(|a, b| b.1.cmp(&a.1))
                .collect(),
            total_characters: record.ratings.len(),
            best_character,
            worst_character,
            total_matches: wins + losses,
            wins,
            losses,
            win_rate: win_rate(wins, wins + losses),
            placement_rating: record.placement_rating,
            badges: record.badges.into_iter().collect()
        })
    }

    /// Recomputes every rating from the logs and swaps the result in. The
    /// previous files are backed up under `label` first. Badges are not
    /// derivable from the logs and are carried over.
    pub fn rebuild(&self, label: &str) -> Result<RebuildSummary, ProcessorError> {
        let _guard = self.lock()?;

        self.persistence.backup(label)?;
        let previous = self.persistence.load_rating_store()?;
        let match_log = self.persistence.load_match_log()?;
        let placement_log = self.persistence.load_placement_log()?;
        info!(matches = match_log.len(), sessions = placement_log.len(), "Rebuilding ratings");

        let mut replay = self.engine.rebuild(&match_log);
        let placements = self.engine.rebuild_placements(&mut replay.store, &placement_log);

        for (name, old) in previous.players() {
            if old.badges.is_empty() {
                continue;
            }
            match replay.store.get_mut(name) {
                Some(record) => record.badges.extend(old.badges.iter().cloned()),
                None => warn!(player = %name, "Dropping badges of player absent from the logs")
            }
        }

        let last = replay.log.last().map(LastResult::from);
        self.persistence
            .commit_rebuild(&replay.store, &replay.log, &placements, last.as_ref())?;

        let summary = RebuildSummary {
            players: replay.store.len(),
            matches: replay.log.len(),
            sessions: placements.len()
        };
        info!(?summary, "Rebuild complete");
        self.notify(DirtyReason::Rebuilt);

        Ok(summary)
    }

    /// Wipes every player, both logs and the last result.
    pub fn reset(&self) -> Result<(), ProcessorError> {
        let _guard = self.lock()?;
        self.persistence.reset()?;

        warn!("All ratings and logs have been reset");
        self.notify(DirtyReason::Reset);
        Ok(())
    }

    pub fn last_result(&self) -> Result<Option<LastResult>, ProcessorError> {
        let _guard = self.lock()?;
        Ok(self.persistence.load_last_result()?)
    }

    /// Returns true if the badge was newly unlocked.
    pub fn award_badge(&self, player: &str, badge: &str) -> Result<bool, ProcessorError> {
        let _guard = self.lock()?;
        let mut store = self.persistence.load_rating_store()?;

        let record = store
            .get_mut(player)
            .ok_or_else(|| RatingError::MissingPlayer(player.to_string()))?;
        if !record.award_badge(badge) {
            return Ok(false);
        }

        self.persistence.save_rating_store(&store)?;
        info!(player, badge, "Badge unlocked");
        self.notify(DirtyReason::BadgeAwarded);
        Ok(true)
    }

    /// Current in-memory view of the store, without applying decay.
    pub fn snapshot(&self) -> Result<RatingStore, ProcessorError> {
        let _guard = self.lock()?;
        Ok(self.persistence.load_rating_store()?)
    }
}
