use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::{
    model::{
        constants::REPLAY_PROGRESS_INTERVAL,
        match_engine::{MatchInput, MatchRatingEngine},
        placement::PlacementRankingEngine,
        rating_store::RatingStore,
        rating_utils::parse_timestamp,
        structures::{
            match_record::{MatchFacts, MatchProjection, MatchRecord},
            placement_record::PlacementRecord
        }
    },
    utils::progress_utils::progress_bar
};

/// Result of replaying a match log: the rebuilt store plus the log in
/// chronological order with every projection recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReplay {
    pub store: RatingStore,
    pub log: Vec<MatchRecord>
}

/// Anchor for entries whose timestamp is missing or unreadable. Such entries
/// sort ahead of dated ones and keep their relative order.
fn synthetic_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Sort key for the entry at `index`, and whether the timestamp was real.
fn ordering_key(timestamp: Option<&str>, index: usize) -> (NaiveDateTime, bool) {
    match timestamp.map(parse_timestamp) {
        Some(Ok(parsed)) => (parsed, true),
        Some(Err(e)) => {
            debug!(index, error = %e, "Assigning synthetic position");
            (synthetic_start() + Duration::minutes(index as i64), false)
        }
        None => (synthetic_start() + Duration::minutes(index as i64), false)
    }
}

/// Stable chronological order over `items`. Each element carries its parsed
/// time, or `None` when a synthetic position was used.
fn chronological<T>(items: &[T], timestamp: impl Fn(&T) -> Option<&str>) -> Vec<(&T, Option<NaiveDateTime>)> {
    let mut keyed = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let (key, real) = ordering_key(timestamp(item), index);
            (key, index, item, real)
        })
        .collect::<Vec<_>>();

    keyed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    keyed
        .into_iter()
        .map(|(key, _, item, real)| (item, real.then_some(key)))
        .collect()
}

/// Rebuilds ratings from scratch by replaying logs in chronological order.
/// Never touches live state; callers swap the result in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayEngine {
    pub match_engine: MatchRatingEngine,
    pub placement_engine: PlacementRankingEngine
}

impl ReplayEngine {
    pub fn new(match_engine: MatchRatingEngine, placement_engine: PlacementRankingEngine) -> ReplayEngine {
        ReplayEngine {
            match_engine,
            placement_engine
        }
    }

    /// Applies one match to `store` exactly as a live submission would:
    /// globals are read from the store as it stands before this match.
    pub fn apply(&self, store: &mut RatingStore, facts: &MatchFacts) -> MatchProjection {
        let p1_rating = store.ensure_character(&facts.player1, facts.character1);
        let p2_rating = store.ensure_character(&facts.player2, facts.character2);

        let input = MatchInput {
            p1_character: facts.character1,
            p2_character: facts.character2,
            p1_rating,
            p2_rating,
            p1_global: store.global_rating(&facts.player1),
            p2_global: store.global_rating(&facts.player2),
            winner: facts.winner,
            three_stock: facts.three_stock
        };
        let outcome = self.match_engine.apply_match(&input);
        debug!(
            expected = outcome.expected,
            multiplier = outcome.multiplier,
            three_stock = outcome.three_stock_applied,
            "Rated match"
        );

        store.set_character_rating(&facts.player1, facts.character1, outcome.p1_rating);
        store.set_character_rating(&facts.player2, facts.character2, outcome.p2_rating);

        MatchProjection {
            new1: outcome.p1_rating,
            diff1: outcome.p1_delta(&input),
            new2: outcome.p2_rating,
            diff2: outcome.p2_delta(&input)
        }
    }

    /// Replays the match log from an empty store. Input order does not matter
    /// beyond breaking ties between identical timestamps.
    pub fn rebuild(&self, log: &[MatchRecord]) -> MatchReplay {
        let ordered = chronological(log, |r| r.facts.timestamp.as_deref());
        let bar = progress_bar(ordered.len() as u64, "Replaying match log".to_string());

        let mut store = RatingStore::new();
        let mut rewritten = Vec::with_capacity(ordered.len());

        for (i, (record, played_at)) in ordered.into_iter().enumerate() {
            let projection = self.apply(&mut store, &record.facts);

            if let Some(played_at) = played_at {
                let date = played_at.date();
                store.player_mut(&record.facts.player1).touch(date);
                store.player_mut(&record.facts.player2).touch(date);
            }

            rewritten.push(MatchRecord {
                facts: record.facts.clone(),
                projection
            });

            bar.inc(1);
            if (i + 1) % REPLAY_PROGRESS_INTERVAL == 0 {
                info!("Processed {}/{} matches", i + 1, log.len());
            }
        }
        bar.finish_and_clear();

        info!(players = store.len(), matches = rewritten.len(), "Match replay complete");
        MatchReplay {
            store,
            log: rewritten
        }
    }

    /// Replays free-for-all sessions onto `store`, starting every participant's
    /// placement rating from scratch. Returns the log with results recomputed.
    /// Sessions that no longer validate are carried over without results.
    pub fn rebuild_placements(&self, store: &mut RatingStore, log: &[PlacementRecord]) -> Vec<PlacementRecord> {
        for (_, record) in store.players_mut() {
            record.placement_rating = None;
        }

        let ordered = chronological(log, |r| r.timestamp.as_deref());
        let mut rewritten = Vec::with_capacity(ordered.len());
        let mut ratings: HashMap<String, i32> = HashMap::new();

        for (record, played_at) in ordered {
            let results = match self.placement_engine.apply_placements(&record.order, &ratings) {
                Ok(results) => results,
                Err(e) => {
                    debug!(error = %e, "Skipping invalid placement session");
                    rewritten.push(PlacementRecord {
                        results: Vec::new(),
                        ..record.clone()
                    });
                    continue;
                }
            };

            for result in &results {
                ratings.insert(result.player.clone(), result.rating_after);

                let player = store.player_mut(&result.player);
                player.set_placement_rating(result.rating_after);
                if let Some(played_at) = played_at {
                    player.touch(played_at.date());
                }
            }

            rewritten.push(PlacementRecord {
                results,
                ..record.clone()
            });
        }

        info!(sessions = rewritten.len(), "Placement replay complete");
        rewritten
    }
}
