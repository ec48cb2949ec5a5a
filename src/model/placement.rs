use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::model::{
    constants::{DEFAULT_RATING, MAX_PLACEMENT_PARTICIPANTS, MIN_PLACEMENT_PARTICIPANTS, PLACEMENT_K, RATING_FLOOR},
    error::RatingError,
    rating_utils::{expected_score, round_rating},
    structures::placement_record::PlacementResult
};

/// Scores free-for-all sessions by splitting an n-way finish into every
/// pairwise 1-vs-1 result it implies.
#[derive(Debug, Clone, Copy)]
pub struct PlacementRankingEngine {
    pub k: f64
}

impl Default for PlacementRankingEngine {
    fn default() -> Self {
        PlacementRankingEngine { k: PLACEMENT_K }
    }
}

impl PlacementRankingEngine {
    /// Rejects finish orders that cannot be scored.
    pub fn validate(order: &[String]) -> Result<(), RatingError> {
        if order.len() < MIN_PLACEMENT_PARTICIPANTS {
            return Err(RatingError::InsufficientParticipants {
                min: MIN_PLACEMENT_PARTICIPANTS,
                actual: order.len()
            });
        }

        if order.len() > MAX_PLACEMENT_PARTICIPANTS {
            return Err(RatingError::TooManyParticipants {
                max: MAX_PLACEMENT_PARTICIPANTS,
                actual: order.len()
            });
        }

        let mut seen = HashSet::new();
        for name in order {
            if name.is_empty() {
                return Err(RatingError::EmptyPlayerName);
            }
            if !seen.insert(name.as_str()) {
                return Err(RatingError::DuplicateParticipant(name.clone()));
            }
        }

        Ok(())
    }

    /// Summed pairwise deltas, one per participant in finish order. Every
    /// pair contributes `+delta` to the higher finisher and `-delta` to the
    /// lower one, so the total is zero.
    pub fn raw_deltas(&self, ratings: &[i32]) -> Vec<f64> {
        let mut deltas = vec![0.0; ratings.len()];

        for (i, j) in (0..ratings.len()).tuple_combinations() {
            let expected_i = expected_score(ratings[i] as f64, ratings[j] as f64);
            let delta = self.k * (1.0 - expected_i);

            deltas[i] += delta;
            deltas[j] -= delta;
        }

        deltas
    }

    /// Rates a session. `order` runs from first place to last; participants
    /// missing from `prior` start at the default rating.
    pub fn apply_placements(
        &self,
        order: &[String],
        prior: &HashMap<String, i32>
    ) -> Result<Vec<PlacementResult>, RatingError> {
        Self::validate(order)?;

        let before = order
            .iter()
            .map(|name| prior.get(name).copied().unwrap_or(DEFAULT_RATING))
            .collect_vec();
        let deltas = self.raw_deltas(&before);

        let results = order
            .iter()
            .zip(before)
            .zip(deltas)
            .map(|((name, rating_before), raw_delta)| {
                let rating_after = round_rating(rating_before as f64 + raw_delta).max(RATING_FLOOR);

                PlacementResult {
                    player: name.clone(),
                    rating_before,
                    rating_after,
                    raw_delta,
                    applied_delta: rating_after - rating_before
                }
            })
            .collect();

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::model::{error::RatingError, placement::PlacementRankingEngine};
    use approx::assert_abs_diff_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("player{}", i)).collect()
    }

    #[test]
    fn test_four_equal_players() {
        let engine = PlacementRankingEngine::default();
        let deltas = engine.raw_deltas(&[1000, 1000, 1000, 1000]);

        assert_abs_diff_eq!(deltas[0], 36.0);
        assert_abs_diff_eq!(deltas[1], 12.0);
        assert_abs_diff_eq!(deltas[2], -12.0);
        assert_abs_diff_eq!(deltas[3], -36.0);
    }

    #[test]
    fn test_four_equal_players_applied() {
        let engine = PlacementRankingEngine::default();
        let prior = names(4).into_iter().map(|n| (n, 1100)).collect::<HashMap<_, _>>();
        let results = engine.apply_placements(&names(4), &prior).unwrap();

        let after = results.iter().map(|r| r.rating_after).collect::<Vec<_>>();
        assert_eq!(after, vec![1136, 1112, 1088, 1064]);
        assert_eq!(results[0].applied_delta, 36);
    }

    #[test]
    fn test_unrated_participants_start_at_default() {
        let engine = PlacementRankingEngine::default();
        let results = engine.apply_placements(&names(2), &HashMap::new()).unwrap();

        assert_eq!(results[0].rating_before, 1000);
        assert_eq!(results[0].rating_after, 1012);
        // -12 is clamped by the floor
        assert_eq!(results[1].rating_after, 1000);
        assert_eq!(results[1].applied_delta, 0);
        assert_abs_diff_eq!(results[1].raw_delta, -12.0);
    }

    #[test]
    fn test_zero_sum() {
        let engine = PlacementRankingEngine::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for n in 2..=8 {
            let ratings = (0..n).map(|_| rng.random_range(1000..2500)).collect::<Vec<i32>>();
            let total: f64 = engine.raw_deltas(&ratings).iter().sum();

            assert_abs_diff_eq!(total, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_floor_invariant() {
        let engine = PlacementRankingEngine::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..200 {
            let order = names(8);
            let prior = order
                .iter()
                .map(|n| (n.clone(), rng.random_range(1000..1100)))
                .collect::<HashMap<_, _>>();

            for result in engine.apply_placements(&order, &prior).unwrap() {
                assert!(result.rating_after >= 1000);
            }
        }
    }

    #[test]
    fn test_underdog_first_place_gains_more() {
        let engine = PlacementRankingEngine::default();
        let underdog_wins = engine.raw_deltas(&[1000, 1400]);
        let favourite_wins = engine.raw_deltas(&[1400, 1000]);

        assert!(underdog_wins[0] > favourite_wins[0]);
    }

    #[test]
    fn test_insufficient_participants() {
        let result = PlacementRankingEngine::validate(&names(1));
        assert_eq!(
            result,
            Err(RatingError::InsufficientParticipants { min: 2, actual: 1 })
        );
    }

    #[test]
    fn test_too_many_participants() {
        let result = PlacementRankingEngine::validate(&names(9));
        assert_eq!(result, Err(RatingError::TooManyParticipants { max: 8, actual: 9 }));
    }

    #[test]
    fn test_duplicate_participant() {
        let order = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let engine = PlacementRankingEngine::default();

        assert_eq!(
            engine.apply_placements(&order, &HashMap::new()),
            Err(RatingError::DuplicateParticipant("a".to_string()))
        );
    }
}
