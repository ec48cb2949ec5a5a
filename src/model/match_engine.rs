use crate::model::{
    constants::{RATING_FLOOR, THREE_STOCK_MULTIPLIER},
    rating_utils::{expected_score, round_rating, upset_multiplier},
    structures::{
        character::Character,
        rating_parameters::{RatingParameters, ThreeStockPolicy},
        winner::Winner
    }
};

/// Everything needed to rate one head-to-head match. Character ratings are
/// expected to already satisfy the floor invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchInput {
    pub p1_character: Character,
    pub p2_character: Character,
    pub p1_rating: i32,
    pub p2_rating: i32,
    pub p1_global: i32,
    pub p2_global: i32,
    pub winner: Winner,
    pub three_stock: bool
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    pub p1_rating: i32,
    pub p2_rating: i32,
    /// Pre-match expected score of the side that won
    pub expected: f64,
    pub multiplier: f64,
    /// Base gain, before any three-stock doubling
    pub gain: i32,
    pub loss: i32,
    pub three_stock_applied: bool
}

impl MatchOutcome {
    pub fn p1_delta(&self, input: &MatchInput) -> i32 {
        self.p1_rating - input.p1_rating
    }

    pub fn p2_delta(&self, input: &MatchInput) -> i32 {
        self.p2_rating - input.p2_rating
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchRatingEngine {
    pub params: RatingParameters
}

impl MatchRatingEngine {
    pub fn new(params: RatingParameters) -> MatchRatingEngine {
        MatchRatingEngine { params }
    }

    /// Blends character skill with overall player strength so that a strong
    /// player on a fresh character is still rated as a threat.
    pub fn combined_strength(&self, character_rating: i32, global_rating: i32) -> f64 {
        self.params.character_weight * character_rating as f64 + self.params.global_weight * global_rating as f64
    }

    /// Expected score of the side that actually won.
    pub fn winner_expected(&self, input: &MatchInput) -> f64 {
        let c1 = self.combined_strength(input.p1_rating, input.p1_global);
        let c2 = self.combined_strength(input.p2_rating, input.p2_global);
        let expected_p1 = expected_score(c1, c2);

        match input.winner {
            Winner::P1 => expected_p1,
            Winner::P2 => 1.0 - expected_p1
        }
    }

    /// Base (gain, loss) for a win with the given expected score.
    pub fn gain_and_loss(&self, expected: f64) -> (i32, i32) {
        let gain = round_rating(self.params.base_win * upset_multiplier(expected));
        let loss = round_rating(gain as f64 * self.params.loss_ratio);

        (gain, loss)
    }

    fn three_stock_applies(&self, input: &MatchInput) -> bool {
        if !input.three_stock {
            return false;
        }

        match self.params.three_stock {
            ThreeStockPolicy::Always => true,
            ThreeStockPolicy::UnderdogOnly => {
                let (winner_global, loser_global) = match input.winner {
                    Winner::P1 => (input.p1_global, input.p2_global),
                    Winner::P2 => (input.p2_global, input.p1_global)
                };
                winner_global < loser_global
            }
        }
    }

    /// Rates a single match. Total over all inputs; validation happens before this is called.
    ///
    /// A three-stock win doubles what the winner receives. The loser's
    /// penalty is never scaled.
    pub fn apply_match(&self, input: &MatchInput) -> MatchOutcome {
        let expected = self.winner_expected(input);
        let (gain, loss) = self.gain_and_loss(expected);

        let three_stock_applied = self.three_stock_applies(input);
        let winner_delta = if three_stock_applied {
            gain * THREE_STOCK_MULTIPLIER
        } else {
            gain
        };

        let (p1_rating, p2_rating) = match input.winner {
            Winner::P1 => (input.p1_rating + winner_delta, input.p2_rating - loss),
            Winner::P2 => (input.p1_rating - loss, input.p2_rating + winner_delta)
        };

        MatchOutcome {
            p1_rating: p1_rating.max(RATING_FLOOR),
            p2_rating: p2_rating.max(RATING_FLOOR),
            expected,
            multiplier: upset_multiplier(expected),
            gain,
            loss,
            three_stock_applied
        }
    }
}
