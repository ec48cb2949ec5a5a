use crate::model::constants::{BASE_WIN, CHARACTER_WEIGHT, GLOBAL_WEIGHT, LOSS_RATIO};
use serde::{Deserialize, Serialize};

/// When a three-stock win doubles the winner's gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThreeStockPolicy {
    /// Every three-stock win is doubled
    #[default]
    Always,
    /// Only doubled when the winner's global rating is strictly below the loser's
    UnderdogOnly
}

/// Tunables for head-to-head rating updates.
///
/// `loss_ratio` below 1.0 makes every match add slightly more rating than it
/// removes. The rating floor offsets that drift over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingParameters {
    pub base_win: f64,
    pub loss_ratio: f64,
    pub character_weight: f64,
    pub global_weight: f64,
    pub three_stock: ThreeStockPolicy
}

impl Default for RatingParameters {
    fn default() -> Self {
        RatingParameters {
            base_win: BASE_WIN,
            loss_ratio: LOSS_RATIO,
            character_weight: CHARACTER_WEIGHT,
            global_weight: GLOBAL_WEIGHT,
            three_stock: ThreeStockPolicy::Always
        }
    }
}
