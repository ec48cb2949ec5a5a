use crate::model::{constants::RATING_FLOOR, structures::character::Character};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything stored for a single player. Character ratings, the
/// free-for-all rating, badges and the decay bookkeeping are independent
/// of one another and only share a record for storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    pub ratings: IndexMap<Character, i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_rating: Option<i32>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub badges: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active: Option<NaiveDate>,
    /// The day through which decay has already been applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_decay: Option<NaiveDate>
}

impl PlayerRecord {
    /// The rating for a character, or the default if it has never been played.
    pub fn character_rating(&self, character: Character) -> i32 {
        self.ratings.get(&character).copied().unwrap_or(RATING_FLOOR)
    }

    /// Writes a character rating, clamped to the floor.
    pub fn set_character_rating(&mut self, character: Character, rating: i32) {
        self.ratings.insert(character, rating.max(RATING_FLOOR));
    }

    pub fn placement_rating(&self) -> i32 {
        self.placement_rating.unwrap_or(RATING_FLOOR)
    }

    pub fn set_placement_rating(&mut self, rating: i32) {
        self.placement_rating = Some(rating.max(RATING_FLOOR));
    }

    /// Marks the player as active on `date`. The decay clock restarts from here.
    pub fn touch(&mut self, date: NaiveDate) {
        if self.last_active.map_or(true, |d| d < date) {
            self.last_active = Some(date);
        }
    }

    /// Returns true if the badge was not already unlocked.
    pub fn award_badge(&mut self, badge: &str) -> bool {
        self.badges.insert(badge.to_string())
    }

    /// Highest and lowest rated characters. Ties resolve to the
    /// character that was rated first.
    pub fn best_and_worst(&self) -> Option<(Character, Character)> {
        let mut iter = self.ratings.iter();
        let (first, first_rating) = iter.next()?;
        let mut best = (*first, *first_rating);
        let mut worst = best;

        for (c, r) in iter {
            if *r > best.1 {
                best = (*c, *r);
            }
            if *r < worst.1 {
                worst = (*c, *r);
            }
        }

        Some((best.0, worst.0))
    }
}
