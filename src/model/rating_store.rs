use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::model::{
    constants::DEFAULT_RATING,
    rating_utils::global_rating,
    structures::{character::Character, player_record::PlayerRecord}
};

/// A row of the leaderboard, highest global rating first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub player: String,
    pub global_rating: i32,
    pub ratings: IndexMap<Character, i32>
}

/// Player name -> record. Players are kept in the order they first appeared,
/// which keeps serialized output stable across identical replays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingStore {
    players: IndexMap<String, PlayerRecord>
}

impl RatingStore {
    pub fn new() -> RatingStore {
        RatingStore::default()
    }

    pub fn get(&self, player: &str) -> Option<&PlayerRecord> {
        self.players.get(player)
    }

    pub fn get_mut(&mut self, player: &str) -> Option<&mut PlayerRecord> {
        self.players.get_mut(player)
    }

    /// Returns the record for `player`, creating an empty one on first appearance.
    pub fn player_mut(&mut self, player: &str) -> &mut PlayerRecord {
        self.players.entry(player.to_string()).or_default()
    }

    pub fn contains(&self, player: &str) -> bool {
        self.players.contains_key(player)
    }

    /// Current rating for a player's character; unrated entries read as the default.
    pub fn character_rating(&self, player: &str, character: Character) -> i32 {
        self.players
            .get(player)
            .map_or(DEFAULT_RATING, |p| p.character_rating(character))
    }

    /// Makes sure the character has an explicit entry and returns its rating.
    pub fn ensure_character(&mut self, player: &str, character: Character) -> i32 {
        let record = self.player_mut(player);
        let rating = record.character_rating(character);
        record.ratings.entry(character).or_insert(rating);

        rating
    }

    pub fn set_character_rating(&mut self, player: &str, character: Character, rating: i32) {
        self.player_mut(player).set_character_rating(character, rating);
    }

    /// Sum of `(rating - floor)` over the player's characters, 0 for unknown players.
    pub fn global_rating(&self, player: &str) -> i32 {
        self.players.get(player).map_or(0, global_rating)
    }

    /// Free-for-all ratings for the given players, for feeding the placement engine.
    pub fn placement_ratings<'a>(&self, players: impl IntoIterator<Item = &'a String>) -> HashMap<String, i32> {
        players
            .into_iter()
            .filter_map(|name| self.players.get(name).map(|p| (name.clone(), p.placement_rating())))
            .collect()
    }

    pub fn players(&self) -> impl Iterator<Item = (&String, &PlayerRecord)> {
        self.players.iter()
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = (&String, &mut PlayerRecord)> {
        self.players.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// All players sorted by global rating, descending. Ties keep store order.
    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        self.players
            .iter()
            .map(|(name, record)| LeaderboardRow {
                player: name.clone(),
                global_rating: global_rating(record),
                ratings: record.ratings.clone()
            })
            .sorted_by(|a, b| b.global_rating.cmp(&a.global_rating))
            .collect()
    }
}
