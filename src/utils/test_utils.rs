use crate::model::{
    rating_utils::format_timestamp,
    structures::{
        character::Character,
        match_record::{MatchFacts, MatchProjection, MatchRecord},
        placement_record::PlacementRecord,
        player_record::PlayerRecord,
        winner::Winner
    }
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::{seq::IndexedRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strum::IntoEnumIterator;

pub fn generate_match_record(
    timestamp: Option<&str>,
    p1: (&str, Character),
    p2: (&str, Character),
    winner: Winner,
    three_stock: bool
) -> MatchRecord {
    MatchRecord {
        facts: MatchFacts {
            timestamp: timestamp.map(|t| t.to_string()),
            player1: p1.0.to_string(),
            character1: p1.1,
            player2: p2.0.to_string(),
            character2: p2.1,
            winner,
            three_stock
        },
        projection: MatchProjection::default()
    }
}

pub fn generate_placement_record(timestamp: Option<&str>, order: &[&str]) -> PlacementRecord {
    PlacementRecord {
        timestamp: timestamp.map(|t| t.to_string()),
        order: order.iter().map(|p| p.to_string()).collect(),
        results: Vec::new()
    }
}

pub fn generate_player_record(ratings: &[(Character, i32)], last_active: Option<NaiveDate>) -> PlayerRecord {
    let mut record = PlayerRecord {
        last_active,
        ..PlayerRecord::default()
    };
    for (character, rating) in ratings {
        record.set_character_rating(*character, *rating);
    }

    record
}

pub fn log_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// A random but reproducible match log. Timestamps are one minute apart and
/// therefore distinct; players draw from a small pool so they meet repeatedly.
pub fn generate_match_log(n: usize, seed: u64) -> Vec<MatchRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let players = ["alice", "bob", "carol", "dave", "erin", "frank"];
    let characters = Character::iter().take(12).collect::<Vec<_>>();

    (0..n)
        .map(|i| {
            let p1 = *players.choose(&mut rng).unwrap();
            let mut p2 = *players.choose(&mut rng).unwrap();
            while p2 == p1 {
                p2 = *players.choose(&mut rng).unwrap();
            }

            let timestamp = format_timestamp(log_start() + Duration::minutes(i as i64));
            let winner = if rng.random_bool(0.5) { Winner::P1 } else { Winner::P2 };

            generate_match_record(
                Some(&timestamp),
                (p1, *characters.choose(&mut rng).unwrap()),
                (p2, *characters.choose(&mut rng).unwrap()),
                winner,
                rng.random_bool(0.1)
            )
        })
        .collect()
}
