use chrono::NaiveDateTime;

use crate::model::{
    constants::{DEFAULT_UPSET_SLOPE, ELO_SCALE, MINUTE_TIMESTAMP_FORMAT, RATING_FLOOR, TIMESTAMP_FORMAT, UPSET_TIERS},
    error::RatingError,
    structures::player_record::PlayerRecord
};

/// Logistic expected score of `rating` against `opponent`.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / ELO_SCALE))
}

/// A player's overall standing: the sum of each character's distance above the floor.
/// Always computed from the record as it is right now.
pub fn global_rating(record: &PlayerRecord) -> i32 {
    record.ratings.values().map(|r| r - RATING_FLOOR).sum()
}

/// Tiered reward multiplier for the winner. The less likely the win,
/// the steeper the slope applied to `0.5 - expected`.
pub fn upset_multiplier(expected: f64) -> f64 {
    let slope = UPSET_TIERS
        .iter()
        .find(|(bound, _)| expected < *bound)
        .map(|(_, slope)| *slope)
        .unwrap_or(DEFAULT_UPSET_SLOPE);

    1.0 + slope * (0.5 - expected)
}

/// Rounds to the nearest integer, ties to even. Historical match logs were
/// produced with this rounding, so replay must use it too.
pub fn round_rating(value: f64) -> i32 {
    value.round_ties_even() as i32
}

/// Parses a match log timestamp. Entries written by the processor use
/// `%Y-%m-%d %H:%M:%S`. Older entries without seconds and RFC 3339 are
/// accepted as well.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, RatingError> {
    let raw = raw.trim();

    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, MINUTE_TIMESTAMP_FORMAT))
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_utc()))
        .map_err(|_| RatingError::UnparseableTimestamp(raw.to_string()))
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
