use crate::model::{
    constants::{DECAY_GRACE_DAYS, DECAY_POINTS_PER_DAY, RATING_FLOOR},
    structures::player_record::PlayerRecord
};
use chrono::{Duration, NaiveDate};
use tracing::debug;

/// # How this works
/// - This gets called whenever ratings are read for display, on day D
///     (here, D is `today`)
/// - The player's last active day is T
/// - Decay begins on T + 14 days. Every day after that removes a fixed
///     amount from every rated character.
/// - The amount per day is `max(1, floor(2 / n))` for a player with n rated
///     characters, so players with a wide pool lose less per character.
///
/// # Rules
/// - A player must be inactive for more than 14 days before decay begins.
/// - No character may decay below the rating floor.
/// - Days already decayed (tracked by `last_decay`) are never decayed twice, so
///     calling this again with the same `today` changes nothing.
///
/// Returns `None` if no decay was applied.
pub fn decay(player: &mut PlayerRecord, today: NaiveDate) -> Option<&PlayerRecord> {
    let days = decay_days(player, today)?;
    let amount = per_character_decay(player.ratings.len()) * days as i32;

    for rating in player.ratings.values_mut() {
        *rating = decay_rating(*rating, amount);
    }
    player.last_decay = Some(today);

    debug!(days, amount, "Applied decay");
    Some(player)
}

/// Number of not-yet-applied decay days as of `today`, if any.
fn decay_days(player: &PlayerRecord, today: NaiveDate) -> Option<i64> {
    if decay_impossible(player, today) {
        return None;
    }

    let decay_start = player.last_active? + Duration::days(DECAY_GRACE_DAYS);
    let applied_through = match player.last_decay {
        Some(d) if d > decay_start => d,
        _ => decay_start
    };

    let days = (today - applied_through).num_days();
    (days > 0).then_some(days)
}

/// Returns true if the player was active within the last {DECAY_GRACE_DAYS} days.
fn is_active(last_active: NaiveDate, today: NaiveDate) -> bool {
    (today - last_active).num_days() <= DECAY_GRACE_DAYS
}

fn decay_impossible(player: &PlayerRecord, today: NaiveDate) -> bool {
    match player.last_active {
        None => true,
        Some(last_active) => player.ratings.is_empty() || is_active(last_active, today)
    }
}

fn per_character_decay(n_characters: usize) -> i32 {
    if n_characters == 0 {
        return 0;
    }

    (DECAY_POINTS_PER_DAY / n_characters as i32).max(1)
}

fn decay_rating(rating: i32, amount: i32) -> i32 {
    (rating - amount).max(RATING_FLOOR)
}
