// Rating constants
pub const RATING_FLOOR: i32 = 1000;
pub const DEFAULT_RATING: i32 = RATING_FLOOR;
pub const ELO_SCALE: f64 = 400.0;
pub const BASE_WIN: f64 = 30.0;
pub const LOSS_RATIO: f64 = 0.9;
pub const CHARACTER_WEIGHT: f64 = 0.7;
pub const GLOBAL_WEIGHT: f64 = 0.3;
pub const THREE_STOCK_MULTIPLIER: i32 = 2;
// Upset tiers, (upper bound on the winner's expected score, slope)
pub const UPSET_TIERS: [(f64, f64); 3] = [(0.01, 10.0), (0.10, 6.0), (0.30, 3.0)];
pub const DEFAULT_UPSET_SLOPE: f64 = 1.2;
// Decay constants
pub const DECAY_GRACE_DAYS: i64 = 14;
pub const DECAY_POINTS_PER_DAY: i32 = 2;
// Free-for-all constants
pub const PLACEMENT_K: f64 = 24.0;
pub const MIN_PLACEMENT_PARTICIPANTS: usize = 2;
pub const MAX_PLACEMENT_PARTICIPANTS: usize = 8;
// Match log timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const MINUTE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const REPLAY_PROGRESS_INTERVAL: usize = 50;
