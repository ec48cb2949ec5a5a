use serde::{Deserialize, Serialize};

/// Rating movement for one participant of a free-for-all session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub player: String,
    pub rating_before: i32,
    pub rating_after: i32,
    /// The summed pairwise delta before rounding and flooring
    pub raw_delta: f64,
    /// What was actually applied (`rating_after - rating_before`)
    pub applied_delta: i32
}

/// A free-for-all log entry. `order` lists participants best to worst and
/// never changes once logged; `results` is derived and replay may rewrite it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub order: Vec<String>,
    #[serde(default)]
    pub results: Vec<PlacementResult>
}
