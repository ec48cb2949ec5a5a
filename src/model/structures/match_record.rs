use crate::model::structures::{character::Character, winner::Winner};
use serde::{Deserialize, Serialize};

/// The immutable part of a match log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(rename = "p1")]
    pub player1: String,
    #[serde(rename = "c1")]
    pub character1: Character,
    #[serde(rename = "p2")]
    pub player2: String,
    #[serde(rename = "c2")]
    pub character2: Character,
    pub winner: Winner,
    #[serde(default)]
    pub three_stock: bool
}

impl MatchFacts {
    pub fn winner_name(&self) -> &str {
        match self.winner {
            Winner::P1 => &self.player1,
            Winner::P2 => &self.player2
        }
    }

    /// True if this match was played between exactly these two players, in either order.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.player1 == a && self.player2 == b) || (self.player1 == b && self.player2 == a)
    }

    pub fn involves(&self, player: &str) -> bool {
        self.player1 == player || self.player2 == player
    }
}

/// The derived part of a match log entry. Replay may rewrite it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchProjection {
    pub new1: i32,
    pub diff1: i32,
    pub new2: i32,
    pub diff2: i32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(flatten)]
    pub facts: MatchFacts,
    #[serde(flatten)]
    pub projection: MatchProjection
}

/// Summary of the most recent submission, kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastResult {
    pub p1: String,
    pub c1: Character,
    pub new1: i32,
    pub diff1: i32,
    pub p2: String,
    pub c2: Character,
    pub new2: i32,
    pub diff2: i32
}

impl From<&MatchRecord> for LastResult {
    fn from(record: &MatchRecord) -> Self {
        LastResult {
            p1: record.facts.player1.clone(),
            c1: record.facts.character1,
            new1: record.projection.new1,
            diff1: record.projection.diff1,
            p2: record.facts.player2.clone(),
            c2: record.facts.character2,
            new2: record.projection.new2,
            diff2: record.projection.diff2
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::structures::{
        character::Character,
        match_record::{MatchFacts, MatchProjection, MatchRecord},
        winner::Winner
    };

    fn facts() -> MatchFacts {
        MatchFacts {
            timestamp: Some("2024-01-05 19:30".to_string()),
            player1: "alice".to_string(),
            character1: Character::Fox,
            player2: "bob".to_string(),
            character2: Character::Marth,
            winner: Winner::P2,
            three_stock: false
        }
    }

    #[test]
    fn test_is_between_either_order() {
        let f = facts();
        assert!(f.is_between("alice", "bob"));
        assert!(f.is_between("bob", "alice"));
        assert!(!f.is_between("alice", "carol"));
        assert_eq!(f.winner_name(), "bob");
    }

    #[test]
    fn test_reads_legacy_entry_without_projection() {
        let json = r#"{"p1":"alice","c1":"Fox","p2":"bob","c2":"Marth","winner":"p1"}"#;
        let record: MatchRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.facts.timestamp, None);
        assert!(!record.facts.three_stock);
        assert_eq!(record.projection, MatchProjection::default());
    }

    #[test]
    fn test_flat_layout() {
        let record = MatchRecord {
            facts: facts(),
            projection: MatchProjection {
                new1: 1000,
                diff1: 0,
                new2: 1030,
                diff2: 30
            }
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["p1"], "alice");
        assert_eq!(value["c2"], "Marth");
        assert_eq!(value["winner"], "p2");
        assert_eq!(value["new2"], 1030);
        assert_eq!(value["diff2"], 30);
    }
}
