use crate::model::error::RatingError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which side of a head-to-head match took the set.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    P1,
    P2
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::P1 => "p1",
            Winner::P2 => "p2"
        }
    }
}

impl FromStr for Winner {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p1" => Ok(Winner::P1),
            "p2" => Ok(Winner::P2),
            _ => Err(RatingError::InvalidWinner(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{error::RatingError, structures::winner::Winner};

    #[test]
    fn test_parse() {
        assert_eq!("p1".parse::<Winner>(), Ok(Winner::P1));
        assert_eq!("p2".parse::<Winner>(), Ok(Winner::P2));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(
            "P1".parse::<Winner>(),
            Err(RatingError::InvalidWinner("P1".to_string()))
        );
    }

    #[test]
    fn test_serde_tag() {
        assert_eq!(serde_json::to_string(&Winner::P2).unwrap(), "\"p2\"");
        assert_eq!(serde_json::from_str::<Winner>("\"p1\"").unwrap(), Winner::P1);
    }
}
