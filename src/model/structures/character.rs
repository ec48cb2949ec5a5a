use crate::model::error::RatingError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

/// The fixed roster. Declared in display-name order so that `Ord`
/// matches the alphabetical listing shown to players.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, AsRefStr, Display, EnumCount,
)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Character {
    #[strum(to_string = "Banjo & Kazooie")]
    BanjoAndKazooie,
    Bayonetta,
    Bowser,
    #[strum(to_string = "Bowser Jr.")]
    BowserJr,
    Byleth,
    #[strum(to_string = "Captain Falcon")]
    CaptainFalcon,
    Charizard,
    Chrom,
    Cloud,
    Corrin,
    Daisy,
    #[strum(to_string = "Dark Pit")]
    DarkPit,
    #[strum(to_string = "Dark Samus")]
    DarkSamus,
    #[strum(to_string = "Diddy Kong")]
    DiddyKong,
    #[strum(to_string = "Donkey Kong")]
    DonkeyKong,
    #[strum(to_string = "Dr. Mario")]
    DrMario,
    #[strum(to_string = "Duck Hunt")]
    DuckHunt,
    Falco,
    Fox,
    Ganondorf,
    Greninja,
    Hero,
    #[strum(to_string = "Ice Climbers")]
    IceClimbers,
    Ike,
    Incineroar,
    Inkling,
    Isabelle,
    Ivysaur,
    Jigglypuff,
    Joker,
    Kazuya,
    Ken,
    #[strum(to_string = "King Dedede")]
    KingDedede,
    #[strum(to_string = "King K. Rool")]
    KingKRool,
    Kirby,
    Link,
    #[strum(to_string = "Little Mac")]
    LittleMac,
    Lucario,
    Lucas,
    Lucina,
    Luigi,
    Mario,
    Marth,
    #[strum(to_string = "Mega Man")]
    MegaMan,
    #[strum(to_string = "Meta Knight")]
    MetaKnight,
    Mewtwo,
    #[strum(to_string = "Mii Brawler")]
    MiiBrawler,
    #[strum(to_string = "Mii Gunner")]
    MiiGunner,
    #[strum(to_string = "Mii Swordfighter")]
    MiiSwordfighter,
    #[strum(to_string = "Min Min")]
    MinMin,
    #[strum(to_string = "Mr. Game and Watch")]
    MrGameAndWatch,
    Ness,
    Olimar,
    #[strum(to_string = "Pac-Man")]
    PacMan,
    Palutena,
    Peach,
    Pichu,
    Pikachu,
    #[strum(to_string = "Piranha Plant")]
    PiranhaPlant,
    Pit,
    #[strum(to_string = "Pyra/Mythra")]
    PyraMythra,
    #[strum(to_string = "R.O.B")]
    Rob,
    Richter,
    Ridley,
    Robin,
    #[strum(to_string = "Rosalina and Luma")]
    RosalinaAndLuma,
    Roy,
    Ryu,
    Samus,
    Sephiroth,
    Sheik,
    Shulk,
    Simon,
    Snake,
    Sonic,
    Sora,
    Squirtle,
    Steve,
    Terry,
    #[strum(to_string = "Toon Link")]
    ToonLink,
    Villager,
    Wario,
    #[strum(to_string = "Wii Fit Trainer")]
    WiiFitTrainer,
    Wolf,
    Yoshi,
    #[strum(to_string = "Young Link")]
    YoungLink,
    Zelda,
    #[strum(to_string = "Zero Suit Samus")]
    ZeroSuitSamus
}

impl Character {
    /// Parses a roster display name. Matching is exact and case-sensitive.
    pub fn parse(name: &str) -> Result<Self, RatingError> {
        Character::from_str(name).map_err(|_| RatingError::UnknownCharacter(name.to_string()))
    }
}

impl TryFrom<String> for Character {
    type Error = RatingError;

    fn try_from(v: String) -> Result<Self, Self::Error> {
        Character::parse(&v)
    }
}

impl From<Character> for String {
    fn from(c: Character) -> Self {
        c.as_ref().to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{error::RatingError, structures::character::Character};
    use itertools::Itertools;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn test_roster_size() {
        assert_eq!(Character::COUNT, 88);
        assert_eq!(Character::iter().count(), 88);
    }

    #[test]
    fn test_roster_is_alphabetical() {
        let names = Character::iter().map(|c| c.to_string()).collect_vec();
        let mut sorted = names.clone();
        sorted.sort();

        assert_eq!(names, sorted);
    }

    #[test]
    fn test_parse_display_names() {
        assert_eq!(Character::parse("Banjo & Kazooie"), Ok(Character::BanjoAndKazooie));
        assert_eq!(Character::parse("R.O.B"), Ok(Character::Rob));
        assert_eq!(Character::parse("Pyra/Mythra"), Ok(Character::PyraMythra));
        assert_eq!(Character::parse("Fox"), Ok(Character::Fox));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Character::parse("Waluigi"),
            Err(RatingError::UnknownCharacter("Waluigi".to_string()))
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(Character::parse("fox").is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for c in Character::iter() {
            assert_eq!(Character::parse(&c.to_string()), Ok(c));
        }
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&Character::MrGameAndWatch).unwrap();
        assert_eq!(json, "\"Mr. Game and Watch\"");

        let parsed: Character = serde_json::from_str("\"King K. Rool\"").unwrap();
        assert_eq!(parsed, Character::KingKRool);

        assert!(serde_json::from_str::<Character>("\"Waluigi\"").is_err());
    }
}
