use crate::model::card::Card;
use crate::model::phase::PhaseType;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum PlayType {
    Draw = 1,
    TakeDiscard = 2,
    LayPhase = 3,
    ExtendTable = 4,
    Discard = 5,
}

impl PlayType {
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(PlayType::Draw),
            2 => Some(PlayType::TakeDiscard),
            3 => Some(PlayType::LayPhase),
            4 => Some(PlayType::ExtendTable),
            5 => Some(PlayType::Discard),
            _ => None,
        }
    }

    pub const fn number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayType::Draw => "draw",
            PlayType::TakeDiscard => "take_discard",
            PlayType::LayPhase => "lay_phase",
            PlayType::ExtendTable => "extend_table",
            PlayType::Discard => "discard",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownPlayType(pub u8);

impl fmt::Display for UnknownPlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown play type {} (expected 1-5)", self.0)
    }
}

impl std::error::Error for UnknownPlayType {}

impl TryFrom<u8> for PlayType {
    type Error = UnknownPlayType;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::from_number(number).ok_or(UnknownPlayType(number))
    }
}

impl From<PlayType> for u8 {
    fn from(play: PlayType) -> Self {
        play.number()
    }
}

/// Where a card lands on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableLocation {
    pub player: usize,
    pub group: usize,
    pub index: usize,
}

impl TableLocation {
    pub const fn new(player: usize, group: usize, index: usize) -> Self {
        Self {
            player,
            group,
            index,
        }
    }
}

/// A single play made during a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "play", rename_all = "snake_case")]
pub enum Play {
    /// Leave the discard and draw from the deck.
    Draw,
    TakeDiscard {
        card: Card,
    },
    LayPhase {
        phase: PhaseType,
        groups: Vec<Vec<Card>>,
    },
    ExtendTable {
        card: Card,
        location: TableLocation,
    },
    Discard {
        card: Card,
    },
}

impl Play {
    pub const fn play_type(&self) -> PlayType {
        match self {
            Play::Draw => PlayType::Draw,
            Play::TakeDiscard { .. } => PlayType::TakeDiscard,
            Play::LayPhase { .. } => PlayType::LayPhase,
            Play::ExtendTable { .. } => PlayType::ExtendTable,
            Play::Discard { .. } => PlayType::Discard,
        }
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Play::Draw => write!(f, "draw"),
            Play::TakeDiscard { card } => write!(f, "take {card}"),
            Play::LayPhase { phase, groups } => {
                write!(f, "lay {phase}:")?;
                for group in groups {
                    let text: Vec<String> = group.iter().map(Card::to_string).collect();
                    write!(f, " [{}]", text.join(" "))?;
                }
                Ok(())
            }
            Play::ExtendTable { card, location } => write!(
                f,
                "play {card} to player {} group {} at {}",
                location.player, location.group, location.index
            ),
            Play::Discard { card } => write!(f, "discard {card}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Play, PlayType, TableLocation};

    #[test]
    fn play_types_match_numbers() {
        let play = Play::ExtendTable {
            card: "5H".parse().unwrap(),
            location: TableLocation::new(1, 0, 3),
        };
        assert_eq!(play.play_type(), PlayType::ExtendTable);
        assert_eq!(play.play_type().number(), 4);
        assert_eq!(Play::Draw.play_type().number(), 1);
        assert_eq!(PlayType::from_number(6), None);
    }

    #[test]
    fn play_serializes_with_tag() {
        let play = Play::Discard {
            card: "KS".parse().unwrap(),
        };
        let json = serde_json::to_string(&play).unwrap();
        assert_eq!(json, r#"{"play":"discard","card":"KS"}"#);
        let back: Play = serde_json::from_str(&json).unwrap();
        assert_eq!(back, play);
    }

    #[test]
    fn display_lists_groups() {
        let play = Play::LayPhase {
            phase: crate::model::phase::PhaseType::Two,
            groups: vec![vec!["2C".parse().unwrap(), "AS".parse().unwrap()]],
        };
        assert_eq!(play.to_string(), "lay phase 2: [2C AS]");
    }
}
