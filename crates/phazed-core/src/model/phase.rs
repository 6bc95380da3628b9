use core::fmt;
use serde::{Deserialize, Serialize};

/// One of the seven phases a player completes in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum PhaseType {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
}

impl PhaseType {
    pub const ALL: [PhaseType; 7] = [
        PhaseType::One,
        PhaseType::Two,
        PhaseType::Three,
        PhaseType::Four,
        PhaseType::Five,
        PhaseType::Six,
        PhaseType::Seven,
    ];

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(PhaseType::One),
            2 => Some(PhaseType::Two),
            3 => Some(PhaseType::Three),
            4 => Some(PhaseType::Four),
            5 => Some(PhaseType::Five),
            6 => Some(PhaseType::Six),
            7 => Some(PhaseType::Seven),
            _ => None,
        }
    }

    /// The phase a player is working on after completing `completed` phases.
    pub fn after_completed(completed: usize) -> Option<Self> {
        u8::try_from(completed + 1).ok().and_then(Self::from_number)
    }

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for PhaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase {}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownPhase(pub u8);

impl fmt::Display for UnknownPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown phase {} (expected 1-7)", self.0)
    }
}

impl std::error::Error for UnknownPhase {}

impl TryFrom<u8> for PhaseType {
    type Error = UnknownPhase;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::from_number(number).ok_or(UnknownPhase(number))
    }
}

impl From<PhaseType> for u8 {
    fn from(phase: PhaseType) -> Self {
        phase.number()
    }
}

/// Structural rule a single group of cards must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Cards sharing one value.
    ValueSet,
    /// Cards sharing one suit.
    SuitSet,
    Run,
    /// A run whose natural cards share one colour.
    ColourRun,
    /// Cards whose values sum onto the accumulation ladder.
    Accumulation,
    /// An accumulation of one colour, aces included.
    ColourAccumulation,
}

impl GroupKind {
    pub const fn is_set(self) -> bool {
        matches!(self, GroupKind::ValueSet | GroupKind::SuitSet)
    }

    pub const fn is_run(self) -> bool {
        matches!(self, GroupKind::Run | GroupKind::ColourRun)
    }

    pub const fn is_accumulation(self) -> bool {
        matches!(self, GroupKind::Accumulation | GroupKind::ColourAccumulation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRule {
    pub kind: GroupKind,
    /// Cards needed for a set or run; unused for accumulations.
    pub length: usize,
    /// Wilds a run search may spend while building this group.
    pub search_wilds: usize,
}

impl GroupRule {
    pub const fn set(kind: GroupKind, length: usize) -> Self {
        Self {
            kind,
            length,
            search_wilds: 0,
        }
    }

    pub const fn run(kind: GroupKind, length: usize, search_wilds: usize) -> Self {
        Self {
            kind,
            length,
            search_wilds,
        }
    }

    pub const fn accumulation(kind: GroupKind) -> Self {
        Self {
            kind,
            length: 0,
            search_wilds: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseRule {
    pub phase: PhaseType,
    pub groups: Vec<GroupRule>,
}
