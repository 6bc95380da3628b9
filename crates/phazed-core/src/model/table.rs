use crate::model::card::Card;
use crate::model::phase::PhaseType;
use crate::model::play::{Play, TableLocation};
use crate::rules::Ruleset;
use core::fmt;
use serde::{Deserialize, Serialize};

/// What one player has laid down. Empty until they complete a phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub phase: Option<PhaseType>,
    #[serde(default)]
    pub groups: Vec<Vec<Card>>,
}

impl TableEntry {
    pub fn is_laid_down(&self) -> bool {
        self.phase.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    entries: Vec<TableEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    UnknownPlayer(usize),
    UnknownGroup(TableLocation),
    IndexOutOfRange(TableLocation),
    AlreadyLaidDown(usize),
    GroupCountMismatch {
        player: usize,
        phase: PhaseType,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::UnknownPlayer(player) => write!(f, "no table entry for player {player}"),
            TableError::UnknownGroup(loc) => {
                write!(f, "player {} has no group {}", loc.player, loc.group)
            }
            TableError::IndexOutOfRange(loc) => write!(
                f,
                "index {} is outside group {} of player {}",
                loc.index, loc.group, loc.player
            ),
            TableError::AlreadyLaidDown(player) => {
                write!(f, "player {player} already has a phase on the table")
            }
            TableError::GroupCountMismatch {
                player,
                phase,
                expected,
                found,
            } => write!(
                f,
                "player {player} laid down {phase} with {found} groups, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for TableError {}

impl Table {
    pub fn new(players: usize) -> Self {
        Self {
            entries: vec![TableEntry::default(); players],
        }
    }

    pub fn from_entries(entries: Vec<TableEntry>) -> Self {
        Self { entries }
    }

    pub fn players(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, player: usize) -> Option<&TableEntry> {
        self.entries.get(player)
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &TableEntry)> {
        self.entries.iter().enumerate()
    }

    pub fn has_phase(&self, player: usize) -> bool {
        self.entry(player).is_some_and(TableEntry::is_laid_down)
    }

    /// Records a completed phase. Each player lays down exactly once.
    pub fn lay_down(
        &mut self,
        player: usize,
        phase: PhaseType,
        groups: Vec<Vec<Card>>,
    ) -> Result<(), TableError> {
        let entry = self
            .entries
            .get_mut(player)
            .ok_or(TableError::UnknownPlayer(player))?;
        if entry.is_laid_down() {
            return Err(TableError::AlreadyLaidDown(player));
        }
        entry.phase = Some(phase);
        entry.groups = groups;
        Ok(())
    }

    /// Inserts `card` into an existing table group.
    pub fn extend(&mut self, location: TableLocation, card: Card) -> Result<(), TableError> {
        let entry = self
            .entries
            .get_mut(location.player)
            .ok_or(TableError::UnknownPlayer(location.player))?;
        let group = entry
            .groups
            .get_mut(location.group)
            .ok_or(TableError::UnknownGroup(location))?;
        if location.index > group.len() {
            return Err(TableError::IndexOutOfRange(location));
        }
        group.insert(location.index, card);
        Ok(())
    }

    /// Applies the table effect of `play`, made by `player`. Plays that do not
    /// touch the table are ignored.
    pub fn apply(&mut self, player: usize, play: &Play) -> Result<(), TableError> {
        match play {
            Play::LayPhase { phase, groups } => self.lay_down(player, *phase, groups.clone()),
            Play::ExtendTable { card, location } => self.extend(*location, *card),
            Play::Draw | Play::TakeDiscard { .. } | Play::Discard { .. } => Ok(()),
        }
    }

    /// Every laid-down entry must carry as many groups as its phase defines.
    pub fn validate(&self, rules: &Ruleset) -> Result<(), TableError> {
        for (player, entry) in self.iter() {
            let Some(phase) = entry.phase else {
                continue;
            };
            let expected = rules.phase(phase).groups.len();
            if entry.groups.len() != expected {
                return Err(TableError::GroupCountMismatch {
                    player,
                    phase,
                    expected,
                    found: entry.groups.len(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Table, TableError};
    use crate::model::card::parse_cards;
    use crate::model::phase::PhaseType;
    use crate::model::play::{Play, TableLocation};
    use crate::rules::Ruleset;

    #[test]
    fn lay_down_happens_once() {
        let mut table = Table::new(4);
        let groups = vec![parse_cards("2C 3C 4C 5C 6C 7C 8C 9C").unwrap()];
        table.lay_down(1, PhaseType::Five, groups.clone()).unwrap();
        assert!(table.has_phase(1));
        assert!(!table.has_phase(0));
        assert_eq!(
            table.lay_down(1, PhaseType::Five, groups),
            Err(TableError::AlreadyLaidDown(1))
        );
    }

    #[test]
    fn extend_inserts_at_location() {
        let mut table = Table::new(2);
        table
            .lay_down(0, PhaseType::Five, vec![parse_cards("3C 4C 5C 6C 7C 8C 9C 0C").unwrap()])
            .unwrap();
        table
            .apply(
                1,
                &Play::ExtendTable {
                    card: "2H".parse().unwrap(),
                    location: TableLocation::new(0, 0, 0),
                },
            )
            .unwrap();
        assert_eq!(table.entry(0).unwrap().groups[0][0].to_string(), "2H");
        let bad = TableLocation::new(0, 1, 0);
        assert_eq!(
            table.extend(bad, "2D".parse().unwrap()),
            Err(TableError::UnknownGroup(bad))
        );
        let far = TableLocation::new(0, 0, 42);
        assert_eq!(
            table.extend(far, "2D".parse().unwrap()),
            Err(TableError::IndexOutOfRange(far))
        );
    }

    #[test]
    fn validate_rejects_wrong_group_count() {
        let rules = Ruleset::standard();
        let mut table = Table::new(2);
        table
            .lay_down(0, PhaseType::One, vec![parse_cards("2C 2D 2H").unwrap()])
            .unwrap();
        assert!(matches!(
            table.validate(&rules),
            Err(TableError::GroupCountMismatch {
                player: 0,
                expected: 2,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn serializes_as_list_of_entries() {
        let json = r#"[{"phase":null,"groups":[]},{"phase":2,"groups":[["2C","3C","4C","5C","6C","7C","8C"]]}]"#;
        let table: Table = serde_json::from_str(json).unwrap();
        assert_eq!(table.players(), 2);
        assert_eq!(table.entry(1).unwrap().phase, Some(PhaseType::Two));
        assert!(table.validate(&Ruleset::standard()).is_ok());
    }
}
