use crate::game::history::TurnHistory;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::phase::PhaseType;
use crate::model::table::{Table, TableError};
use crate::rules::Ruleset;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Everything a player sees when it is asked for a play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionState {
    pub player: usize,
    pub table: Table,
    #[serde(default)]
    pub history: TurnHistory,
    /// Per player, the number of phases already completed.
    pub phase_status: Vec<usize>,
    pub hand: Hand,
    #[serde(default)]
    pub discard: Option<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    UnknownPlayer { player: usize, players: usize },
    UnknownPhase { player: usize, completed: usize },
    Table(TableError),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::UnknownPlayer { player, players } => {
                write!(f, "player {player} is not one of the {players} seats")
            }
            StateError::UnknownPhase { player, completed } => write!(
                f,
                "player {player} has completed {completed} phases; there is no next phase"
            ),
            StateError::Table(err) => write!(f, "table: {err}"),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::Table(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TableError> for StateError {
    fn from(err: TableError) -> Self {
        StateError::Table(err)
    }
}

impl DecisionState {
    /// Phase the deciding player is working towards.
    pub fn current_phase(&self) -> Result<PhaseType, StateError> {
        let completed = self
            .phase_status
            .get(self.player)
            .copied()
            .ok_or(StateError::UnknownPlayer {
                player: self.player,
                players: self.phase_status.len(),
            })?;
        PhaseType::after_completed(completed).ok_or(StateError::UnknownPhase {
            player: self.player,
            completed,
        })
    }

    pub fn phase_on_table(&self) -> bool {
        self.table.has_phase(self.player)
    }

    /// Rejects states the engine cannot reason about.
    pub fn validate(&self, rules: &Ruleset) -> Result<PhaseType, StateError> {
        if self.player >= self.table.players() {
            return Err(StateError::UnknownPlayer {
                player: self.player,
                players: self.table.players(),
            });
        }
        self.table.validate(rules)?;
        self.current_phase()
    }
}
