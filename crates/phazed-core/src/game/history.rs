use crate::model::play::{Play, PlayType};
use serde::{Deserialize, Serialize};

/// Plays made by one player during one turn, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub player: usize,
    pub plays: Vec<Play>,
}

/// Append-only log of turns in the current hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnHistory {
    turns: Vec<Turn>,
}

impl TurnHistory {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Records `play` for `player`, continuing their turn if they made the last one.
    pub fn record(&mut self, player: usize, play: Play) {
        match self.turns.last_mut() {
            Some(turn) if turn.player == player => turn.plays.push(play),
            _ => self.turns.push(Turn {
                player,
                plays: vec![play],
            }),
        }
    }

    /// Type of the most recent play; `None` at the start of a hand.
    pub fn last_play_type(&self) -> Option<PlayType> {
        self.turns
            .last()
            .and_then(|turn| turn.plays.last())
            .map(Play::play_type)
    }
}
