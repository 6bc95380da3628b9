mod heuristic;

pub use heuristic::HeuristicPolicy;

use core::fmt;
use phazed_core::game::state::{DecisionState, StateError};
use phazed_core::model::play::Play;

/// A chosen play and a short label for why it was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub play: Play,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    /// The state breaks a game invariant.
    State(StateError),
    /// A discard was due but the hand holds no cards.
    EmptyHand,
}

impl fmt::Display for DecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionError::State(err) => write!(f, "invalid decision state: {err}"),
            DecisionError::EmptyHand => write!(f, "cannot discard from an empty hand"),
        }
    }
}

impl std::error::Error for DecisionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecisionError::State(err) => Some(err),
            DecisionError::EmptyHand => None,
        }
    }
}

impl From<StateError> for DecisionError {
    fn from(err: StateError) -> Self {
        DecisionError::State(err)
    }
}

/// Picks the next play for the player described by a [`DecisionState`].
pub trait Policy: Send {
    fn choose(&mut self, state: &DecisionState) -> Result<Decision, DecisionError>;
}

/// Decides with the standard rules.
pub fn decide(state: &DecisionState) -> Result<Decision, DecisionError> {
    HeuristicPolicy::standard().decide(state)
}
