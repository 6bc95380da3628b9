//! Decision engine for the phase-based rummy game: finds phases in a hand,
//! searches the table for extensions, ranks cards, and picks a play.

mod combos;
pub mod phase;
pub mod policy;
pub mod rank;
pub mod table_play;
pub mod validate;

pub use phase::{Completeness, PhaseSearch, SearchMode, find_phase};
pub use policy::{Decision, DecisionError, HeuristicPolicy, Policy, decide};
pub use rank::{HandRanking, Tier, rank_hand};
pub use table_play::{TablePlay, find_table_play, playable_to_table};
pub use validate::{AccState, acc_state, acc_valid, colour_check, run_check};
