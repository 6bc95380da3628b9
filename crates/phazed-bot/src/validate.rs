//! Predicates over a candidate group of cards.

use phazed_core::model::card::Card;
use phazed_core::model::suit::Colour;
use phazed_core::model::value::Value;
use phazed_core::rules::Ruleset;

/// Outcome of folding card values against the accumulation ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccState {
    /// The values end exactly on a rung.
    Complete,
    /// The values run out below the current rung.
    Incomplete,
    /// Some prefix overshoots a rung, or the ladder runs out.
    Invalid,
}

/// True when every card (aces only if `aces_coloured`) could share one colour,
/// with wilds counted towards whichever colour they complete.
pub fn colour_check(group: &[Card], aces_coloured: bool) -> bool {
    let mut red = 0;
    let mut black = 0;
    let mut wilds = 0;
    for card in group {
        if card.is_wild() && !aces_coloured {
            wilds += 1;
        } else {
            match card.colour() {
                Colour::Red => red += 1,
                Colour::Black => black += 1,
            }
        }
    }
    red + wilds == group.len() || black + wilds == group.len()
}

/// True when `group`, read in order, is a run spending at most `max_wilds`
/// wilds. Each wild stands for the value the run expects next; leading wilds
/// leave the expectation open.
pub fn run_check(rules: &Ruleset, group: &[Card], max_wilds: usize) -> bool {
    let mut expected: Option<Value> = None;
    let mut wilds = 0;
    for card in group {
        if card.is_wild() {
            wilds += 1;
            if wilds > max_wilds {
                return false;
            }
            expected = rules.run_successor(expected);
        } else if expected.is_none() || expected == Some(card.value) {
            expected = rules.run_successor(Some(card.value));
        } else {
            return false;
        }
    }
    true
}

/// Folds `values` against `ladder`, moving to the next rung each time the
/// running total lands on the current one.
pub fn acc_valid(values: &[u32], ladder: &[u32]) -> AccState {
    let mut total = 0;
    let mut rung = 0;
    let mut rest = values.iter();
    loop {
        let Some(&goal) = ladder.get(rung) else {
            return AccState::Invalid;
        };
        if total > goal {
            return AccState::Invalid;
        }
        let Some(&value) = rest.next() else {
            return if total == goal {
                AccState::Complete
            } else {
                AccState::Incomplete
            };
        };
        if total == goal {
            rung += 1;
        }
        total += value;
    }
}

/// [`acc_valid`] over the accumulation values of `cards`.
pub fn acc_state(rules: &Ruleset, cards: &[Card]) -> AccState {
    let values: Vec<u32> = cards.iter().map(|&card| rules.acc_value(card)).collect();
    acc_valid(&values, rules.ladder())
}
