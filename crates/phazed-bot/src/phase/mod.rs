//! Searches a hand for the best complete or partial instance of a phase.

mod accumulation;
mod composite;
mod runs;
mod sets;

pub use accumulation::find_acc_phase;
pub use composite::find_composite_phase;
pub use runs::{find_run_phase, longest_run};
pub use sets::find_set_phase;

use phazed_core::model::card::Card;
use phazed_core::model::hand::HeldCard;
use phazed_core::model::phase::PhaseType;
use phazed_core::rules::Ruleset;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    Complete,
    /// At least one group was found, but not all of them.
    Partial,
    Absent,
}

impl Completeness {
    pub const fn is_complete(self) -> bool {
        matches!(self, Completeness::Complete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Order cards by how much they contribute to the phase.
    Rank,
    /// Produce the groups to lay down.
    Commit,
}

/// Result of a phase search: `groups` and `remainder` partition the searched cards.
///
/// In [`SearchMode::Commit`] `groups` are the melds, one per phase group.
/// In [`SearchMode::Rank`] they are priority clusters, most wanted first;
/// [`PhaseSearch::ranked`] concatenates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSearch {
    pub groups: Vec<Vec<HeldCard>>,
    pub remainder: Vec<HeldCard>,
    pub completeness: Completeness,
}

impl PhaseSearch {
    pub fn absent(hand: &[HeldCard]) -> Self {
        Self {
            groups: Vec::new(),
            remainder: hand.to_vec(),
            completeness: Completeness::Absent,
        }
    }

    pub fn ranked(&self) -> Vec<HeldCard> {
        self.groups.iter().flatten().copied().collect()
    }

    pub fn meld_cards(&self) -> Vec<Vec<Card>> {
        self.groups
            .iter()
            .map(|group| group.iter().map(|held| held.card).collect())
            .collect()
    }
}

/// Dispatches to the finder for the shape of `phase`.
pub fn find_phase(
    rules: &Ruleset,
    hand: &[HeldCard],
    phase: PhaseType,
    mode: SearchMode,
) -> PhaseSearch {
    let shape = &rules.phase(phase).groups;
    let search = match shape.as_slice() {
        [run, set] if run.kind.is_run() && set.kind.is_set() => {
            find_composite_phase(rules, hand, *run, *set, mode)
        }
        [first, ..] if first.kind.is_set() => {
            find_set_phase(rules, hand, *first, shape.len(), mode)
        }
        [first, ..] if first.kind.is_accumulation() => {
            find_acc_phase(rules, hand, first.kind, mode)
        }
        [run] if run.kind.is_run() => find_run_phase(rules, hand, *run, mode),
        _ => PhaseSearch::absent(hand),
    };
    event!(
        target: "phazed_bot::phase",
        Level::DEBUG,
        phase = phase.number(),
        mode = ?mode,
        completeness = ?search.completeness,
        groups = search.groups.len(),
        remainder = search.remainder.len(),
    );
    search
}

/// Cards of `cards` whose slots are not in `taken`, order preserved.
pub(crate) fn without(cards: &[HeldCard], taken: &[HeldCard]) -> Vec<HeldCard> {
    cards
        .iter()
        .filter(|held| !taken.iter().any(|t| t.slot == held.slot))
        .copied()
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use phazed_core::model::card::parse_cards;
    use phazed_core::model::hand::{Hand, HeldCard};

    pub fn held(raw: &str) -> Vec<HeldCard> {
        Hand::with_cards(parse_cards(raw).unwrap()).held()
    }

    pub fn text(cards: &[HeldCard]) -> Vec<String> {
        cards.iter().map(|h| h.card.to_string()).collect()
    }

    /// Asserts that groups and remainder split `hand` exactly.
    pub fn assert_partition(hand: &[HeldCard], groups: &[Vec<HeldCard>], remainder: &[HeldCard]) {
        let mut slots: Vec<usize> = groups
            .iter()
            .flatten()
            .chain(remainder.iter())
            .map(|h| h.slot)
            .collect();
        slots.sort_unstable();
        let mut expected: Vec<usize> = hand.iter().map(|h| h.slot).collect();
        expected.sort_unstable();
        assert_eq!(slots, expected, "groups and remainder must partition the hand");
    }
}
