//! Orders a hand from most wanted to least wanted card.

use crate::phase::{SearchMode, find_phase};
use crate::table_play::playable_to_table;
use phazed_core::model::hand::HeldCard;
use phazed_core::model::phase::PhaseType;
use phazed_core::model::table::Table;
use phazed_core::rules::Ruleset;
use std::collections::HashMap;
use tracing::{Level, event};

/// Why a card was kept. Lower tiers are more wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Part of a complete or partial instance of the player's phase.
    OwnPhase = 1,
    /// Can be added to a group on the table.
    TablePlayable = 2,
    /// Neither of the above.
    Remainder = 3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandRanking {
    ordered: Vec<HeldCard>,
    tiers: HashMap<usize, Vec<Tier>>,
}

impl HandRanking {
    fn new() -> Self {
        Self {
            ordered: Vec::new(),
            tiers: HashMap::new(),
        }
    }

    fn push(&mut self, held: HeldCard, tier: Tier) {
        self.ordered.push(held);
        self.tiers.entry(held.slot).or_default().push(tier);
    }

    /// Every card, most wanted first.
    pub fn ordered(&self) -> &[HeldCard] {
        &self.ordered
    }

    /// The least wanted card.
    pub fn worst(&self) -> Option<HeldCard> {
        self.ordered.last().copied()
    }

    pub fn tiers_of(&self, slot: usize) -> &[Tier] {
        self.tiers.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn worst_tier(&self, slot: usize) -> Option<Tier> {
        self.tiers_of(slot).iter().max().copied()
    }
}

/// Ranks `hand` for `player`, who is working on `phase`.
///
/// Cards of the player's own phase come first, unless the phase is already
/// on the table. Once the phase is complete or laid down, cards that extend
/// the table follow; a complete phase is laid down on a copy of `table`
/// first, so its groups can be extended too. The rest come last, cheapest
/// first.
pub fn rank_hand(
    rules: &Ruleset,
    hand: &[HeldCard],
    phase: PhaseType,
    phase_on_table: bool,
    table: &Table,
    player: usize,
) -> HandRanking {
    let mut ranking = HandRanking::new();

    let (remainder, complete) = if phase_on_table {
        (hand.to_vec(), false)
    } else {
        let search = find_phase(rules, hand, phase, SearchMode::Rank);
        for held in search.ranked() {
            ranking.push(held, Tier::OwnPhase);
        }
        (search.remainder, search.completeness.is_complete())
    };

    let mut leftover = if phase_on_table || complete {
        let mut simulated = table.clone();
        if complete {
            let melds = find_phase(rules, hand, phase, SearchMode::Commit).meld_cards();
            if let Err(err) = simulated.lay_down(player, phase, melds) {
                event!(
                    target: "phazed_bot::rank",
                    Level::DEBUG,
                    player,
                    error = %err,
                    "could not simulate lay-down"
                );
            }
        }

        let (mut playable, rest) = playable_to_table(rules, &simulated, &remainder);
        let mut leftover = Vec::new();
        for held in rest {
            let (single, left) = playable_to_table(rules, &simulated, &[held]);
            playable.extend(single);
            leftover.extend(left);
        }
        for held in playable {
            ranking.push(held, Tier::TablePlayable);
        }
        leftover
    } else {
        remainder
    };

    leftover.sort_by_key(|held| rules.score_value(held.card));
    for held in leftover {
        ranking.push(held, Tier::Remainder);
    }
    ranking
}
