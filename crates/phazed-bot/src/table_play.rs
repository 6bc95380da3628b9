//! Searches the laid-down groups on the table for cards a hand can add.

use crate::combos::choose_index_combinations;
use crate::phase::without;
use crate::validate::{AccState, acc_state, colour_check, run_check};
use phazed_core::model::card::Card;
use phazed_core::model::hand::{HeldCard, cards_of};
use phazed_core::model::phase::GroupKind;
use phazed_core::model::play::TableLocation;
use phazed_core::model::table::Table;
use phazed_core::rules::Ruleset;
use tracing::{Level, event};

/// A single card to add to a table group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TablePlay {
    pub card: HeldCard,
    pub location: TableLocation,
}

/// Cards that extend one group, and where the first of them goes.
struct GroupMatch {
    cards: Vec<HeldCard>,
    index: usize,
}

/// First legal extension in table order: players by id, then groups in
/// phase order. Cheaper cards are tried first.
pub fn find_table_play(rules: &Ruleset, table: &Table, hand: &[HeldCard]) -> Option<TablePlay> {
    let sorted = sorted_by_acc(rules, hand);
    for (player, entry) in table.iter() {
        let Some(phase) = entry.phase else {
            continue;
        };
        for (group, content) in entry.groups.iter().enumerate() {
            let Some(rule) = rules.group(phase, group) else {
                continue;
            };
            let found = probe_group(rules, rule.kind, content, &sorted, true);
            if let Some(GroupMatch { cards, index }) = found.into_iter().next() {
                let play = TablePlay {
                    card: cards[0],
                    location: TableLocation::new(player, group, index),
                };
                event!(
                    target: "phazed_bot::table",
                    Level::DEBUG,
                    card = %play.card.card,
                    player,
                    group,
                    index,
                );
                return Some(play);
            }
        }
    }
    None
}

/// Splits `hand` into cards playable to the table and the rest.
///
/// Only the first player whose groups accept anything is considered. A
/// matching accumulation ends the scan of that player's groups. Both halves
/// come back ordered by accumulation value.
pub fn playable_to_table(
    rules: &Ruleset,
    table: &Table,
    hand: &[HeldCard],
) -> (Vec<HeldCard>, Vec<HeldCard>) {
    let sorted = sorted_by_acc(rules, hand);
    for (player, entry) in table.iter() {
        let Some(phase) = entry.phase else {
            continue;
        };
        let mut playable: Vec<HeldCard> = Vec::new();
        for (group, content) in entry.groups.iter().enumerate() {
            let Some(rule) = rules.group(phase, group) else {
                continue;
            };
            let found = probe_group(rules, rule.kind, content, &sorted, false);
            let matched = !found.is_empty();
            for held in found.into_iter().flat_map(|m| m.cards) {
                if !playable.iter().any(|p| p.slot == held.slot) {
                    playable.push(held);
                }
            }
            if matched && rule.kind.is_accumulation() {
                break;
            }
        }
        if !playable.is_empty() {
            event!(
                target: "phazed_bot::table",
                Level::DEBUG,
                player,
                playable = playable.len(),
                "cards playable to table"
            );
            let remainder = without(&sorted, &playable);
            return (playable, remainder);
        }
    }
    (Vec::new(), sorted)
}

fn sorted_by_acc(rules: &Ruleset, hand: &[HeldCard]) -> Vec<HeldCard> {
    let mut sorted = hand.to_vec();
    sorted.sort_by_key(|held| rules.acc_value(held.card));
    sorted
}

/// Ways `hand` can extend one table group. Sets yield at most one card, runs
/// at most one card per end, accumulations the first combination (largest
/// first) that lands on a rung.
fn probe_group(
    rules: &Ruleset,
    kind: GroupKind,
    content: &[Card],
    hand: &[HeldCard],
    first_only: bool,
) -> Vec<GroupMatch> {
    let append_at = content.len();
    match kind {
        GroupKind::Accumulation | GroupKind::ColourAccumulation => {
            extend_accumulation(rules, kind, content, hand)
                .map(|cards| GroupMatch {
                    cards,
                    index: append_at,
                })
                .into_iter()
                .collect()
        }
        GroupKind::ValueSet | GroupKind::SuitSet => {
            let naturals: Vec<Card> = content.iter().filter(|c| !c.is_wild()).copied().collect();
            let fits = |card: Card| {
                card.is_wild()
                    || naturals.iter().any(|n| match kind {
                        GroupKind::SuitSet => n.suit == card.suit,
                        _ => n.value == card.value,
                    })
            };
            hand.iter()
                .find(|held| fits(held.card))
                .map(|held| GroupMatch {
                    cards: vec![*held],
                    index: append_at,
                })
                .into_iter()
                .collect()
        }
        GroupKind::Run | GroupKind::ColourRun => {
            if content.len() >= rules.max_run_len {
                return Vec::new();
            }
            let mut found = Vec::new();
            for index in [0, append_at] {
                if let Some(held) = extend_run(rules, kind, content, hand, index) {
                    found.push(GroupMatch {
                        cards: vec![held],
                        index,
                    });
                    if first_only {
                        break;
                    }
                }
            }
            found
        }
    }
}

fn extend_accumulation(
    rules: &Ruleset,
    kind: GroupKind,
    content: &[Card],
    hand: &[HeldCard],
) -> Option<Vec<HeldCard>> {
    for choose in (1..=hand.len()).rev() {
        for combo in choose_index_combinations(hand.len(), choose) {
            let picked: Vec<HeldCard> = combo.iter().map(|&i| hand[i]).collect();
            let mut grown = content.to_vec();
            grown.extend(cards_of(&picked));
            if acc_state(rules, &grown) != AccState::Complete {
                continue;
            }
            if kind == GroupKind::ColourAccumulation && !colour_check(&grown, true) {
                continue;
            }
            return Some(picked);
        }
    }
    None
}

/// First card that keeps the run valid when inserted at `index`. For a colour
/// run, the first such card of the wrong colour ends the search at that end.
fn extend_run(
    rules: &Ruleset,
    kind: GroupKind,
    content: &[Card],
    hand: &[HeldCard],
    index: usize,
) -> Option<HeldCard> {
    for held in hand {
        if content.contains(&held.card) {
            continue;
        }
        let mut grown = content.to_vec();
        grown.insert(index, held.card);
        if !run_check(rules, &grown, rules.max_table_wilds) {
            continue;
        }
        if kind == GroupKind::ColourRun && !colour_check(&grown, false) {
            return None;
        }
        return Some(*held);
    }
    None
}
