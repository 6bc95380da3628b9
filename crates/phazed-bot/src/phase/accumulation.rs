use super::{Completeness, PhaseSearch, SearchMode};
use crate::combos::choose_index_combinations;
use crate::validate::colour_check;
use phazed_core::model::card::Card;
use phazed_core::model::hand::HeldCard;
use phazed_core::model::phase::GroupKind;
use phazed_core::rules::Ruleset;

/// Order in which combination sizes are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    /// Largest combinations first, so a group swallows as many cards as possible.
    Longest,
    /// Smallest first, stopping one short of the largest size.
    Shortest,
}

struct AccGroup {
    found: bool,
    /// The exact group when found, otherwise the last combination seen that stays below the rung.
    group: Vec<HeldCard>,
    remainder: Vec<HeldCard>,
}

fn find_acc_group(rules: &Ruleset, cards: &[HeldCard], kind: GroupKind, reach: Reach) -> AccGroup {
    let mut sorted = cards.to_vec();
    sorted.sort_by_key(|held| rules.acc_value(held.card));

    let shortest = rules.acc_min_cards;
    let longest = rules.acc_max_cards.min(sorted.len());
    let sizes: Vec<usize> = match reach {
        Reach::Longest => (shortest..=longest).rev().collect(),
        Reach::Shortest => (shortest..longest).collect(),
    };
    let target = rules.first_rung();

    let mut found = false;
    let mut chosen: Vec<usize> = Vec::new();
    'sizes: for size in sizes {
        for combo in choose_index_combinations(sorted.len(), size) {
            let total: u32 = combo.iter().map(|&i| rules.acc_value(sorted[i].card)).sum();
            if total == target {
                if kind == GroupKind::ColourAccumulation {
                    let group: Vec<Card> = combo.iter().map(|&i| sorted[i].card).collect();
                    if !colour_check(&group, true) {
                        continue;
                    }
                }
                chosen = combo;
                found = true;
                break 'sizes;
            } else if total < target {
                chosen = combo;
            }
        }
    }

    let group = chosen.iter().map(|&i| sorted[i]).collect();
    let remainder = sorted
        .iter()
        .enumerate()
        .filter(|(i, _)| !chosen.contains(i))
        .map(|(_, &held)| held)
        .collect();
    AccGroup {
        found,
        group,
        remainder,
    }
}

/// Finds two groups that each total the first rung of the ladder.
///
/// The first group is searched longest-first and, failing that,
/// shortest-first; the second group is always searched longest-first among
/// the cards the first one left.
pub fn find_acc_phase(
    rules: &Ruleset,
    hand: &[HeldCard],
    kind: GroupKind,
    _mode: SearchMode,
) -> PhaseSearch {
    let first = find_acc_group(rules, hand, kind, Reach::Longest);
    if first.found {
        let second = find_acc_group(rules, &first.remainder, kind, Reach::Longest);
        if second.found {
            return PhaseSearch {
                groups: vec![first.group, second.group],
                remainder: second.remainder,
                completeness: Completeness::Complete,
            };
        }
    }

    let first = find_acc_group(rules, hand, kind, Reach::Shortest);
    if !first.found {
        return PhaseSearch {
            groups: non_empty(vec![first.group]),
            remainder: first.remainder,
            completeness: Completeness::Absent,
        };
    }
    let second = find_acc_group(rules, &first.remainder, kind, Reach::Longest);
    let completeness = if second.found {
        Completeness::Complete
    } else {
        Completeness::Partial
    };
    PhaseSearch {
        groups: non_empty(vec![first.group, second.group]),
        remainder: second.remainder,
        completeness,
    }
}

fn non_empty(groups: Vec<Vec<HeldCard>>) -> Vec<Vec<HeldCard>> {
    groups.into_iter().filter(|group| !group.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assert_partition, held, text};
    use super::*;

    #[test]
    fn two_groups_of_34_complete_phase_three() {
        let rules = Ruleset::standard();
        let hand = held("KS KC 8D QH 0S 9D 3C 2H");
        let search = find_acc_phase(&rules, &hand, GroupKind::Accumulation, SearchMode::Commit);
        assert_eq!(search.completeness, Completeness::Complete);
        assert_eq!(search.groups.len(), 2);
        for group in &search.groups {
            let total: u32 = group.iter().map(|h| rules.acc_value(h.card)).sum();
            assert_eq!(total, 34);
        }
        assert_partition(&hand, &search.groups, &search.remainder);
    }

    #[test]
    fn longest_combination_wins_for_the_first_group() {
        let rules = Ruleset::standard();
        // 2+3+4+5+6+7+7 = 34 uses seven cards; K+K+8 would use three.
        let hand = held("2C 3C 4C 5C 6C 7C 7D KS KH 8H");
        let search = find_acc_phase(&rules, &hand, GroupKind::Accumulation, SearchMode::Commit);
        assert_eq!(search.groups[0].len(), 7);
        assert_eq!(text(&search.groups[1]), ["8H", "KS", "KH"]);
        assert_eq!(search.completeness, Completeness::Complete);
    }

    #[test]
    fn one_group_is_partial() {
        let rules = Ruleset::standard();
        let hand = held("KS KC 8D 2H 3H");
        let search = find_acc_phase(&rules, &hand, GroupKind::Accumulation, SearchMode::Rank);
        assert_eq!(search.completeness, Completeness::Partial);
        assert_eq!(text(&search.groups[0]), ["8D", "KS", "KC"]);
        assert_partition(&hand, &search.groups, &search.remainder);
    }

    #[test]
    fn colour_accumulation_rejects_mixed_colours() {
        let rules = Ruleset::standard();
        let hand = held("KS KH 8D");
        let search =
            find_acc_phase(&rules, &hand, GroupKind::ColourAccumulation, SearchMode::Commit);
        assert_eq!(search.completeness, Completeness::Absent);

        let hand = held("KH KD 8H 2S");
        let search =
            find_acc_phase(&rules, &hand, GroupKind::ColourAccumulation, SearchMode::Rank);
        assert_eq!(search.completeness, Completeness::Partial);
        assert_eq!(text(&search.groups[0]), ["8H", "KH", "KD"]);
        assert_eq!(text(&search.remainder), ["2S"]);
    }

    #[test]
    fn first_group_must_survive_the_shortest_search() {
        let rules = Ruleset::standard();
        // Only the four-card group reaches 34, and the shortest search stops at three cards.
        let hand = held("KH KD 7H AD");
        let search =
            find_acc_phase(&rules, &hand, GroupKind::ColourAccumulation, SearchMode::Rank);
        assert_eq!(search.completeness, Completeness::Absent);
        assert_eq!(text(&search.groups[0]), ["7H", "KH", "KD"]);
        assert_eq!(text(&search.remainder), ["AD"]);
    }

    #[test]
    fn short_hands_have_no_groups() {
        let rules = Ruleset::standard();
        let hand = held("KS KC");
        let search = find_acc_phase(&rules, &hand, GroupKind::Accumulation, SearchMode::Rank);
        assert_eq!(search.completeness, Completeness::Absent);
        assert!(search.groups.is_empty());
        assert_eq!(search.remainder.len(), 2);
    }
}
