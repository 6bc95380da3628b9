use super::{Completeness, PhaseSearch, SearchMode};
use phazed_core::model::hand::HeldCard;
use phazed_core::model::phase::{GroupKind, GroupRule};
use phazed_core::model::suit::Suit;
use phazed_core::model::value::Value;
use phazed_core::rules::Ruleset;
use std::cmp::Reverse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BucketKey {
    Wild,
    Value(Value),
    Suit(Suit),
}

/// Cards grouped by key, in order of first appearance.
type Buckets = Vec<(BucketKey, Vec<HeldCard>)>;

/// Finds `wanted` groups of `rule.length` cards sharing a value (or a suit
/// for [`GroupKind::SuitSet`]).
///
/// Natural groups are taken first; wilds then top up any bucket holding at
/// least `min_natural` cards. Ranking mode follows the complete groups with
/// spare wilds and then with the near-groups, larger buckets first and
/// cheaper buckets first among equals. Cards in the smallest buckets are the
/// remainder.
pub fn find_set_phase(
    rules: &Ruleset,
    hand: &[HeldCard],
    rule: GroupRule,
    wanted: usize,
    mode: SearchMode,
) -> PhaseSearch {
    let mut sorted = hand.to_vec();
    sorted.sort_by_key(|held| Reverse(rules.acc_value(held.card)));

    let mut buckets: Buckets = Vec::new();
    for held in sorted {
        let key = if held.card.is_wild() {
            BucketKey::Wild
        } else if rule.kind == GroupKind::SuitSet {
            BucketKey::Suit(held.card.suit)
        } else {
            BucketKey::Value(held.card.value)
        };
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, cards)) => cards.push(held),
            None => buckets.push((key, vec![held])),
        }
    }

    let mut groups: Vec<Vec<HeldCard>> = Vec::new();

    for (key, cards) in buckets.iter_mut() {
        if groups.len() == wanted {
            break;
        }
        if *key != BucketKey::Wild && cards.len() >= rule.length {
            let rest = cards.split_off(rule.length);
            groups.push(std::mem::replace(cards, rest));
        }
    }

    let wild_at = buckets.iter().position(|(k, _)| *k == BucketKey::Wild);
    for index in 0..buckets.len() {
        if groups.len() == wanted {
            break;
        }
        let wilds = wild_at.map_or(0, |at| buckets[at].1.len());
        let naturals = buckets[index].1.len();
        if buckets[index].0 != BucketKey::Wild
            && naturals >= rules.min_natural
            && naturals + wilds >= rule.length
        {
            let needed = rule.length.saturating_sub(naturals);
            let mut group = std::mem::take(&mut buckets[index].1);
            if let Some(at) = wild_at {
                group.extend(buckets[at].1.drain(..needed));
            }
            groups.push(group);
        }
    }

    let completeness = if groups.len() == wanted {
        Completeness::Complete
    } else if groups.is_empty() {
        Completeness::Absent
    } else {
        Completeness::Partial
    };

    if mode == SearchMode::Commit {
        let remainder = buckets.into_iter().flat_map(|(_, cards)| cards).collect();
        return PhaseSearch {
            groups,
            remainder,
            completeness,
        };
    }

    if let Some(at) = wild_at {
        let wilds = std::mem::take(&mut buckets[at].1);
        if !wilds.is_empty() {
            groups.push(wilds);
        }
    }
    buckets.retain(|(_, cards)| !cards.is_empty());

    let (partials, remainder) = split_partial_sets(rules, buckets);
    groups.extend(partials);

    PhaseSearch {
        groups,
        remainder,
        completeness,
    }
}

/// Separates near-groups from the lowest-frequency buckets.
fn split_partial_sets(rules: &Ruleset, buckets: Buckets) -> (Vec<Vec<HeldCard>>, Vec<HeldCard>) {
    let Some(lowest) = buckets.iter().map(|(_, cards)| cards.len()).min() else {
        return (Vec::new(), Vec::new());
    };

    let mut remainder = Vec::new();
    let mut partials = Vec::new();
    for (_, cards) in buckets {
        if cards.len() == lowest {
            remainder.extend(cards);
        } else {
            partials.push(cards);
        }
    }

    let score = |cards: &Vec<HeldCard>| -> u32 {
        cards.iter().map(|held| rules.score_value(held.card)).sum()
    };
    partials.sort_by_key(|cards| (Reverse(cards.len()), score(cards)));
    for cards in partials.iter_mut() {
        cards.sort_by_key(|held| rules.score_value(held.card));
    }
    (partials, remainder)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assert_partition, held, text};
    use super::*;

    fn value_set(length: usize) -> GroupRule {
        GroupRule::set(GroupKind::ValueSet, length)
    }

    #[test]
    fn four_of_a_value_fill_a_group_of_three() {
        let rules = Ruleset::standard();
        let hand = held("3C 3D 3H 3S");
        let search = find_set_phase(&rules, &hand, value_set(3), 1, SearchMode::Commit);
        assert_eq!(search.completeness, Completeness::Complete);
        assert_eq!(search.groups.len(), 1);
        assert_eq!(text(&search.groups[0]), ["3C", "3D", "3H"]);
        assert_eq!(text(&search.remainder), ["3S"]);
    }

    #[test]
    fn ranking_mode_leaves_the_fourth_three_as_remainder() {
        let rules = Ruleset::standard();
        let hand = held("3C 3D 3H 3S");
        let search = find_set_phase(&rules, &hand, value_set(3), 1, SearchMode::Rank);
        assert_eq!(search.completeness, Completeness::Complete);
        assert_eq!(text(&search.ranked()), ["3C", "3D", "3H"]);
        assert_eq!(text(&search.remainder), ["3S"]);
    }

    #[test]
    fn wilds_top_up_pairs() {
        let rules = Ruleset::standard();
        let hand = held("7C 7D 9S 9H AS KD");
        let search = find_set_phase(&rules, &hand, value_set(3), 2, SearchMode::Commit);
        assert_eq!(search.completeness, Completeness::Partial);
        assert_eq!(text(&search.groups[0]), ["9S", "9H", "AS"]);
        assert_partition(&hand, &search.groups, &search.remainder);

        let hand = held("7C 7D 9S 9H AS AD KD");
        let search = find_set_phase(&rules, &hand, value_set(3), 2, SearchMode::Commit);
        assert_eq!(search.completeness, Completeness::Complete);
        assert_eq!(text(&search.groups[1]), ["7C", "7D", "AD"]);
        assert_eq!(text(&search.remainder), ["KD"]);
    }

    #[test]
    fn singles_cannot_take_wilds() {
        let rules = Ruleset::standard();
        let hand = held("7C AS AD KD");
        let search = find_set_phase(&rules, &hand, value_set(3), 2, SearchMode::Commit);
        assert_eq!(search.completeness, Completeness::Absent);
        assert!(search.groups.is_empty());
        assert_eq!(search.remainder.len(), 4);
    }

    #[test]
    fn partial_buckets_rank_by_size_then_score() {
        let rules = Ruleset::standard();
        // Pairs of 4s and Kings, a triple of 2s, singles 9 and J.
        let hand = held("KC 4C 2C JD KD 4D 2D 9S 2H");
        let search = find_set_phase(&rules, &hand, value_set(4), 2, SearchMode::Rank);
        assert_eq!(search.completeness, Completeness::Absent);
        assert_eq!(
            text(&search.ranked()),
            ["2C", "2D", "2H", "4C", "4D", "KC", "KD"]
        );
        assert_eq!(text(&search.remainder), ["JD", "9S"]);
    }

    #[test]
    fn suit_sets_bucket_by_suit() {
        let rules = Ruleset::standard();
        let hand = held("2H 4H 6H 8H 0H QH KH 3C");
        let rule = GroupRule::set(GroupKind::SuitSet, 7);
        let search = find_set_phase(&rules, &hand, rule, 1, SearchMode::Commit);
        assert_eq!(search.completeness, Completeness::Complete);
        assert_eq!(search.groups[0].len(), 7);
        assert_eq!(text(&search.remainder), ["3C"]);
    }

    #[test]
    fn ranking_places_spare_wilds_after_complete_groups() {
        let rules = Ruleset::standard();
        let hand = held("5C 5D 5H AS 8C 9D");
        let search = find_set_phase(&rules, &hand, value_set(3), 1, SearchMode::Rank);
        assert_eq!(text(&search.ranked()), ["5C", "5D", "5H", "AS"]);
        assert_eq!(text(&search.remainder), ["9D", "8C"]);
    }
}
