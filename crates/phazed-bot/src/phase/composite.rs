use super::runs::best_window;
use super::{Completeness, PhaseSearch, SearchMode, find_run_phase, find_set_phase, without};
use phazed_core::model::hand::HeldCard;
use phazed_core::model::phase::GroupRule;
use phazed_core::model::suit::Colour;
use phazed_core::rules::Ruleset;

/// One group of a two-group phase, searched on its own.
struct Half {
    group: Vec<HeldCard>,
    remainder: Vec<HeldCard>,
    complete: bool,
}

/// Finds a phase made of one colour run and one value set.
///
/// The run is searched first and the set among what is left; if that does
/// not complete the phase the set is searched first instead. When only one
/// group completes, the result of the set-first attempt is preferred.
pub fn find_composite_phase(
    rules: &Ruleset,
    hand: &[HeldCard],
    run_rule: GroupRule,
    set_rule: GroupRule,
    mode: SearchMode,
) -> PhaseSearch {
    let partial_runs = mode == SearchMode::Rank;
    let mut partial: Option<(Vec<Vec<HeldCard>>, Vec<HeldCard>)> = None;

    let run = run_half(rules, hand, run_rule, partial_runs);
    if run.complete {
        let set = set_half(rules, &run.remainder, set_rule);
        if set.complete {
            return finish(vec![run.group, set.group], set.remainder, Completeness::Complete);
        }
        partial = Some((vec![run.group, set.group], set.remainder));
    }

    let set = set_half(rules, hand, set_rule);
    if !set.complete {
        return match partial {
            Some((groups, remainder)) => finish(groups, remainder, Completeness::Partial),
            None => finish(vec![set.group], set.remainder, Completeness::Absent),
        };
    }

    let run = run_half(rules, &set.remainder, run_rule, partial_runs);
    if run.complete {
        return finish(vec![run.group, set.group], run.remainder, Completeness::Complete);
    }
    finish(vec![set.group, run.group], run.remainder, Completeness::Partial)
}

fn finish(
    groups: Vec<Vec<HeldCard>>,
    remainder: Vec<HeldCard>,
    completeness: Completeness,
) -> PhaseSearch {
    PhaseSearch {
        groups: groups.into_iter().filter(|group| !group.is_empty()).collect(),
        remainder,
        completeness,
    }
}

/// Searches red cards and then black cards, each with every wild, for a run.
fn run_half(rules: &Ruleset, cards: &[HeldCard], rule: GroupRule, partial_runs: bool) -> Half {
    let wilds: Vec<HeldCard> = cards.iter().filter(|h| h.card.is_wild()).copied().collect();
    let of_colour = |colour: Colour| -> Vec<HeldCard> {
        cards
            .iter()
            .filter(|h| !h.card.is_wild() && h.card.colour() == colour)
            .copied()
            .collect()
    };
    let red = of_colour(Colour::Red);
    let black = of_colour(Colour::Black);

    let search = |stack: &[HeldCard]| {
        let mut pool = stack.to_vec();
        pool.extend(wilds.iter().copied());
        let found = find_run_phase(rules, &pool, rule, SearchMode::Rank);
        let run = found.groups.into_iter().next().unwrap_or_default();
        (run, found.remainder, found.completeness.is_complete())
    };

    let (red_run, red_rest, red_complete) = search(&red);
    let (black_run, black_rest, black_complete) = if red_complete {
        (Vec::new(), Vec::new(), false)
    } else {
        search(&black)
    };

    let complete_in = if red_complete {
        Some((red_run.as_slice(), red_rest.as_slice(), black.as_slice()))
    } else if black_complete {
        Some((black_run.as_slice(), black_rest.as_slice(), red.as_slice()))
    } else {
        None
    };
    if let Some((run, rest, other)) = complete_in {
        let group = best_window(run, rule.length).to_vec();
        let mut remainder = without(run, &group);
        remainder.extend_from_slice(rest);
        remainder.extend_from_slice(other);
        return Half {
            group,
            remainder,
            complete: true,
        };
    }

    if !partial_runs {
        return Half {
            group: Vec::new(),
            remainder: cards.to_vec(),
            complete: false,
        };
    }

    // Red wins ties. Wilds were offered to both searches, so they are kept once.
    let (long, long_rest, short, short_rest) = if red_run.len() >= black_run.len() {
        (red_run, red_rest, black_run, black_rest)
    } else {
        (black_run, black_rest, red_run, red_rest)
    };
    let mut remainder: Vec<HeldCard> = Vec::new();
    for held in long_rest.into_iter().chain(short).chain(short_rest) {
        let seen = long.iter().chain(remainder.iter()).any(|h| h.slot == held.slot);
        if !seen {
            remainder.push(held);
        }
    }
    Half {
        group: long,
        remainder,
        complete: false,
    }
}

/// Searches for a single set, keeping only its first `rule.length` cards when complete.
fn set_half(rules: &Ruleset, cards: &[HeldCard], rule: GroupRule) -> Half {
    let found = find_set_phase(rules, cards, rule, 1, SearchMode::Rank);
    let complete = found.completeness.is_complete();
    let mut group = found.ranked();
    let mut remainder = if complete {
        group.split_off(rule.length.min(group.len()))
    } else {
        Vec::new()
    };
    remainder.extend(found.remainder);
    Half {
        group,
        remainder,
        complete,
    }
}
