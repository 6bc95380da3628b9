use super::{Completeness, PhaseSearch, SearchMode, without};
use phazed_core::model::hand::HeldCard;
use phazed_core::model::phase::GroupRule;
use phazed_core::model::value::Value;
use phazed_core::rules::Ruleset;

/// Longest run buildable from `cards`, trying every starting value.
///
/// Only the first card of each value takes part, and at most `max_wilds`
/// wilds (taken from the back of the hand's wilds) fill the gaps. A hand of
/// nothing but wilds builds no run. Among equally long runs the one with the
/// later start wins.
pub fn longest_run(rules: &Ruleset, cards: &[HeldCard], max_wilds: usize) -> Vec<HeldCard> {
    let mut naturals: Vec<HeldCard> = Vec::new();
    let mut wilds: Vec<HeldCard> = Vec::new();
    let mut seen: Vec<Value> = Vec::new();
    for held in cards {
        if held.card.is_wild() {
            wilds.push(*held);
        } else if !seen.contains(&held.card.value) {
            seen.push(held.card.value);
            naturals.push(*held);
        }
    }
    if naturals.is_empty() {
        return Vec::new();
    }
    naturals.sort_by_key(|held| rules.acc_value(held.card));

    let mut longest: Vec<HeldCard> = Vec::new();
    for start in 0..rules.max_run_len {
        let mut pool = naturals.clone();
        let mut spare: Vec<HeldCard> = wilds.iter().take(max_wilds).copied().collect();
        let mut run = Vec::new();
        for offset in 0..rules.max_run_len {
            let wanted = rules.run_value(start, offset);
            match pool.iter().position(|held| Some(held.card.value) == wanted) {
                Some(at) => run.push(pool.remove(at)),
                None => match spare.pop() {
                    Some(wild) => run.push(wild),
                    None => break,
                },
            }
        }
        if run.len() >= longest.len() {
            longest = run;
        }
    }
    longest
}

/// Stretch of `length` cards inside `run` that spends the fewest wilds.
pub(crate) fn best_window(run: &[HeldCard], length: usize) -> &[HeldCard] {
    if run.len() <= length {
        return run;
    }
    let wilds = |window: &[HeldCard]| window.iter().filter(|h| h.card.is_wild()).count();
    let mut best = 0;
    for start in 1..=run.len() - length {
        if wilds(&run[start..start + length]) < wilds(&run[best..best + length]) {
            best = start;
        }
    }
    &run[best..best + length]
}

/// Finds a run of `rule.length` cards.
///
/// Ranking mode reports the whole longest run. Commit mode lays down only
/// `rule.length` of its cards, preferring naturals, and returns the rest.
pub fn find_run_phase(
    rules: &Ruleset,
    hand: &[HeldCard],
    rule: GroupRule,
    mode: SearchMode,
) -> PhaseSearch {
    let run = longest_run(rules, hand, rule.search_wilds);
    if run.is_empty() {
        return PhaseSearch::absent(hand);
    }
    let completeness = if run.len() >= rule.length {
        Completeness::Complete
    } else {
        Completeness::Partial
    };

    let group = match (mode, completeness) {
        (SearchMode::Commit, Completeness::Complete) => best_window(&run, rule.length).to_vec(),
        _ => run,
    };
    PhaseSearch {
        remainder: without(hand, &group),
        groups: vec![group],
        completeness,
    }
}
