use super::{Decision, DecisionError, Policy};
use crate::phase::{SearchMode, find_phase};
use crate::rank::{Tier, rank_hand};
use crate::table_play::find_table_play;
use phazed_core::game::state::DecisionState;
use phazed_core::model::hand::HeldCard;
use phazed_core::model::phase::PhaseType;
use phazed_core::model::play::{Play, PlayType};
use phazed_core::rules::Ruleset;
use tracing::{Level, event};

/// Rule-driven player: keeps the discard when it helps, lays its phase as
/// soon as it is complete, extends the table when it can, and otherwise
/// throws away its least wanted card.
#[derive(Debug, Clone, Default)]
pub struct HeuristicPolicy {
    rules: Ruleset,
}

impl HeuristicPolicy {
    pub fn new(rules: Ruleset) -> Self {
        Self { rules }
    }

    pub fn standard() -> Self {
        Self::new(Ruleset::standard())
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    /// Chooses a play without touching `state`.
    pub fn decide(&self, state: &DecisionState) -> Result<Decision, DecisionError> {
        let phase = state.validate(&self.rules)?;
        let previous = state.history.last_play_type();
        let decision = self.evaluate(state, phase, previous)?;
        log_decision(state, phase, previous, &decision);
        Ok(decision)
    }

    fn evaluate(
        &self,
        state: &DecisionState,
        phase: PhaseType,
        previous: Option<PlayType>,
    ) -> Result<Decision, DecisionError> {
        let rules = &self.rules;
        let on_table = state.phase_on_table();
        let hand = state.hand.held();

        if rules.may_follow(PlayType::TakeDiscard, previous) {
            return Ok(self.consider_discard(state, phase, on_table));
        }

        if !on_table && rules.may_follow(PlayType::LayPhase, previous) {
            let search = find_phase(rules, &hand, phase, SearchMode::Commit);
            if search.completeness.is_complete() {
                return Ok(Decision {
                    play: Play::LayPhase {
                        phase,
                        groups: search.meld_cards(),
                    },
                    reason: "phase_complete",
                });
            }
        } else if on_table && rules.may_follow(PlayType::ExtendTable, previous) {
            if let Some(found) = find_table_play(rules, &state.table, &hand) {
                return Ok(Decision {
                    play: Play::ExtendTable {
                        card: found.card.card,
                        location: found.location,
                    },
                    reason: "table_extension",
                });
            }
        }

        let worst = self.least_wanted(state, phase, on_table, &hand)?;
        Ok(Decision {
            play: Play::Discard { card: worst.card },
            reason: "least_wanted",
        })
    }

    /// Ranks the hand as if the discard were taken; it is left when it would
    /// be the least wanted card, or, before the phase is down, when it helps
    /// neither the phase nor the table.
    fn consider_discard(&self, state: &DecisionState, phase: PhaseType, on_table: bool) -> Decision {
        let Some(discard) = state.discard else {
            return Decision {
                play: Play::Draw,
                reason: "no_discard",
            };
        };
        let mut candidate = state.hand.clone();
        candidate.insert_front(discard);
        let held = candidate.held();
        let ranking = rank_hand(
            &self.rules,
            &held,
            phase,
            on_table,
            &state.table,
            state.player,
        );

        if ranking.worst().is_some_and(|worst| worst.slot == 0) {
            return Decision {
                play: Play::Draw,
                reason: "discard_least_wanted",
            };
        }
        if !on_table && ranking.worst_tier(0) == Some(Tier::Remainder) {
            return Decision {
                play: Play::Draw,
                reason: "discard_unused",
            };
        }
        Decision {
            play: Play::TakeDiscard { card: discard },
            reason: "discard_wanted",
        }
    }

    fn least_wanted(
        &self,
        state: &DecisionState,
        phase: PhaseType,
        on_table: bool,
        hand: &[HeldCard],
    ) -> Result<HeldCard, DecisionError> {
        rank_hand(&self.rules, hand, phase, on_table, &state.table, state.player)
            .worst()
            .ok_or(DecisionError::EmptyHand)
    }
}

impl Policy for HeuristicPolicy {
    fn choose(&mut self, state: &DecisionState) -> Result<Decision, DecisionError> {
        self.decide(state)
    }
}

fn log_decision(
    state: &DecisionState,
    phase: PhaseType,
    previous: Option<PlayType>,
    decision: &Decision,
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let previous = previous.map_or_else(|| "start".to_string(), |play| play.to_string());
    event!(
        target: "phazed_bot::decide",
        Level::INFO,
        player = state.player,
        phase = phase.number(),
        previous = %previous,
        hand_size = state.hand.len(),
        play_type = decision.play.play_type().number(),
        play = %decision.play,
        reason = decision.reason,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use phazed_core::game::history::{Turn, TurnHistory};
    use phazed_core::model::card::{Card, parse_cards};
    use phazed_core::model::hand::Hand;
    use phazed_core::model::table::Table;

    fn card(raw: &str) -> Card {
        raw.parse().unwrap()
    }

    fn state(hand: &str, discard: Option<&str>, previous: Option<Play>) -> DecisionState {
        let history = match previous {
            Some(play) => TurnHistory::from_turns(vec![Turn {
                player: 3,
                plays: vec![play],
            }]),
            None => TurnHistory::new(),
        };
        DecisionState {
            player: 0,
            table: Table::new(4),
            history,
            phase_status: vec![0; 4],
            hand: Hand::with_cards(parse_cards(hand).unwrap()),
            discard: discard.map(card),
        }
    }

    #[test]
    fn takes_a_discard_that_builds_a_set() {
        let policy = HeuristicPolicy::standard();
        let decision = policy
            .decide(&state("7C 7D 2S 9H KD", Some("7H"), None))
            .unwrap();
        assert_eq!(decision.play, Play::TakeDiscard { card: card("7H") });
    }

    #[test]
    fn leaves_a_discard_that_would_be_dead_weight() {
        let policy = HeuristicPolicy::standard();
        let previous = Play::Discard { card: card("4C") };
        let decision = policy
            .decide(&state("7C 7D 9S 9H 2C", Some("KD"), Some(previous)))
            .unwrap();
        assert_eq!(decision.play, Play::Draw);
        assert_eq!(decision.reason, "discard_least_wanted");
    }

    #[test]
    fn missing_discard_means_draw() {
        let policy = HeuristicPolicy::standard();
        let decision = policy.decide(&state("7C 7D", None, None)).unwrap();
        assert_eq!(decision.play, Play::Draw);
    }

    #[test]
    fn lays_a_complete_phase_after_drawing() {
        let policy = HeuristicPolicy::standard();
        let decision = policy
            .decide(&state("3C 3D 3H 8S 8C 8D KH", None, Some(Play::Draw)))
            .unwrap();
        match decision.play {
            Play::LayPhase { phase, groups } => {
                assert_eq!(phase, PhaseType::One);
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[0], parse_cards("8S 8C 8D").unwrap());
                assert_eq!(groups[1], parse_cards("3C 3D 3H").unwrap());
            }
            other => panic!("expected a lay-down, got {other}"),
        }
    }

    #[test]
    fn incomplete_phase_falls_through_to_discard() {
        let policy = HeuristicPolicy::standard();
        let decision = policy
            .decide(&state("3C 3D 8S 8C KH", None, Some(Play::Draw)))
            .unwrap();
        assert_eq!(decision.play, Play::Discard { card: card("KH") });
    }

    #[test]
    fn empty_hand_cannot_discard() {
        let policy = HeuristicPolicy::standard();
        let err = policy.decide(&state("", None, Some(Play::Draw))).unwrap_err();
        assert_eq!(err, DecisionError::EmptyHand);
    }

    #[test]
    fn finished_players_are_rejected() {
        let policy = HeuristicPolicy::standard();
        let mut finished = state("3C", None, None);
        finished.phase_status[0] = 7;
        assert!(matches!(
            policy.decide(&finished),
            Err(DecisionError::State(_))
        ));
    }

    fn laid_down(hand: &str, discard: &str) -> DecisionState {
        let mut state = state(hand, Some(discard), None);
        state
            .table
            .lay_down(
                0,
                PhaseType::One,
                vec![
                    parse_cards("3C 3D 3H").unwrap(),
                    parse_cards("8S 8C 8D").unwrap(),
                ],
            )
            .unwrap();
        state
    }

    #[test]
    fn unused_discard_is_kept_once_the_phase_is_down() {
        let policy = HeuristicPolicy::standard();
        let decision = policy.decide(&laid_down("9C 4D KS", "5H")).unwrap();
        assert_eq!(decision.play, Play::TakeDiscard { card: card("5H") });
        assert_eq!(decision.reason, "discard_wanted");
    }

    #[test]
    fn least_wanted_discard_is_left_once_the_phase_is_down() {
        let policy = HeuristicPolicy::standard();
        let decision = policy.decide(&laid_down("9C 4D 5S", "KH")).unwrap();
        assert_eq!(decision.play, Play::Draw);
        assert_eq!(decision.reason, "discard_least_wanted");
    }
}
