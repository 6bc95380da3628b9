//! Immutable rule tables consulted by every part of the engine.

use crate::model::card::Card;
use crate::model::phase::{GroupKind, GroupRule, PhaseRule, PhaseType};
use crate::model::play::PlayType;
use crate::model::value::Value;

const ACC_LADDER: [u32; 9] = [34, 55, 68, 76, 81, 84, 86, 87, 88];

/// Two trailing blanks end every run that walks past the wrap point.
const RUN_ORDER: [Option<Value>; 15] = [
    Some(Value::Two),
    Some(Value::Three),
    Some(Value::Four),
    Some(Value::Five),
    Some(Value::Six),
    Some(Value::Seven),
    Some(Value::Eight),
    Some(Value::Nine),
    Some(Value::Ten),
    Some(Value::Jack),
    Some(Value::Queen),
    Some(Value::King),
    Some(Value::Two),
    None,
    None,
];

/// Distinct values a run can visit before it repeats.
const RUN_CYCLE: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    acc_values: [u32; 13],
    score_values: [u32; 13],
    ladder: Vec<u32>,
    phases: Vec<PhaseRule>,
    /// Natural cards a set needs before wilds may top it up.
    pub min_natural: usize,
    /// Wild budget when re-validating a run extended on the table.
    pub max_table_wilds: usize,
    pub max_run_len: usize,
    pub acc_min_cards: usize,
    pub acc_max_cards: usize,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::standard()
    }
}

impl Ruleset {
    pub fn standard() -> Self {
        use GroupKind::*;

        let phases = vec![
            PhaseRule {
                phase: PhaseType::One,
                groups: vec![GroupRule::set(ValueSet, 3), GroupRule::set(ValueSet, 3)],
            },
            PhaseRule {
                phase: PhaseType::Two,
                groups: vec![GroupRule::set(SuitSet, 7)],
            },
            PhaseRule {
                phase: PhaseType::Three,
                groups: vec![
                    GroupRule::accumulation(Accumulation),
                    GroupRule::accumulation(Accumulation),
                ],
            },
            PhaseRule {
                phase: PhaseType::Four,
                groups: vec![GroupRule::set(ValueSet, 4), GroupRule::set(ValueSet, 4)],
            },
            PhaseRule {
                phase: PhaseType::Five,
                groups: vec![GroupRule::run(Run, 8, 6)],
            },
            PhaseRule {
                phase: PhaseType::Six,
                groups: vec![
                    GroupRule::accumulation(ColourAccumulation),
                    GroupRule::accumulation(ColourAccumulation),
                ],
            },
            PhaseRule {
                phase: PhaseType::Seven,
                groups: vec![GroupRule::run(ColourRun, 4, 2), GroupRule::set(ValueSet, 4)],
            },
        ];

        Self {
            acc_values: [2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 1],
            score_values: [2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 25],
            ladder: ACC_LADDER.to_vec(),
            phases,
            min_natural: 2,
            max_table_wilds: 8,
            max_run_len: RUN_CYCLE,
            acc_min_cards: 3,
            acc_max_cards: 8,
        }
    }

    pub fn acc_value(&self, card: Card) -> u32 {
        self.acc_values[card.value.index()]
    }

    pub fn score_value(&self, card: Card) -> u32 {
        self.score_values[card.value.index()]
    }

    /// Penalty left in a hand at the end of play.
    pub fn hand_score(&self, cards: &[Card]) -> u32 {
        cards.iter().map(|&card| self.score_value(card)).sum()
    }

    pub fn ladder(&self) -> &[u32] {
        &self.ladder
    }

    /// Total each new accumulation group must reach.
    pub fn first_rung(&self) -> u32 {
        self.ladder[0]
    }

    pub fn phase(&self, phase: PhaseType) -> &PhaseRule {
        &self.phases[phase.index()]
    }

    /// Group rule at `group` of `phase`, if the phase has that many groups.
    pub fn group(&self, phase: PhaseType, group: usize) -> Option<&GroupRule> {
        self.phase(phase).groups.get(group)
    }

    /// Value expected after `reference` in a run. `None` is the blank
    /// reference: the run has not seen a natural card yet, so anything fits.
    pub fn run_successor(&self, reference: Option<Value>) -> Option<Value> {
        let position = RUN_ORDER
            .iter()
            .position(|&slot| slot == reference)
            .unwrap_or(RUN_ORDER.len() - 2);
        RUN_ORDER[position + 1]
    }

    /// Value at `offset` steps after `start` in the wrapping run order.
    pub fn run_value(&self, start: usize, offset: usize) -> Option<Value> {
        RUN_ORDER[(start + offset) % RUN_CYCLE]
    }

    /// Previous play types after which `play` may be made; `None` is the start of a hand.
    pub fn may_follow(&self, play: PlayType, previous: Option<PlayType>) -> bool {
        use PlayType::*;
        match play {
            Draw | TakeDiscard => matches!(previous, None | Some(Discard)),
            LayPhase => matches!(previous, Some(Draw | TakeDiscard)),
            ExtendTable | Discard => {
                matches!(previous, Some(Draw | TakeDiscard | LayPhase | ExtendTable))
            }
        }
    }
}
