use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use phazed_bot::{DecisionError, HeuristicPolicy, SearchMode, find_phase};
use phazed_core::game::history::TurnHistory;
use phazed_core::game::state::DecisionState;
use phazed_core::model::card::Card;
use phazed_core::model::deck::Deck;
use phazed_core::model::hand::Hand;
use phazed_core::model::phase::PhaseType;
use phazed_core::model::play::Play;
use phazed_core::model::table::{Table, TableError};
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, ResolvedOutputs};
use crate::summary::{BenchmarkSummary, SummaryCollector};

const PHASES: usize = 7;

/// Deals seeded positions and times one decision for player 0 in each.
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    policy: HeuristicPolicy,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub samples: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub summary: BenchmarkSummary,
}

/// One JSONL row per sampled decision.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SampleRow {
    pub run_id: String,
    pub sample_id: String,
    pub seed: u64,
    pub phase: u8,
    pub opponents_down: usize,
    pub previous_play: Option<u8>,
    pub play_type: u8,
    pub play: Play,
    pub reason: String,
    pub latency_ms: f64,
    pub hand_score: u32,
}

impl BenchmarkRunner {
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Self {
        Self {
            config,
            outputs,
            policy: HeuristicPolicy::standard(),
        }
    }

    /// Execute every sample, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let mut collector = SummaryCollector::new(self.config.metrics.latency_budget_ms);
        let mut rows_written = 0usize;

        for index in 0..self.config.deals.samples {
            let seed = rng.next_u64();
            let row = self.run_sample(index, seed)?;
            collector.record(&row);
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }
        writer.flush()?;

        let summary = collector.finish();
        summary.write_markdown(&self.config.run_id, &self.outputs.summary_md)?;

        event!(
            target: "phazed_bench::runner",
            Level::INFO,
            run_id = %self.config.run_id,
            samples = summary.samples,
            over_budget = summary.over_budget,
            mean_ms = summary.latency.mean_ms,
        );

        Ok(RunSummary {
            samples: self.config.deals.samples,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            summary,
        })
    }

    fn run_sample(&self, index: usize, seed: u64) -> Result<SampleRow, RunnerError> {
        let state = self.deal(seed)?;
        let phase = state.current_phase().map_err(DecisionError::from)?;
        let previous_play = state.history.last_play_type().map(|play| play.number());
        let opponents_down = (1..state.table.players())
            .filter(|&player| state.table.has_phase(player))
            .count();

        let started = Instant::now();
        let decision = self.policy.decide(&state)?;
        let latency_ms = started.elapsed().as_secs_f64() * 1_000.0;

        let remaining = remaining_hand(&state, &decision.play);
        let hand_score = self.policy.rules().hand_score(&remaining);

        event!(
            target: "phazed_bench::runner",
            Level::DEBUG,
            sample = index,
            seed,
            play = %decision.play,
            latency_ms,
        );

        Ok(SampleRow {
            run_id: self.config.run_id.clone(),
            sample_id: format!("S{index:05}"),
            seed,
            phase: phase.number(),
            opponents_down,
            previous_play,
            play_type: decision.play.play_type().number(),
            play: decision.play,
            reason: decision.reason.to_string(),
            latency_ms,
            hand_score,
        })
    }

    /// Builds the position for player 0 from `seed`.
    ///
    /// Every player gets a random phase status. Opponents holding a complete
    /// phase have already laid it down. Player 0 is either starting a turn
    /// (with or without an opponent's discard in the history) or has just
    /// drawn or taken the discard.
    pub fn deal(&self, seed: u64) -> Result<DecisionState, RunnerError> {
        let deals = &self.config.deals;
        let rules = self.policy.rules();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut deck = Deck::shuffled(&mut rng);

        let hands: Vec<Hand> = (0..deals.players)
            .map(|_| Hand::with_cards(deck.deal(deals.hand_size)))
            .collect();
        let phase_status: Vec<usize> = (0..deals.players)
            .map(|_| rng.gen_range(0..PHASES))
            .collect();

        let mut table = Table::new(deals.players);
        for (player, hand) in hands.iter().enumerate().skip(1) {
            let Some(phase) = PhaseType::after_completed(phase_status[player]) else {
                continue;
            };
            let search = find_phase(rules, &hand.held(), phase, SearchMode::Commit);
            if search.completeness.is_complete() {
                table.lay_down(player, phase, search.meld_cards())?;
            }
        }

        let mut hand = hands.into_iter().next().unwrap_or_default();
        let mut discard = deck.draw();
        let mut history = TurnHistory::new();
        match rng.gen_range(0..4u8) {
            0 => {}
            1 => {
                if let Some(card) = discard {
                    history.record(deals.players - 1, Play::Discard { card });
                }
            }
            2 => {
                if let Some(card) = deck.draw() {
                    hand.push(card);
                }
                history.record(0, Play::Draw);
            }
            _ => {
                if let Some(card) = discard.take() {
                    hand.push(card);
                    history.record(0, Play::TakeDiscard { card });
                }
            }
        }

        Ok(DecisionState {
            player: 0,
            table,
            history,
            phase_status,
            hand,
            discard,
        })
    }
}

/// Cards left in hand once `play` is made.
fn remaining_hand(state: &DecisionState, play: &Play) -> Vec<Card> {
    let mut hand = state.hand.clone();
    match play {
        Play::Draw => {}
        Play::TakeDiscard { card } => hand.push(*card),
        Play::LayPhase { groups, .. } => {
            for card in groups.iter().flatten() {
                hand.remove(*card);
            }
        }
        Play::ExtendTable { card, .. } | Play::Discard { card } => {
            hand.remove(*card);
        }
    }
    hand.cards().to_vec()
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("decision failed: {0}")]
    Decision(#[from] DecisionError),
    #[error("could not build the table: {0}")]
    Table(#[from] TableError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DealConfig, LoggingConfig, MetricsConfig, OutputsConfig};
    use phazed_core::model::card::parse_cards;

    fn runner(seed: u64) -> BenchmarkRunner {
        let config = BenchmarkConfig {
            run_id: "unit".to_string(),
            deals: DealConfig {
                seed: Some(seed),
                samples: 4,
                players: 4,
                hand_size: 10,
            },
            outputs: OutputsConfig {
                jsonl: "unused.jsonl".to_string(),
                summary_md: "unused.md".to_string(),
            },
            metrics: MetricsConfig::default(),
            logging: LoggingConfig::default(),
        };
        let outputs = config.resolved_outputs();
        BenchmarkRunner::new(config, outputs)
    }

    #[test]
    fn deals_are_reproducible() {
        let runner = runner(7);
        for seed in [1, 2, 99] {
            assert_eq!(runner.deal(seed).unwrap(), runner.deal(seed).unwrap());
        }
    }

    #[test]
    fn dealt_positions_are_valid() {
        let runner = runner(7);
        let rules = runner.policy.rules();
        for seed in 0..50 {
            let state = runner.deal(seed).unwrap();
            state.validate(rules).unwrap();
            assert!(!state.table.has_phase(0));
            assert!((10..=11).contains(&state.hand.len()));
        }
    }

    #[test]
    fn remaining_hand_drops_played_cards() {
        let hand = Hand::with_cards(parse_cards("3C 3D 3H 9S").unwrap());
        let state = DecisionState {
            player: 0,
            table: Table::new(2),
            history: TurnHistory::new(),
            phase_status: vec![0, 0],
            hand,
            discard: None,
        };
        let discard = Play::Discard {
            card: "9S".parse().unwrap(),
        };
        assert_eq!(remaining_hand(&state, &discard), parse_cards("3C 3D 3H").unwrap());

        let lay = Play::LayPhase {
            phase: PhaseType::One,
            groups: vec![parse_cards("3C 3D 3H").unwrap()],
        };
        assert_eq!(remaining_hand(&state, &lay), parse_cards("9S").unwrap());
    }
}
