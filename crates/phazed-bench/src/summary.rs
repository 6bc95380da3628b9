use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use phazed_core::AppInfo;
use statrs::statistics::{Data, OrderStatistics, Statistics};

use crate::runner::SampleRow;

/// Collects per-sample figures while a run streams its rows.
pub struct SummaryCollector {
    budget_ms: u64,
    play_counts: BTreeMap<String, usize>,
    latencies: Vec<f64>,
    hand_scores: Vec<f64>,
}

impl SummaryCollector {
    pub fn new(budget_ms: u64) -> Self {
        Self {
            budget_ms,
            play_counts: BTreeMap::new(),
            latencies: Vec::new(),
            hand_scores: Vec::new(),
        }
    }

    pub fn record(&mut self, row: &SampleRow) {
        *self
            .play_counts
            .entry(row.play.play_type().to_string())
            .or_insert(0) += 1;
        self.latencies.push(row.latency_ms);
        self.hand_scores.push(f64::from(row.hand_score));
    }

    pub fn finish(self) -> BenchmarkSummary {
        let budget = self.budget_ms as f64;
        let over_budget = self.latencies.iter().filter(|&&ms| ms > budget).count();
        let mean_hand_score = if self.hand_scores.is_empty() {
            0.0
        } else {
            Statistics::mean(self.hand_scores.iter())
        };
        BenchmarkSummary {
            samples: self.latencies.len(),
            play_counts: self.play_counts,
            latency: LatencyStats::from_samples(&self.latencies),
            budget_ms: self.budget_ms,
            over_budget,
            mean_hand_score,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LatencyStats {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
}

impl LatencyStats {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self {
                mean_ms: 0.0,
                median_ms: 0.0,
                p95_ms: 0.0,
                max_ms: 0.0,
            };
        }
        let mut data = Data::new(samples.to_vec());
        Self {
            mean_ms: Statistics::mean(samples.iter()),
            median_ms: data.median(),
            p95_ms: data.percentile(95),
            max_ms: samples.iter().copied().fold(f64::MIN, f64::max),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BenchmarkSummary {
    pub samples: usize,
    pub play_counts: BTreeMap<String, usize>,
    pub latency: LatencyStats,
    pub budget_ms: u64,
    pub over_budget: usize,
    pub mean_hand_score: f64,
}

impl BenchmarkSummary {
    pub fn to_markdown(&self, run_id: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Decision Benchmark: {run_id}\n\n"));
        out.push_str(&format!(
            "Engine: {} - {}\n\n",
            AppInfo::name(),
            AppInfo::version()
        ));
        out.push_str(&format!("Samples: {}\n\n", self.samples));

        out.push_str("## Play types\n\n");
        out.push_str("| Play type | Count | Share |\n");
        out.push_str("|---|---:|---:|\n");
        for (play, count) in &self.play_counts {
            let share = if self.samples == 0 {
                0.0
            } else {
                *count as f64 * 100.0 / self.samples as f64
            };
            out.push_str(&format!("| {play} | {count} | {share:.1}% |\n"));
        }

        out.push_str("\n## Latency\n\n");
        out.push_str("| Mean (ms) | Median (ms) | p95 (ms) | Max (ms) |\n");
        out.push_str("|---:|---:|---:|---:|\n");
        out.push_str(&format!(
            "| {:.3} | {:.3} | {:.3} | {:.3} |\n\n",
            self.latency.mean_ms, self.latency.median_ms, self.latency.p95_ms, self.latency.max_ms
        ));
        out.push_str(&format!(
            "Decisions over the {} ms budget: {}\n\n",
            self.budget_ms, self.over_budget
        ));
        out.push_str(&format!(
            "Mean remaining hand score: {:.2}\n",
            self.mean_hand_score
        ));
        out
    }

    pub fn write_markdown(&self, run_id: &str, path: impl AsRef<Path>) -> std::io::Result<()> {
        fs::write(path, self.to_markdown(run_id))
    }
}
