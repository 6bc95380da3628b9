use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use phazed_bench::config::{BenchmarkConfig, ResolvedOutputs};
use phazed_bench::logging::init_logging;
use phazed_bench::runner::BenchmarkRunner;
use phazed_core::game::state::DecisionState;

/// Benchmarking harness for the phase rummy decision engine.
#[derive(Debug, Parser)]
#[command(
    name = "phazed-bench",
    author,
    version,
    about = "Deterministic decision benchmark for the phazed bot"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Time decisions over seeded deals described by a YAML config.
    Run(RunArgs),
    /// Print the play chosen for a JSON decision snapshot.
    Decide {
        /// Path to the JSON decision state.
        #[arg(short, long, value_name = "FILE")]
        state: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of sampled decisions.
    #[arg(long, value_name = "SAMPLES")]
    samples: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no samples are run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Decide { state } => decide(state),
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = BenchmarkConfig::from_path(&args.config)?;

    if let Some(run_id) = args.run_id {
        config.run_id = run_id;
    }

    if let Some(samples) = args.samples {
        config.deals.samples = samples;
    }

    if let Some(seed) = args.seed {
        config.deals.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let samples = config.deals.samples;
    let players = config.deals.players;

    println!(
        "Loaded configuration '{run_id}' ({samples} sample{}, {players} players)",
        if samples == 1 { "" } else { "s" }
    );

    if args.validate_only {
        println!("Validation-only mode: benchmark execution skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = BenchmarkRunner::new(config, outputs);
    let summary = runner.run()?;

    println!(
        "Benchmark complete for '{run_id}': {} rows at {}",
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    println!(
        "  Latency: mean {:.3} ms, median {:.3} ms, p95 {:.3} ms ({} over budget)",
        summary.summary.latency.mean_ms,
        summary.summary.latency.median_ms,
        summary.summary.latency.p95_ms,
        summary.summary.over_budget
    );
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}

fn decide(path: PathBuf) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("reading decision state {}", path.display()))?;
    let state = DecisionState::from_json(&raw)
        .with_context(|| format!("parsing decision state {}", path.display()))?;
    let decision = phazed_bot::decide(&state)?;
    println!("{}", serde_json::to_string_pretty(&decision.play)?);
    Ok(())
}
