use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::Level;

const DEFAULT_PLAYERS: usize = 4;
const DEFAULT_HAND_SIZE: usize = 10;
const DEFAULT_LATENCY_BUDGET_MS: u64 = 50;
const DECK_SIZE: usize = 52;
const MAX_PLAYERS: usize = 6;

/// A decision benchmark as described by its YAML file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub deals: DealConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Reads, parses and validates the YAML file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) => return Err(ConfigError::Read { source, path }),
        };
        let mut cfg: BenchmarkConfig = match serde_yaml::from_str(&raw) {
            Ok(cfg) => cfg,
            Err(source) => return Err(ConfigError::Parse { source, path }),
        };
        if let Err(source) = cfg.validate() {
            return Err(ConfigError::Invalid { path, source });
        }
        Ok(cfg)
    }

    /// Checks every block; a blank tracing level is reset to `info` first.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        check_run_id(&self.run_id)?;
        self.deals.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.metrics.validate()?;
        self.logging.normalize();
        self.logging.validate()
    }

    /// Output paths with every `{run_id}` substituted.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: substitute_run_id(&self.run_id, &self.outputs.jsonl),
            summary_md: substitute_run_id(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// How many positions to deal and how large they are.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DealConfig {
    pub seed: Option<u64>,
    pub samples: usize,
    #[serde(default = "default_players")]
    pub players: usize,
    #[serde(default = "default_hand_size")]
    pub hand_size: usize,
}

impl DealConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.samples == 0 {
            return Err(invalid(
                "deals.samples",
                "number of samples must be greater than zero",
            ));
        }

        if !(2..=MAX_PLAYERS).contains(&self.players) {
            return Err(invalid(
                "deals.players",
                format!("players must be between 2 and {MAX_PLAYERS}"),
            ));
        }

        if self.hand_size == 0 {
            return Err(invalid(
                "deals.hand_size",
                "hand size must be greater than zero",
            ));
        }

        // Every hand, one card for the player's draw, and the discard.
        let needed = self.players * self.hand_size + 2;
        if needed > DECK_SIZE {
            return Err(invalid(
                "deals.hand_size",
                format!(
                    "{} players of {} cards need {needed} cards; the deck has {DECK_SIZE}",
                    self.players, self.hand_size
                ),
            ));
        }

        Ok(())
    }
}

fn default_players() -> usize {
    DEFAULT_PLAYERS
}

fn default_hand_size() -> usize {
    DEFAULT_HAND_SIZE
}

/// Where rows and the summary go. Both accept `{run_id}` templates.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        let targets = [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ];
        for (field, template) in targets {
            if template.trim().is_empty() {
                return Err(invalid(field, "path must not be empty"));
            }
        }

        if substitute_run_id(run_id, &self.jsonl) == substitute_run_id(run_id, &self.summary_md) {
            return Err(invalid(
                "outputs.summary_md",
                "summary would overwrite the JSONL rows",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MetricsConfig {
    /// Decisions slower than this are counted in the summary.
    #[serde(default = "default_latency_budget_ms")]
    pub latency_budget_ms: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            latency_budget_ms: default_latency_budget_ms(),
        }
    }
}

impl MetricsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.latency_budget_ms {
            0 => Err(invalid(
                "metrics.latency_budget_ms",
                "latency budget must be greater than zero",
            )),
            _ => Ok(()),
        }
    }
}

fn default_latency_budget_ms() -> u64 {
    DEFAULT_LATENCY_BUDGET_MS
}

/// Structured telemetry is off unless asked for.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default)]
    pub tracing_level: String,
}

impl LoggingConfig {
    fn normalize(&mut self) {
        let trimmed = self.tracing_level.trim();
        self.tracing_level = if trimmed.is_empty() {
            "info".to_string()
        } else {
            trimmed.to_ascii_lowercase()
        };
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.level().map(|_| ()).ok_or_else(|| {
            invalid(
                "logging.tracing_level",
                format!("unknown level '{}'", self.tracing_level),
            )
        })
    }

    /// The configured level; an unset level reads as `INFO`.
    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim() {
            "" => Some(Level::INFO),
            level => level.parse().ok(),
        }
    }
}

fn check_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(invalid("run_id", "run_id must not be empty"));
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
    if let Some(bad) = run_id.chars().find(|&c| !allowed(c)) {
        return Err(invalid(
            "run_id",
            format!("run_id contains {bad:?}; use letters, digits, '.', '_' or '-'"),
        ));
    }

    Ok(())
}

fn substitute_run_id(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

fn invalid(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Concrete output paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory holding the summary; telemetry is written next to it.
    pub fn artifact_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("{path:?} is not a benchmark config: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("{path:?} failed validation: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path,
        }
    }
}

/// A config value that cannot be used, keyed by its dotted field path.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
