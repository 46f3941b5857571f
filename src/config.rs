//! Configuration types for hll-steamroll

use crate::crcon::CrconConfig;
use crate::game::DEFAULT_STEAMROLL_THRESHOLD_MINUTES;
use crate::stats::DEFAULT_SERIES_CAPACITY;
use crate::telemetry::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub export: ExportConfig,
    pub telemetry: TelemetryConfig,
}

/// CRCON server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_timeout_secs() -> u64 {
    15
}
fn default_max_retries() -> u32 {
    3
}
fn default_initial_backoff_ms() -> u64 {
    1000
}

impl ServerConfig {
    /// Client settings for this server
    pub fn crcon_config(&self) -> CrconConfig {
        CrconConfig {
            base_url: self.url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
        }
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between ticks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// History lookups before a finished match is dropped
    #[serde(default = "default_result_lookup_attempts")]
    pub result_lookup_attempts: u32,

    /// Allowed skew between live start time and history start time
    #[serde(default = "default_start_tolerance_secs")]
    pub start_tolerance_secs: i64,
}

fn default_interval_secs() -> u64 {
    120
}
fn default_result_lookup_attempts() -> u32 {
    5
}
fn default_start_tolerance_secs() -> i64 {
    5
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            result_lookup_attempts: default_result_lookup_attempts(),
            start_tolerance_secs: default_start_tolerance_secs(),
        }
    }
}

/// Match classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Warfare games shorter than this are steamrolls
    #[serde(default = "default_steamroll_threshold_minutes")]
    pub steamroll_threshold_minutes: i64,

    /// Below this many players on both sides the server is seeding
    #[serde(default = "default_seeding_threshold")]
    pub seeding_threshold: u32,

    /// Slots per metric series (max players per side)
    #[serde(default = "default_series_capacity")]
    pub series_capacity: usize,
}

fn default_steamroll_threshold_minutes() -> i64 {
    DEFAULT_STEAMROLL_THRESHOLD_MINUTES
}
fn default_seeding_threshold() -> u32 {
    25
}
fn default_series_capacity() -> usize {
    DEFAULT_SERIES_CAPACITY
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            steamroll_threshold_minutes: default_steamroll_threshold_minutes(),
            seeding_threshold: default_seeding_threshold(),
            series_capacity: default_series_capacity(),
        }
    }
}

/// Table export format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Parquet,
}

/// Feature/label export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_true() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: ExportFormat::Csv,
            output_dir: default_output_dir(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
