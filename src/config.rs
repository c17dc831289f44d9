//! Configuration types for trade-tape

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Trade feed configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    #[serde(default = "default_exchange")]
    pub exchange: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Keepalive ping interval (seconds)
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,

    /// Reconnection attempts after a dropped connection (0 = never)
    #[serde(default)]
    pub max_reconnects: u32,

    /// Initial reconnection backoff (milliseconds)
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Backoff ceiling (milliseconds)
    #[serde(default = "default_max_reconnect_delay_ms")]
    pub max_reconnect_delay_ms: u64,
}

fn default_exchange() -> String {
    "binance".to_string()
}
fn default_symbol() -> String {
    "BTCUSDT".to_string()
}
fn default_ping_interval_secs() -> u64 {
    60
}
fn default_reconnect_delay_ms() -> u64 {
    1_000
}
fn default_max_reconnect_delay_ms() -> u64 {
    60_000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            exchange: default_exchange(),
            symbol: default_symbol(),
            ping_interval_secs: 60,
            max_reconnects: 0,
            reconnect_delay_ms: 1_000,
            max_reconnect_delay_ms: 60_000,
        }
    }
}

/// Capture configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// CSV tape path
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Stop after this many trades (0 = run until interrupted)
    #[serde(default = "default_max_trades")]
    pub max_trades: u64,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data/btc_trades.csv")
}
fn default_max_trades() -> u64 {
    5000
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            max_trades: 5000,
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Seconds between re-reads of the tape
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Width of the price resampling bucket (seconds)
    #[serde(default = "default_resample_secs")]
    pub resample_secs: u64,

    /// Raw rows shown at the bottom
    #[serde(default = "default_tail_rows")]
    pub tail_rows: usize,

    /// Resampled points drawn in the chart
    #[serde(default = "default_chart_points")]
    pub chart_points: usize,
}

fn default_refresh_interval_secs() -> u64 {
    5
}
fn default_resample_secs() -> u64 {
    1
}
fn default_tail_rows() -> usize {
    20
}
fn default_chart_points() -> usize {
    30
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5,
            resample_secs: 1,
            tail_rows: 20,
            chart_points: 30,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
