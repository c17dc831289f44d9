//! CLI interface for trade-tape
//!
//! Provides subcommands for:
//! - `capture`: Record the trade stream to the CSV tape
//! - `watch`: Print the live trade stream without recording
//! - `dashboard`: Summarize the tape, refreshing periodically
//! - `status`: Count stored trades
//! - `config`: Show configuration

mod capture;
mod dashboard;
mod watch;

pub use capture::CaptureArgs;
pub use dashboard::{render_chart, render_report, DashboardArgs};
pub use watch::{format_trade, WatchArgs};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "trade-tape")]
#[command(about = "Record a live exchange trade stream to a CSV tape and summarize it")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record trades to the CSV tape
    Capture(CaptureArgs),
    /// Print live trades without recording
    Watch(WatchArgs),
    /// Show tape statistics and price chart
    Dashboard(DashboardArgs),
    /// Count trades stored in the tape
    Status {
        /// Tape to inspect (defaults to capture.output_path)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Show configuration
    Config,
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
pub(crate) async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
