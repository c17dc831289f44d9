//! Capture command implementation

use crate::config::Config;
use crate::data::{CsvStore, Recorder};
use crate::session::{CloseReason, FeedSubscriber, SessionSummary};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// CSV file to append to (defaults to capture.output_path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop after this many trades, 0 = run until Ctrl-C
    #[arg(short = 'n', long)]
    pub max_trades: Option<u64>,

    /// Trading pair, e.g. BTCUSDT (defaults to feed.symbol)
    #[arg(short, long)]
    pub symbol: Option<String>,
}

impl CaptureArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        if !config.feed.exchange.eq_ignore_ascii_case("binance") {
            anyhow::bail!("Unsupported exchange: {}", config.feed.exchange);
        }

        let mut feed_config = config.feed.clone();
        if let Some(symbol) = &self.symbol {
            feed_config.symbol = symbol.clone();
        }
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| config.capture.output_path.clone());
        let max_trades = self.max_trades.unwrap_or(config.capture.max_trades);

        println!(
            "Starting {} trade collector...",
            feed_config.symbol.to_uppercase()
        );
        println!("Press Ctrl+C to stop manually\n");
        tracing::info!(output = ?output, max_trades, "Starting data capture");

        let subscriber = FeedSubscriber::new(&feed_config);
        let recorder = Recorder::new(CsvStore::new(&output), max_trades);
        let summary = subscriber.run(recorder, super::ctrl_c()).await;

        print_summary(&summary, &output);

        if summary.reason.is_fatal() {
            anyhow::bail!("Capture failed: {}", summary.reason);
        }
        Ok(())
    }
}

fn print_summary(summary: &SessionSummary, output: &Path) {
    match &summary.reason {
        CloseReason::LimitReached => {
            println!("\nCollected {} trades successfully!", summary.records);
            println!("Data saved to: {}", output.display());
        }
        CloseReason::Interrupted => println!("\nStopped by user (Ctrl+C)"),
        CloseReason::RemoteClosed => println!("\nConnection closed by the exchange"),
        CloseReason::ConnectionFailed(e) => eprintln!("\nConnection error: {}", e),
        CloseReason::StoreFailed(e) => eprintln!("\nI/O error: {}", e),
    }

    println!("\n--- WebSocket connection closed ---");
    println!("Total trades collected: {}", summary.records);
    if summary.protocol_errors + summary.malformed_events > 0 {
        println!(
            "Dropped frames: {} invalid JSON, {} malformed events",
            summary.protocol_errors, summary.malformed_events
        );
    }
}
