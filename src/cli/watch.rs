//! Watch command implementation

use crate::config::Config;
use crate::data::RecordError;
use crate::feed::{BinanceFeed, TradeEvent};
use crate::session::{FeedSubscriber, Flow, TradeHandler};
use clap::Args;
use serde_json::Value;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Trading pair, e.g. BTCUSDT (defaults to feed.symbol)
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Stop after this many trades, 0 = no limit
    #[arg(short, long, default_value = "0")]
    pub limit: u64,

    /// Stop after this many seconds
    #[arg(short, long)]
    pub duration_secs: Option<u64>,
}

/// One printable line per trade
pub fn format_trade(label: &str, trade: &TradeEvent) -> String {
    format!(
        "{} Trade | Price: ${} | Qty: {} | Time: {}",
        label, trade.price, trade.quantity, trade.trade_time_ms
    )
}

/// Prints trades to stdout
struct TradePrinter {
    label: String,
    limit: u64,
    count: u64,
}

impl TradeHandler for TradePrinter {
    fn on_event(&mut self, raw: &Value) -> Result<Flow, RecordError> {
        let trade = BinanceFeed::parse_trade(raw)?;
        self.count += 1;
        println!("{}", format_trade(&self.label, &trade));

        if self.limit > 0 && self.count >= self.limit {
            Ok(Flow::Complete)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn target(&self) -> u64 {
        self.limit
    }
}

impl WatchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut feed_config = config.feed.clone();
        if let Some(symbol) = &self.symbol {
            feed_config.symbol = symbol.clone();
        }

        let subscriber = FeedSubscriber::new(&feed_config);
        let printer = TradePrinter {
            label: feed_config.symbol.to_uppercase(),
            limit: self.limit,
            count: 0,
        };

        let duration = self.duration_secs.map(Duration::from_secs);
        let shutdown = async move {
            match duration {
                Some(d) => {
                    tokio::select! {
                        _ = tokio::time::sleep(d) => {
                            tracing::info!(secs = d.as_secs(), "Watch duration elapsed");
                        }
                        _ = super::ctrl_c() => {}
                    }
                }
                None => super::ctrl_c().await,
            }
        };

        let summary = subscriber.run(printer, shutdown).await;
        println!("\n--- WebSocket connection closed ---");
        println!("Trades seen: {}", summary.records);

        if summary.reason.is_fatal() {
            anyhow::bail!("Watch failed: {}", summary.reason);
        }
        Ok(())
    }
}
