//! Dashboard command implementation

use crate::config::{Config, DashboardConfig};
use crate::data::{load_trades, TradeLog, CSV_HEADER};
use crate::stats::{resample_mean_price, PricePoint, TapeSummary};
use clap::Args;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Widest bar in the price chart
const CHART_WIDTH: usize = 40;

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Tape to read (defaults to capture.output_path)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Render once and exit
    #[arg(long)]
    pub once: bool,

    /// Seconds between refreshes (defaults to dashboard.refresh_interval_secs)
    #[arg(short, long)]
    pub refresh: Option<u64>,
}

impl DashboardArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let path = self
            .input
            .clone()
            .unwrap_or_else(|| config.capture.output_path.clone());

        if !path.exists() {
            anyhow::bail!(
                "No data file found at {}. Run `trade-tape capture` first.",
                path.display()
            );
        }

        if self.once {
            println!("{}", render_file(&path, &config.dashboard)?);
            return Ok(());
        }

        let refresh = self
            .refresh
            .unwrap_or(config.dashboard.refresh_interval_secs)
            .max(1);
        refresh_loop(
            &path,
            &config.dashboard,
            Duration::from_secs(refresh),
            super::ctrl_c(),
        )
        .await;

        Ok(())
    }
}

/// Redraw the report every `refresh` until `shutdown` resolves. Returns the
/// number of reports drawn.
async fn refresh_loop<F>(
    path: &Path,
    config: &DashboardConfig,
    refresh: Duration,
    shutdown: F,
) -> usize
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut interval = tokio::time::interval(refresh);
    let mut renders = 0;

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => break,
            _ = interval.tick() => {
                match render_file(path, config) {
                    Ok(report) => {
                        // Clear screen, cursor home
                        print!("\x1b[2J\x1b[H");
                        println!("{}", report);
                        println!(
                            "Refreshing every {}s. Press Ctrl+C to exit.",
                            refresh.as_secs()
                        );
                        renders += 1;
                    }
                    Err(e) => tracing::warn!(error = %e, "Dashboard refresh failed"),
                }
            }
        }
    }

    renders
}

fn render_file(path: &Path, config: &DashboardConfig) -> anyhow::Result<String> {
    let log = load_trades(path)?;
    Ok(render_report(&log, config))
}

/// Full text report for a loaded tape
pub fn render_report(log: &TradeLog, config: &DashboardConfig) -> String {
    let mut out = String::new();

    let Some(summary) = TapeSummary::from_records(&log.records) else {
        return "No trades recorded yet.".to_string();
    };

    out.push_str(&summary.format_table());

    let points = resample_mean_price(&log.records, config.resample_secs);
    let shown = &points[points.len().saturating_sub(config.chart_points)..];
    let _ = writeln!(
        out,
        "\nPRICE MOVEMENT ({}s mean, last {} points)",
        config.resample_secs.max(1),
        shown.len()
    );
    out.push_str(&render_chart(shown, CHART_WIDTH));

    let tail = &log.records[log.records.len().saturating_sub(config.tail_rows)..];
    let _ = writeln!(out, "\nLAST {} TRADES", tail.len());
    let _ = writeln!(out, "{}", CSV_HEADER);
    for record in tail {
        let _ = writeln!(out, "{}", record.to_csv_line());
    }

    if log.skipped > 0 {
        let _ = writeln!(out, "\n({} unreadable rows skipped)", log.skipped);
    }

    out
}

/// Horizontal bar chart, one line per point, bars scaled between the lowest
/// and highest price shown
pub fn render_chart(points: &[PricePoint], width: usize) -> String {
    let mut out = String::new();
    let (Some(low), Some(high)) = (
        points.iter().map(|p| p.mean_price).min(),
        points.iter().map(|p| p.mean_price).max(),
    ) else {
        return out;
    };

    let span = high - low;
    for point in points {
        let bars = if span.is_zero() {
            width
        } else {
            let scaled = (point.mean_price - low) / span * Decimal::from(width.saturating_sub(1));
            scaled.round().to_usize().unwrap_or(0) + 1
        };
        let _ = writeln!(
            out,
            "{}  {:>12.2}  {}",
            point.bucket.format("%H:%M:%S"),
            point.mean_price,
            "█".repeat(bars)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TradeRecord;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(second: u32, price: Decimal) -> TradeRecord {
        TradeRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, second)
                .unwrap(),
            price,
            quantity: dec!(0.01),
            trade_time_ms: 1_704_110_400_000,
            is_buyer_maker: second % 2 == 0,
        }
    }

    fn write_tape(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("trades.csv");
        std::fs::write(
            &path,
            format!(
                "{}\n{}\n",
                CSV_HEADER,
                record(0, dec!(100)).to_csv_line()
            ),
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn test_refresh_loop_honors_pending_shutdown() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = write_tape(&temp_dir);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tx.send(()).unwrap();

        let renders = refresh_loop(
            &path,
            &DashboardConfig::default(),
            Duration::from_secs(1),
            async move {
                let _ = rx.await;
            },
        )
        .await;
        assert_eq!(renders, 0);
    }

    #[tokio::test]
    async fn test_refresh_loop_stops_between_ticks() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = write_tape(&temp_dir);

        let renders = tokio::time::timeout(
            Duration::from_secs(5),
            refresh_loop(
                &path,
                &DashboardConfig::default(),
                Duration::from_secs(1),
                tokio::time::sleep(Duration::from_millis(50)),
            ),
        )
        .await
        .expect("Test timed out");
        assert_eq!(renders, 1);
    }

    #[test]
    fn test_render_empty_log() {
        let report = render_report(&TradeLog::default(), &DashboardConfig::default());
        assert_eq!(report, "No trades recorded yet.");
    }

    #[test]
    fn test_chart_scales_bars() {
        let points = vec![
            PricePoint {
                bucket: record(0, dec!(0)).timestamp,
                mean_price: dec!(100),
                trades: 1,
            },
            PricePoint {
                bucket: record(1, dec!(0)).timestamp,
                mean_price: dec!(110),
                trades: 1,
            },
        ];

        let chart = render_chart(&points, 10);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("12:00:00"));
        assert_eq!(lines[0].matches('█').count(), 1);
        assert_eq!(lines[1].matches('█').count(), 10);
    }

    #[test]
    fn test_chart_flat_prices() {
        let points = vec![PricePoint {
            bucket: record(0, dec!(0)).timestamp,
            mean_price: dec!(5),
            trades: 3,
        }];
        assert_eq!(render_chart(&points, 8).matches('█').count(), 8);
    }

    #[test]
    fn test_report_limits_tail_and_chart() {
        let log = TradeLog {
            records: (0..10).map(|s| record(s, Decimal::from(100 + s))).collect(),
            skipped: 1,
        };
        let config = DashboardConfig {
            tail_rows: 3,
            chart_points: 4,
            ..Default::default()
        };

        let report = render_report(&log, &config);
        assert!(report.contains("TRADE TAPE SUMMARY"));
        assert!(report.contains("last 4 points"));
        assert!(report.contains("LAST 3 TRADES"));
        assert!(report.contains("2024-01-01 12:00:09,109,0.01,1704110400000,false"));
        assert!(!report.contains("2024-01-01 12:00:06,106"));
        assert!(report.contains("(1 unreadable rows skipped)"));
    }
}
