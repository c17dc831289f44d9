//! Tape storage and dashboard aggregation over real files

use rust_decimal_macros::dec;
use std::fs;
use tempfile::TempDir;
use tokio_test::assert_ok;
use trade_tape::cli::render_report;
use trade_tape::config::DashboardConfig;
use trade_tape::data::{count_rows, load_trades, CsvStore, TradeRecord, TradeStore};
use trade_tape::stats::{resample_mean_price, TapeSummary};

fn record(secs: u32, price: rust_decimal::Decimal, maker: bool) -> TradeRecord {
    TradeRecord {
        timestamp: chrono::NaiveDate::from_ymd_opt(2023, 11, 14)
            .unwrap()
            .and_hms_opt(22, 13, secs)
            .unwrap(),
        price,
        quantity: dec!(0.5),
        trade_time_ms: 1_700_000_000_000 + secs as i64 * 1000,
        is_buyer_maker: maker,
    }
}

#[test]
fn test_written_tape_reads_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("btc_trades.csv");
    let mut store = CsvStore::new(&path);

    assert_ok!(store.append(&record(0, dec!(100.00), false)));
    assert_ok!(store.append(&record(0, dec!(102.00), true)));
    assert_ok!(store.append(&record(2, dec!(99.50), false)));

    let log = load_trades(&path).unwrap();
    assert_eq!(log.records.len(), 3);
    assert_eq!(log.records[1], record(0, dec!(102.00), true));

    let summary = TapeSummary::from_records(&log.records).unwrap();
    assert_eq!(summary.high, dec!(102.00));
    assert_eq!(summary.low, dec!(99.50));
    assert_eq!(summary.buy_trades, 2);
    assert_eq!(summary.sell_trades, 1);

    let points = resample_mean_price(&log.records, 1);
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].mean_price, dec!(101.00));
}

#[test]
fn test_reads_tape_from_pandas_collector() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("btc_trades.csv");
    fs::write(
        &path,
        "timestamp,price,quantity,trade_time_ms,is_buyer_maker\n\
         2025-01-10 10:00:00,94000.1,0.00012,1736503200000,False\n\
         2025-01-10 10:00:01,94001.0,0.5,1736503201000,True\n",
    )
    .unwrap();

    let log = load_trades(&path).unwrap();
    assert_eq!(log.records.len(), 2);
    assert!(log.records[1].is_buyer_maker);

    // Appending keeps the existing header
    let mut store = CsvStore::new(&path);
    assert_ok!(store.append(&record(5, dec!(94002.0), false)));
    assert_eq!(count_rows(&path).unwrap(), 3);
}

#[test]
fn test_dashboard_report_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("btc_trades.csv");
    let mut store = CsvStore::new(&path);
    for secs in 0..5 {
        store
            .append(&record(secs, dec!(50000) + rust_decimal::Decimal::from(secs), secs % 2 == 1))
            .unwrap();
    }

    let log = load_trades(&path).unwrap();
    let report = render_report(&log, &DashboardConfig::default());
    assert!(report.contains("Total Trades:     5"));
    assert!(report.contains("Latest Price:     $50004.00"));
    assert!(report.contains("LAST 5 TRADES"));
}
