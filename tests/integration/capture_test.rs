//! End-to-end capture sessions over a scripted feed

use crate::support::{scripted, trade};
use std::fs;
use tempfile::TempDir;
use trade_tape::data::{count_rows, load_trades, CsvStore, Recorder, CSV_HEADER};
use trade_tape::session::{drive, CloseReason};
use trade_tape::ws::WsMessage;

#[tokio::test]
async fn test_scenario_bad_frame_between_two_trades() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data").join("btc_trades.csv");

    let conn = scripted(
        vec![
            WsMessage::Connected,
            WsMessage::Text(r#"{"p":"50000.00","q":"0.001","T":1700000000000,"m":false}"#.into()),
            WsMessage::Text("this is not json".into()),
            WsMessage::Text(r#"{"p":"50010.50","q":"0.002","T":1700000000500,"m":true}"#.into()),
            trade("50020.00", "0.003", 1700000001000, false),
        ],
        false,
    );
    let handle = conn.handle.clone();

    let summary = drive(
        conn,
        Recorder::new(CsvStore::new(&path), 2),
        std::future::pending(),
    )
    .await;

    assert_eq!(summary.reason, CloseReason::LimitReached);
    assert_eq!(summary.records, 2);
    assert_eq!(summary.protocol_errors, 1);
    assert!(handle.is_closed());

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], CSV_HEADER);
    assert!(lines[1].ends_with(",50000.00,0.001,1700000000000,false"));
    assert!(lines[2].ends_with(",50010.50,0.002,1700000000500,true"));
}

#[tokio::test]
async fn test_header_written_once_across_sessions() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("btc_trades.csv");

    for run in 0..3 {
        let conn = scripted(
            vec![
                WsMessage::Connected,
                trade("100.0", "1", 1700000000000 + run, false),
                trade("101.0", "1", 1700000000001 + run, true),
            ],
            false,
        );
        let summary = drive(
            conn,
            Recorder::new(CsvStore::new(&path), 2),
            std::future::pending(),
        )
        .await;
        assert_eq!(summary.records, 2);
    }

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.matches(CSV_HEADER).count(), 1);
    assert_eq!(count_rows(&path).unwrap(), 6);
}

#[tokio::test]
async fn test_completion_boundary_stops_appending() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("btc_trades.csv");

    let frames = (0..10)
        .map(|i| trade(&format!("{}.5", 100 + i), "0.1", 1700000000000 + i, false));
    let conn = scripted(
        std::iter::once(WsMessage::Connected).chain(frames).collect(),
        false,
    );

    let summary = drive(
        conn,
        Recorder::new(CsvStore::new(&path), 3),
        std::future::pending(),
    )
    .await;

    assert_eq!(summary.records, 3);
    let log = load_trades(&path).unwrap();
    assert_eq!(log.records.len(), 3);
    assert_eq!(log.records[2].price.to_string(), "102.5");
}

#[tokio::test]
async fn test_malformed_events_dropped_without_ending_session() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("btc_trades.csv");

    let conn = scripted(
        vec![
            WsMessage::Connected,
            trade("1.0", "1", 1, false),
            WsMessage::Text(r#"{"p":"2.0","q":"1","T":2}"#.into()),
            WsMessage::Text(r#"{"result":null,"id":1}"#.into()),
            trade("3.0", "1", 3, true),
        ],
        true,
    );

    let summary = drive(
        conn,
        Recorder::new(CsvStore::new(&path), 0),
        std::future::pending(),
    )
    .await;

    assert_eq!(summary.reason, CloseReason::RemoteClosed);
    assert_eq!(summary.records, 2);
    assert_eq!(summary.malformed_events, 2);

    let prices: Vec<String> = load_trades(&path)
        .unwrap()
        .records
        .iter()
        .map(|r| r.price.to_string())
        .collect();
    assert_eq!(prices, vec!["1.0", "3.0"]);
}

#[tokio::test]
async fn test_write_failure_ends_session() {
    let temp_dir = TempDir::new().unwrap();
    // Parent "directory" is a regular file, so the tape cannot be created
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let path = blocker.join("btc_trades.csv");

    let conn = scripted(
        vec![
            WsMessage::Connected,
            trade("1.0", "1", 1, false),
            trade("2.0", "1", 2, false),
        ],
        false,
    );
    let handle = conn.handle.clone();

    let summary = drive(
        conn,
        Recorder::new(CsvStore::new(&path), 10),
        std::future::pending(),
    )
    .await;

    assert!(matches!(summary.reason, CloseReason::StoreFailed(_)));
    assert!(summary.reason.is_fatal());
    assert_eq!(summary.records, 0);
    assert!(handle.is_closed());
}

#[tokio::test]
async fn test_no_file_without_records() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("btc_trades.csv");

    let conn = scripted(
        vec![WsMessage::Connected, WsMessage::Text("garbage".into())],
        true,
    );
    let summary = drive(
        conn,
        Recorder::new(CsvStore::new(&path), 5),
        std::future::pending(),
    )
    .await;

    assert_eq!(summary.records, 0);
    assert!(!path.exists());
}
