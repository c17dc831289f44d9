//! Trade recorder: event → row → tape, with the session counter

use super::record::TradeRecord;
use super::types::RecordError;
use super::TradeStore;
use crate::feed::BinanceFeed;
use crate::session::{Flow, TradeHandler};
use crate::telemetry;
use chrono::{Local, NaiveDateTime};
use serde_json::Value;

/// Persists each trade event and decides when capture is complete
pub struct Recorder<S> {
    store: S,
    /// Stop after this many records (0 = unbounded)
    max_trades: u64,
    /// Records appended in this session
    count: u64,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl<S: TradeStore> Recorder<S> {
    /// Create a recorder writing to `store`
    pub fn new(store: S, max_trades: u64) -> Self {
        Self {
            store,
            max_trades,
            count: 0,
            clock: local_now,
        }
    }

    /// Override the receipt clock
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Records appended in this session
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether the target has been reached
    pub fn is_complete(&self) -> bool {
        self.max_trades > 0 && self.count >= self.max_trades
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Parse, append and count one decoded event.
    ///
    /// The counter moves only after the row is on disk. Once complete, further
    /// events are refused without touching the store.
    pub fn on_event(&mut self, raw: &Value) -> Result<Flow, RecordError> {
        if self.is_complete() {
            return Ok(Flow::Complete);
        }

        let event = BinanceFeed::parse_trade(raw)?;
        let record = TradeRecord::received(&event, (self.clock)());

        self.store.append(&record)?;
        self.count += 1;
        telemetry::record_trade(self.count);

        if self.max_trades > 0 {
            tracing::info!(
                count = self.count,
                target = self.max_trades,
                price = %record.price,
                quantity = %record.quantity,
                side = ?event.aggressor(),
                "Trade {}/{}",
                self.count,
                self.max_trades
            );
        } else {
            tracing::info!(
                count = self.count,
                price = %record.price,
                quantity = %record.quantity,
                side = ?event.aggressor(),
                "Trade {}",
                self.count
            );
        }

        if self.is_complete() {
            tracing::info!(count = self.count, "Collected target number of trades");
            Ok(Flow::Complete)
        } else {
            Ok(Flow::Continue)
        }
    }
}

impl<S: TradeStore> TradeHandler for Recorder<S> {
    fn on_event(&mut self, raw: &Value) -> Result<Flow, RecordError> {
        Recorder::on_event(self, raw)
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn target(&self) -> u64 {
        self.max_trades
    }
}
