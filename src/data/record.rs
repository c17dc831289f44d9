//! Trade tape row format

use super::types::RowError;
use crate::feed::{Aggressor, TradeEvent};
use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Header line of the trade tape
pub const CSV_HEADER: &str = "timestamp,price,quantity,trade_time_ms,is_buyer_maker";

/// Receipt timestamp format, second precision
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRecord {
    /// Local wall-clock receipt time
    pub timestamp: NaiveDateTime,
    pub price: Decimal,
    pub quantity: Decimal,
    /// Exchange trade time (milliseconds since epoch)
    pub trade_time_ms: i64,
    pub is_buyer_maker: bool,
}

impl TradeRecord {
    /// Build the row for an event observed at `received_at`
    pub fn received(event: &TradeEvent, received_at: NaiveDateTime) -> Self {
        Self {
            timestamp: received_at.with_nanosecond(0).unwrap_or(received_at),
            price: event.price,
            quantity: event.quantity,
            trade_time_ms: event.trade_time_ms,
            is_buyer_maker: event.is_buyer_maker,
        }
    }

    /// The taker side of the stored trade
    pub fn aggressor(&self) -> Aggressor {
        Aggressor::from_buyer_maker(self.is_buyer_maker)
    }

    /// Format as a CSV line without the trailing newline
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.price,
            self.quantity,
            self.trade_time_ms,
            self.is_buyer_maker
        )
    }

    /// Parse a CSV line written by [`TradeRecord::to_csv_line`]
    ///
    /// Booleans written as `True`/`False` are accepted too.
    pub fn from_csv_line(line: &str) -> Result<Self, RowError> {
        let fields: Vec<&str> = line.trim_end_matches('\r').split(',').collect();
        if fields.len() != 5 {
            return Err(RowError(format!(
                "expected 5 fields, found {}",
                fields.len()
            )));
        }

        let timestamp = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT)
            .map_err(|e| RowError(format!("timestamp {:?}: {}", fields[0], e)))?;
        let price = Decimal::from_str(fields[1])
            .map_err(|e| RowError(format!("price {:?}: {}", fields[1], e)))?;
        let quantity = Decimal::from_str(fields[2])
            .map_err(|e| RowError(format!("quantity {:?}: {}", fields[2], e)))?;
        let trade_time_ms = fields[3]
            .parse::<i64>()
            .map_err(|e| RowError(format!("trade_time_ms {:?}: {}", fields[3], e)))?;
        let is_buyer_maker = match fields[4] {
            "true" | "True" | "TRUE" => true,
            "false" | "False" | "FALSE" => false,
            other => return Err(RowError(format!("is_buyer_maker {:?}", other))),
        };

        Ok(Self {
            timestamp,
            price,
            quantity,
            trade_time_ms,
            is_buyer_maker,
        })
    }
}
