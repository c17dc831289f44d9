//! Binance trade stream decoding

use super::types::{FeedError, TradeEvent};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// Binance WebSocket base URL
const BINANCE_WS_URL: &str = "wss://stream.binance.com:9443/ws";

/// Binance trade message structure
#[derive(Debug, Deserialize)]
struct BinanceTradeMessage {
    /// Event type
    #[serde(rename = "e", default)]
    event_type: Option<String>,
    /// Symbol
    #[serde(rename = "s", default)]
    symbol: Option<String>,
    /// Trade ID
    #[serde(rename = "t", default)]
    trade_id: Option<u64>,
    /// Price
    #[serde(rename = "p")]
    price: String,
    /// Quantity
    #[serde(rename = "q")]
    quantity: String,
    /// Trade time (milliseconds)
    #[serde(rename = "T")]
    trade_time: i64,
    /// Is the buyer the market maker?
    #[serde(rename = "m")]
    is_buyer_maker: bool,
}

/// Binance `<symbol>@trade` stream
#[derive(Debug, Clone)]
pub struct BinanceFeed {
    symbol: String,
}

impl BinanceFeed {
    /// Create a new Binance feed for the given symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().to_lowercase(),
        }
    }

    /// Lowercase stream symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Build the WebSocket URL for the trade stream
    pub fn ws_url(&self) -> String {
        format!("{}/{}@trade", BINANCE_WS_URL, self.symbol)
    }

    /// Decode one text frame into a JSON object
    pub fn decode_frame(text: &str) -> Result<Value, FeedError> {
        let value: Value = serde_json::from_str(text).map_err(FeedError::Protocol)?;
        if !value.is_object() {
            return Err(FeedError::Protocol(serde::de::Error::custom(
                "expected a JSON object",
            )));
        }
        Ok(value)
    }

    /// Extract a trade from a decoded frame
    pub fn parse_trade(value: &Value) -> Result<TradeEvent, FeedError> {
        let trade = BinanceTradeMessage::deserialize(value)
            .map_err(|e| FeedError::Malformed(e.to_string()))?;

        if let Some(event_type) = trade.event_type.as_deref() {
            if event_type != "trade" {
                return Err(FeedError::Malformed(format!(
                    "unexpected event type `{}`",
                    event_type
                )));
            }
        }

        let price = parse_decimal("p", &trade.price)?;
        let quantity = parse_decimal("q", &trade.quantity)?;

        Ok(TradeEvent {
            symbol: trade.symbol.unwrap_or_default(),
            trade_id: trade.trade_id,
            price,
            quantity,
            trade_time_ms: trade.trade_time,
            is_buyer_maker: trade.is_buyer_maker,
        })
    }
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, FeedError> {
    Decimal::from_str(raw)
        .map_err(|e| FeedError::Malformed(format!("field `{}` = {:?}: {}", field, raw, e)))
}
