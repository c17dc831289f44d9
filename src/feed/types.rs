//! Trade feed types

use rust_decimal::Decimal;
use thiserror::Error;

/// A single executed trade as reported by the exchange
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEvent {
    /// Trading symbol (e.g., "BTCUSDT"), empty when the frame omits it
    pub symbol: String,
    /// Exchange trade id, if present
    pub trade_id: Option<u64>,
    /// Trade price
    pub price: Decimal,
    /// Trade quantity
    pub quantity: Decimal,
    /// Exchange trade time (milliseconds since epoch)
    pub trade_time_ms: i64,
    /// True if the buyer was the resting order
    pub is_buyer_maker: bool,
}

/// Side that crossed the spread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggressor {
    Buyer,
    Seller,
}

impl Aggressor {
    /// A resting buyer means the seller took liquidity
    pub fn from_buyer_maker(is_buyer_maker: bool) -> Self {
        if is_buyer_maker {
            Aggressor::Seller
        } else {
            Aggressor::Buyer
        }
    }
}

impl TradeEvent {
    /// The taker side
    pub fn aggressor(&self) -> Aggressor {
        Aggressor::from_buyer_maker(self.is_buyer_maker)
    }
}

/// Errors decoding a feed frame
#[derive(Debug, Error)]
pub enum FeedError {
    /// Frame is not a JSON object
    #[error("Protocol error: {0}")]
    Protocol(#[source] serde_json::Error),
    /// JSON object lacks a required field or has one of the wrong shape
    #[error("Malformed event: {0}")]
    Malformed(String),
}
