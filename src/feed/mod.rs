//! Trade feed module
//!
//! Decodes Binance `@trade` frames into [`TradeEvent`]s

mod binance;
mod types;

pub use binance::BinanceFeed;
pub use types::{Aggressor, FeedError, TradeEvent};
