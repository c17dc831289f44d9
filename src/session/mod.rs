//! Feed session
//!
//! Drives one subscription through `idle → connecting → open → closing →
//! closed`, handing every decoded frame to a [`TradeHandler`] on a single
//! stream of control.

mod state;
mod subscriber;

pub use state::{CloseReason, Session, SessionState, SessionSummary};
pub use subscriber::{drive, FeedSubscriber};

use crate::data::RecordError;
use serde_json::Value;

/// What the session should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep receiving
    Continue,
    /// Target reached, close the connection
    Complete,
}

/// Consumer of decoded trade frames
pub trait TradeHandler {
    /// Handle one decoded JSON object
    fn on_event(&mut self, raw: &Value) -> Result<Flow, RecordError>;

    /// Events accepted so far
    fn count(&self) -> u64;

    /// Target count (0 = unbounded)
    fn target(&self) -> u64 {
        0
    }
}
