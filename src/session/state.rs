//! Session state machine

use super::{Flow, TradeHandler};
use crate::feed::BinanceFeed;
use crate::telemetry::{self, DropKind};
use crate::ws::WsError;
use std::fmt;
use uuid::Uuid;

/// Connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Open,
    Closing,
    Closed,
}

impl SessionState {
    /// Allowed transitions. `Open → Connecting` only happens through a fresh
    /// connect when reconnection is enabled.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Connecting)
                | (Connecting, Open)
                | (Open, Connecting)
                | (Connecting, Closing)
                | (Open, Closing)
                | (Idle, Closed)
                | (Connecting, Closed)
                | (Open, Closed)
                | (Closing, Closed)
        )
    }
}

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// Handler reached its target count
    LimitReached,
    /// Operator interrupt
    Interrupted,
    /// Remote side closed the connection
    RemoteClosed,
    /// Connect, handshake or transport failure
    ConnectionFailed(String),
    /// Writing to the store failed
    StoreFailed(String),
}

impl CloseReason {
    /// Whether the session ended on an error
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CloseReason::ConnectionFailed(_) | CloseReason::StoreFailed(_)
        )
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::LimitReached => write!(f, "target reached"),
            CloseReason::Interrupted => write!(f, "stopped by user"),
            CloseReason::RemoteClosed => write!(f, "closed by remote"),
            CloseReason::ConnectionFailed(e) => write!(f, "connection error: {}", e),
            CloseReason::StoreFailed(e) => write!(f, "I/O error: {}", e),
        }
    }
}

/// Final state handed out exactly once when a session closes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: Uuid,
    /// Events accepted by the handler
    pub records: u64,
    /// Frames that were not JSON objects
    pub protocol_errors: u64,
    /// JSON objects that were not valid trades
    pub malformed_events: u64,
    pub reason: CloseReason,
}

/// One subscription's state plus its handler
pub struct Session<H> {
    id: Uuid,
    state: SessionState,
    handler: H,
    reason: Option<CloseReason>,
    last_error: Option<WsError>,
    opened: bool,
    protocol_errors: u64,
    malformed_events: u64,
}

impl<H: TradeHandler> Session<H> {
    pub fn new(handler: H) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            handler,
            reason: None,
            last_error: None,
            opened: false,
            protocol_errors: 0,
            malformed_events: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Closing or closed
    pub fn is_closing(&self) -> bool {
        matches!(self.state, SessionState::Closing | SessionState::Closed)
    }

    fn transition(&mut self, next: SessionState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::debug!(from = ?self.state, to = ?next, "Ignoring transition");
            return false;
        }
        tracing::debug!(from = ?self.state, to = ?next, "Session transition");
        self.state = next;
        true
    }

    /// Connect requested
    pub fn connecting(&mut self) {
        self.transition(SessionState::Connecting);
    }

    /// Transport is retrying after a failure
    pub fn reconnecting(&mut self, attempt: u32) {
        tracing::warn!(attempt, "Feed reconnecting...");
        telemetry::record_reconnect();
        self.transition(SessionState::Connecting);
    }

    /// Connection established
    pub fn opened(&mut self) {
        if !self.transition(SessionState::Open) {
            return;
        }
        self.opened = true;
        self.last_error = None;
        tracing::info!("Connected to trade stream");
        let target = self.handler.target();
        if target > 0 {
            tracing::info!(target, "Collecting {} trades", target);
        }
    }

    /// Transport or handshake failure
    pub fn on_error(&mut self, err: WsError) {
        tracing::error!(error = %err, count = self.handler.count(), "Connection error");
        self.last_error = Some(err);
    }

    /// Handle one text frame. Returns true when the connection has to close.
    pub fn on_frame(&mut self, text: &str) -> bool {
        if self.state != SessionState::Open {
            tracing::debug!(state = ?self.state, "Ignoring frame outside open state");
            return false;
        }

        let value = match BinanceFeed::decode_frame(text) {
            Ok(value) => value,
            Err(e) => {
                self.protocol_errors += 1;
                telemetry::record_dropped(DropKind::Protocol);
                tracing::warn!(
                    error = %e,
                    preview = %text.chars().take(100).collect::<String>(),
                    "Dropping frame"
                );
                return false;
            }
        };

        match self.handler.on_event(&value) {
            Ok(Flow::Continue) => false,
            Ok(Flow::Complete) => self.begin_close(CloseReason::LimitReached),
            Err(e) if e.is_fatal() => {
                telemetry::record_dropped(DropKind::Store);
                tracing::error!(
                    error = %e,
                    count = self.handler.count(),
                    "Store write failed, stopping capture"
                );
                self.begin_close(CloseReason::StoreFailed(e.to_string()))
            }
            Err(e) => {
                self.malformed_events += 1;
                telemetry::record_dropped(DropKind::Malformed);
                tracing::warn!(error = %e, "Dropping event");
                false
            }
        }
    }

    /// Move to closing. Only the first call wins; returns whether this call
    /// did the transition.
    pub fn begin_close(&mut self, reason: CloseReason) -> bool {
        if self.reason.is_some() || !self.transition(SessionState::Closing) {
            return false;
        }
        tracing::info!(reason = %reason, count = self.handler.count(), "Closing session");
        self.reason = Some(reason);
        true
    }

    /// Close the session and produce its summary
    pub fn finish(mut self) -> SessionSummary {
        self.transition(SessionState::Closed);

        let reason = match self.reason.take() {
            Some(reason) => reason,
            None => match self.last_error.take() {
                Some(e) => CloseReason::ConnectionFailed(e.to_string()),
                None if self.opened => CloseReason::RemoteClosed,
                None => CloseReason::ConnectionFailed("closed before opening".to_string()),
            },
        };

        let summary = SessionSummary {
            session_id: self.id,
            records: self.handler.count(),
            protocol_errors: self.protocol_errors,
            malformed_events: self.malformed_events,
            reason,
        };

        if summary.reason.is_fatal() {
            tracing::error!(
                records = summary.records,
                reason = %summary.reason,
                "Session closed"
            );
        } else {
            tracing::info!(
                records = summary.records,
                reason = %summary.reason,
                protocol_errors = summary.protocol_errors,
                malformed_events = summary.malformed_events,
                "Session closed"
            );
        }

        summary
    }
}
