//! WebSocket types and configuration

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// WebSocket client configuration
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// WebSocket URL to connect to
    pub url: String,
    /// Reconnection attempts after a dropped connection (0 = never reconnect)
    pub max_reconnect_attempts: u32,
    /// Initial delay before first reconnection attempt
    pub initial_reconnect_delay: Duration,
    /// Maximum delay between reconnection attempts
    pub max_reconnect_delay: Duration,
    /// Interval for sending ping frames (zero disables keepalive)
    pub ping_interval: Duration,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_reconnect_attempts: 0,
            initial_reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(60),
            ping_interval: Duration::from_secs(60),
        }
    }
}

impl WsConfig {
    /// Create a new config with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set maximum reconnection attempts
    pub fn max_reconnects(mut self, n: u32) -> Self {
        self.max_reconnect_attempts = n;
        self
    }

    /// Set initial reconnection delay
    pub fn initial_delay(mut self, d: Duration) -> Self {
        self.initial_reconnect_delay = d;
        self
    }

    /// Set maximum reconnection delay
    pub fn max_delay(mut self, d: Duration) -> Self {
        self.max_reconnect_delay = d;
        self
    }

    /// Set ping interval
    pub fn ping_interval(mut self, d: Duration) -> Self {
        self.ping_interval = d;
        self
    }
}

/// Messages delivered from the transport task to the session loop
#[derive(Debug, Clone)]
pub enum WsMessage {
    /// Text message
    Text(String),
    /// Binary message
    Binary(Vec<u8>),
    /// Connection established
    Connected,
    /// Transport or handshake failure
    Error(WsError),
    /// Connection closed for good; always the last message
    Disconnected,
    /// Reconnecting after failure
    Reconnecting { attempt: u32 },
}

/// WebSocket errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WsError {
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Maximum reconnection attempts exceeded
    #[error("Maximum reconnection attempts exceeded")]
    MaxReconnectsExceeded,
    /// Previous keepalive ping was never answered
    #[error("Pong timeout")]
    PongTimeout,
    /// Send failed
    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Cloneable handle used to ask the transport to close.
///
/// Closing is idempotent; the transport observes the flag on its next poll and
/// sends a close frame before reporting [`WsMessage::Disconnected`].
#[derive(Debug, Clone)]
pub struct WsHandle {
    close_tx: Arc<watch::Sender<bool>>,
}

impl WsHandle {
    /// Create a handle and the receiver the transport listens on
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (close_tx, close_rx) = watch::channel(false);
        (
            Self {
                close_tx: Arc::new(close_tx),
            },
            close_rx,
        )
    }

    /// Request the connection to close
    pub fn close(&self) {
        self.close_tx.send_replace(true);
    }

    /// Whether a close has been requested
    pub fn is_closed(&self) -> bool {
        *self.close_tx.borrow()
    }
}

/// A live connection: inbound messages plus the handle that closes it
#[derive(Debug)]
pub struct WsConnection {
    pub messages: mpsc::Receiver<WsMessage>,
    pub handle: WsHandle,
}

impl WsConnection {
    /// Assemble a connection from an existing message channel
    pub fn from_parts(messages: mpsc::Receiver<WsMessage>, handle: WsHandle) -> Self {
        Self { messages, handle }
    }
}
