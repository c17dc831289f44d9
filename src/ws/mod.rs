//! WebSocket client library
//!
//! Provides a WebSocket client with keepalive pings, an idempotent close
//! handle and optional bounded reconnection with exponential backoff.

mod client;
mod types;

#[cfg(test)]
pub(crate) mod test_server;

pub use client::WsClient;
pub use types::{WsConfig, WsConnection, WsError, WsHandle, WsMessage};
