//! WebSocket client with keepalive, close handle and optional reconnection

use super::types::{WsConfig, WsConnection, WsError, WsHandle, WsMessage};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Timer period used when keepalive is disabled; the tick is never polled
const IDLE_PING_PERIOD: Duration = Duration::from_secs(3600);

/// WebSocket client for a single stream URL
pub struct WsClient {
    config: WsConfig,
}

impl WsClient {
    /// Create a new WebSocket client with the given configuration
    pub fn new(config: WsConfig) -> Self {
        Self { config }
    }

    /// Get the configured URL
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Connect and return the inbound message channel with its close handle
    ///
    /// This spawns a transport task that owns the socket, answers pings, sends
    /// keepalive pings and reconnects when configured to. The task reports
    /// status changes (Connected, Error, Reconnecting) in-band and always ends
    /// with exactly one Disconnected.
    pub fn connect(&self) -> WsConnection {
        let (tx, rx) = mpsc::channel(1024);
        let (handle, close_rx) = WsHandle::new();
        let config = self.config.clone();

        tokio::spawn(async move {
            if let Err(e) = Self::run_connection_loop(config, tx, close_rx).await {
                tracing::error!(error = %e, "WebSocket connection loop failed");
            }
        });

        WsConnection::from_parts(rx, handle)
    }

    /// Run the connection loop with bounded reconnection
    async fn run_connection_loop(
        config: WsConfig,
        tx: mpsc::Sender<WsMessage>,
        mut close_rx: watch::Receiver<bool>,
    ) -> Result<(), WsError> {
        let mut reconnect_attempts = 0;
        let mut reconnect_delay = config.initial_reconnect_delay;

        loop {
            match Self::connect_and_stream(&config, &tx, &mut close_rx).await {
                Ok(()) => {
                    tracing::info!("WebSocket connection closed cleanly");
                    let _ = tx.send(WsMessage::Disconnected).await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "WebSocket connection error");
                    let _ = tx.send(WsMessage::Error(e)).await;

                    if *close_rx.borrow() || tx.is_closed() {
                        let _ = tx.send(WsMessage::Disconnected).await;
                        return Ok(());
                    }

                    if reconnect_attempts >= config.max_reconnect_attempts {
                        let _ = tx.send(WsMessage::Disconnected).await;
                        if config.max_reconnect_attempts > 0 {
                            return Err(WsError::MaxReconnectsExceeded);
                        }
                        return Ok(());
                    }

                    reconnect_attempts += 1;
                    let _ = tx
                        .send(WsMessage::Reconnecting {
                            attempt: reconnect_attempts,
                        })
                        .await;

                    tokio::select! {
                        _ = sleep(reconnect_delay) => {}
                        _ = close_rx.changed() => {
                            let _ = tx.send(WsMessage::Disconnected).await;
                            return Ok(());
                        }
                    }
                    reconnect_delay = (reconnect_delay * 2).min(config.max_reconnect_delay);
                }
            }
        }
    }

    /// Connect to WebSocket and stream messages until closed
    async fn connect_and_stream(
        config: &WsConfig,
        tx: &mpsc::Sender<WsMessage>,
        close_rx: &mut watch::Receiver<bool>,
    ) -> Result<(), WsError> {
        if *close_rx.borrow() {
            return Ok(());
        }

        tracing::info!(url = %config.url, "Connecting to WebSocket");

        let (ws_stream, _response) = tokio::select! {
            result = connect_async(&config.url) => {
                result.map_err(|e| WsError::ConnectionFailed(e.to_string()))?
            }
            _ = close_rx.changed() => return Ok(()),
        };

        let (mut write, mut read) = ws_stream.split();

        tracing::info!("WebSocket connected");

        if tx.send(WsMessage::Connected).await.is_err() {
            return Ok(());
        }

        let keepalive = !config.ping_interval.is_zero();
        let period = if keepalive {
            config.ping_interval
        } else {
            IDLE_PING_PERIOD
        };
        let mut ping_interval = tokio::time::interval(period);
        ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately
        ping_interval.tick().await;

        let mut waiting_for_pong = false;

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if tx.send(WsMessage::Text(text)).await.is_err() {
                                tracing::debug!("Receiver dropped, closing connection");
                                return Ok(());
                            }
                        }
                        Some(Ok(Message::Binary(data))) => {
                            if tx.send(WsMessage::Binary(data)).await.is_err() {
                                tracing::debug!("Receiver dropped, closing connection");
                                return Ok(());
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await
                                .map_err(|e| WsError::SendFailed(e.to_string()))?;
                        }
                        Some(Ok(Message::Pong(_))) => {
                            waiting_for_pong = false;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            tracing::info!(frame = ?frame, "Received close frame");
                            return Ok(());
                        }
                        Some(Err(e)) => {
                            return Err(WsError::ConnectionFailed(e.to_string()));
                        }
                        None => {
                            return Err(WsError::ConnectionFailed("Stream ended unexpectedly".into()));
                        }
                        _ => {}
                    }
                }

                _ = close_rx.changed() => {
                    tracing::info!("Closing WebSocket");
                    if let Err(e) = write.send(Message::Close(None)).await {
                        tracing::debug!(error = %e, "Failed to send close frame");
                    }
                    return Ok(());
                }

                _ = ping_interval.tick(), if keepalive => {
                    if waiting_for_pong {
                        return Err(WsError::PongTimeout);
                    }
                    write.send(Message::Ping(Vec::new())).await
                        .map_err(|e| WsError::SendFailed(e.to_string()))?;
                    waiting_for_pong = true;
                }
            }
        }
    }
}
