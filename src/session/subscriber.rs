//! Feed subscriber: connects and runs the session loop

use super::state::{CloseReason, Session, SessionSummary};
use super::TradeHandler;
use crate::config::FeedConfig;
use crate::feed::BinanceFeed;
use crate::ws::{WsClient, WsConfig, WsConnection, WsError, WsMessage};
use std::future::Future;
use std::time::Duration;
use tracing::Instrument;

/// Single-instrument trade stream subscriber
pub struct FeedSubscriber {
    feed: BinanceFeed,
    ws_config: WsConfig,
}

impl FeedSubscriber {
    /// Create a subscriber for the configured symbol
    pub fn new(config: &FeedConfig) -> Self {
        let feed = BinanceFeed::new(&config.symbol);
        let ws_config = WsConfig::new(feed.ws_url())
            .max_reconnects(config.max_reconnects)
            .initial_delay(Duration::from_millis(config.reconnect_delay_ms))
            .max_delay(Duration::from_millis(config.max_reconnect_delay_ms))
            .ping_interval(Duration::from_secs(config.ping_interval_secs.max(1)));

        Self { feed, ws_config }
    }

    /// Stream URL
    pub fn url(&self) -> &str {
        &self.ws_config.url
    }

    /// Lowercase stream symbol
    pub fn symbol(&self) -> &str {
        self.feed.symbol()
    }

    /// Connect and run until the handler completes, `shutdown` resolves, the
    /// remote closes, or a fatal error occurs
    pub async fn run<H, F>(&self, handler: H, shutdown: F) -> SessionSummary
    where
        H: TradeHandler,
        F: Future<Output = ()>,
    {
        tracing::info!(symbol = %self.feed.symbol(), url = %self.ws_config.url, "Subscribing to trade stream");
        let connection = WsClient::new(self.ws_config.clone()).connect();
        drive(connection, handler, shutdown).await
    }
}

/// Run a session over an established connection.
///
/// Every message is handled on this task in arrival order. All exit paths
/// (target reached, interrupt, remote close, fatal error) end in a single
/// [`Session::finish`].
pub async fn drive<H, F>(mut connection: WsConnection, handler: H, shutdown: F) -> SessionSummary
where
    H: TradeHandler,
    F: Future<Output = ()>,
{
    let mut session = Session::new(handler);
    let span = tracing::info_span!("session", id = %session.id());

    async move {
        session.connecting();
        tokio::pin!(shutdown);
        let mut interrupted = false;

        loop {
            tokio::select! {
                msg = connection.messages.recv() => {
                    match msg {
                        Some(WsMessage::Connected) => session.opened(),
                        Some(WsMessage::Text(text)) => {
                            if session.on_frame(&text) {
                                connection.handle.close();
                            }
                        }
                        Some(WsMessage::Binary(data)) => {
                            tracing::debug!(len = data.len(), "Ignoring binary frame");
                        }
                        Some(WsMessage::Error(e)) => session.on_error(e),
                        Some(WsMessage::Reconnecting { attempt }) => session.reconnecting(attempt),
                        Some(WsMessage::Disconnected) => break,
                        None => {
                            session.on_error(WsError::ConnectionFailed(
                                "transport ended unexpectedly".to_string(),
                            ));
                            break;
                        }
                    }
                }

                _ = &mut shutdown, if !interrupted && !session.is_closing() => {
                    interrupted = true;
                    tracing::info!("Received shutdown signal");
                    if session.begin_close(CloseReason::Interrupted) {
                        connection.handle.close();
                    }
                }
            }
        }

        session.finish()
    }
    .instrument(span)
    .await
}
