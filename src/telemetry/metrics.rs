//! Prometheus metrics

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

/// Why an inbound frame produced no row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    /// Frame was not a JSON object
    Protocol,
    /// Object was not a valid trade
    Malformed,
    /// Row could not be written
    Store,
}

impl DropKind {
    fn label(self) -> &'static str {
        match self {
            DropKind::Protocol => "protocol",
            DropKind::Malformed => "malformed",
            DropKind::Store => "store",
        }
    }
}

/// Serve `/metrics` on the given port. Must be called inside the runtime.
pub fn install_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;
    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}

/// A row was appended; `session_count` is the running session total
pub fn record_trade(session_count: u64) {
    counter!("tradetape_trades_recorded_total").increment(1);
    gauge!("tradetape_session_trades").set(session_count as f64);
}

/// A frame was dropped
pub fn record_dropped(kind: DropKind) {
    counter!("tradetape_frames_dropped_total", "kind" => kind.label()).increment(1);
}

/// The transport is reconnecting
pub fn record_reconnect() {
    counter!("tradetape_reconnects_total").increment(1);
}
