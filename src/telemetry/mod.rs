//! Telemetry module
//!
//! Logging and metrics

mod logging;
mod metrics;

pub use self::metrics::{
    install_exporter, record_dropped, record_reconnect, record_trade, DropKind,
};
pub use logging::init_logging;

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        install_exporter(port)?;
    }

    Ok(())
}
