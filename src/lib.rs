//! trade-tape: records a live exchange trade stream to an append-only CSV tape
//!
//! This library provides the core components for:
//! - WebSocket transport with keepalive and an idempotent close handle
//! - Binance `@trade` frame decoding
//! - A single-threaded feed session state machine
//! - Append-only CSV storage with a per-session record counter
//! - Tape statistics for the dashboard
//! - Logging and metrics

pub mod cli;
pub mod config;
pub mod data;
pub mod feed;
pub mod session;
pub mod stats;
pub mod telemetry;
pub mod ws;
