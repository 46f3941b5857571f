//! hll-steamroll: match poller and steamroll classifier for Hell Let Loose
//!
//! This library provides the core components for:
//! - Polling a CRCON server for public info and live player stats
//! - Per-team metric series with cached aggregates
//! - Match lifecycle from warmup to game over
//! - Steamroll classification from the scoreboard history
//! - Feature/label export to CSV or Parquet
//! - Logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod crcon;
pub mod data;
pub mod game;
pub mod stats;
pub mod telemetry;
pub mod watch;
