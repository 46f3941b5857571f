//! Team statistics module
//!
//! Per-team metric series accumulated from live player stats

mod registry;
mod series;
mod team;
mod types;

pub use registry::{MetricKey, MetricSpec, REGISTRY};
pub use series::{Aggregate, AggregateFlags, Aggregates, MetricSeries};
pub use team::{ExportField, NumericKind, TeamStatSet};
pub use types::StatsError;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of slots per series (one per player on a side)
pub const DEFAULT_SERIES_CAPACITY: usize = 70;

/// One of the two factions in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Axis,
    Allies,
    /// Team could not be determined
    Unknown,
}

impl Side {
    /// Column prefix and endpoint spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Axis => "axis",
            Side::Allies => "allies",
            Side::Unknown => "unknown",
        }
    }

    /// The opposing faction
    pub fn opponent(&self) -> Side {
        match self {
            Side::Axis => Side::Allies,
            Side::Allies => Side::Axis,
            Side::Unknown => Side::Unknown,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Side::Axis => "Axis",
            Side::Allies => "Allies",
            Side::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}
