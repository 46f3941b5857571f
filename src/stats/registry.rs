//! Fixed registry of tracked combat metrics
//!
//! Registry order defines the export column layout, so entries must never be
//! reordered once data has been written.

use super::series::AggregateFlags;
use super::StatsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A per-player combat metric reported by the live stats endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    Combat,
    Offense,
    Defense,
    Support,
    Kills,
    Deaths,
    Teamkills,
    #[serde(rename = "teamkills_streak")]
    TeamkillStreak,
    KillsPerMinute,
    DeathsPerMinute,
    KillDeathRatio,
    DeathsWithoutKillStreak,
    #[serde(rename = "longest_life_secs")]
    LongestLife,
    #[serde(rename = "shortest_life_secs")]
    ShortestLife,
}

/// Static description of a registered metric
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub key: MetricKey,
    /// Display label
    pub name: &'static str,
    pub short_name: &'static str,
    /// Aggregates computed for this metric
    pub aggregates: AggregateFlags,
}

const fn spec(key: MetricKey, name: &'static str, short_name: &'static str) -> MetricSpec {
    MetricSpec {
        key,
        name,
        short_name,
        aggregates: AggregateFlags::ALL,
    }
}

/// All tracked metrics, in export order
pub static REGISTRY: [MetricSpec; 14] = [
    spec(MetricKey::Combat, "Combat", "Combat"),
    spec(MetricKey::Offense, "Offense", "Offense"),
    spec(MetricKey::Defense, "Defense", "Defense"),
    spec(MetricKey::Support, "Support", "Support"),
    spec(MetricKey::Kills, "Kills", "Kills"),
    spec(MetricKey::Deaths, "Deaths", "Deaths"),
    spec(MetricKey::Teamkills, "Teamkills", "Teamkills"),
    spec(MetricKey::TeamkillStreak, "Teamkill Streak", "Teamkill Streak"),
    spec(MetricKey::KillsPerMinute, "Kills Per Minute", "KPM"),
    spec(MetricKey::DeathsPerMinute, "Deaths Per Minute", "DPM"),
    spec(MetricKey::KillDeathRatio, "Kill Death Ratio", "KD"),
    spec(
        MetricKey::DeathsWithoutKillStreak,
        "Deaths w/o Kill Streak",
        "Deaths w/o Kill Streak",
    ),
    spec(MetricKey::LongestLife, "Longest Life", "Longest Life"),
    spec(MetricKey::ShortestLife, "Shortest Life", "Shortest Life"),
];

impl MetricKey {
    /// Field name used by the live stats endpoint
    pub fn rcon_name(&self) -> &'static str {
        match self {
            MetricKey::Combat => "combat",
            MetricKey::Offense => "offense",
            MetricKey::Defense => "defense",
            MetricKey::Support => "support",
            MetricKey::Kills => "kills",
            MetricKey::Deaths => "deaths",
            MetricKey::Teamkills => "teamkills",
            MetricKey::TeamkillStreak => "teamkills_streak",
            MetricKey::KillsPerMinute => "kills_per_minute",
            MetricKey::DeathsPerMinute => "deaths_per_minute",
            MetricKey::KillDeathRatio => "kill_death_ratio",
            MetricKey::DeathsWithoutKillStreak => "deaths_without_kill_streak",
            MetricKey::LongestLife => "longest_life_secs",
            MetricKey::ShortestLife => "shortest_life_secs",
        }
    }

    /// Look up a key by its endpoint field name
    pub fn from_rcon_name(name: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .map(|s| s.key)
            .find(|k| k.rcon_name() == name)
    }

    /// Position of this metric in the registry
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Registry entry for this metric
    pub fn spec(&self) -> &'static MetricSpec {
        &REGISTRY[self.index()]
    }
}

impl FromStr for MetricKey {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_rcon_name(s).ok_or_else(|| StatsError::UnknownMetric(s.to_string()))
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rcon_name())
    }
}
