//! CRCON payload types

use crate::game::Score;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the CRCON API client
#[derive(Debug, Error)]
pub enum CrconError {
    /// HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Request never produced a response
    #[error("Transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    /// Envelope carried `failed: true` or no result
    #[error("Server reported failure for {url}")]
    Failed { url: String },
    /// Body did not match the expected shape
    #[error("Malformed response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Every CRCON response is wrapped in this envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub result: Option<T>,
    #[serde(default)]
    pub failed: bool,
}

impl<T> Envelope<T> {
    /// Unwrap the result, treating `failed` or a missing result as an error
    pub fn into_result(self, url: &str) -> Result<T, CrconError> {
        match self.result {
            Some(result) if !self.failed => Ok(result),
            _ => Err(CrconError::Failed {
                url: url.to_string(),
            }),
        }
    }
}

/// Map identity as reported by CRCON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRef {
    pub id: String,
    #[serde(default)]
    pub pretty_name: Option<String>,
    #[serde(default)]
    pub game_mode: Option<String>,
}

/// The map currently being played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentMap {
    pub map: MapRef,
    /// Start time, epoch seconds
    pub start: f64,
}

impl CurrentMap {
    pub fn start_secs(&self) -> i64 {
        self.start as i64
    }
}

/// Player counts per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCounts {
    pub axis: u32,
    pub allied: u32,
}

/// Result of `get_public_info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicInfo {
    pub current_map: CurrentMap,
    pub time_remaining: f64,
    pub score: Score,
    pub player_count: u32,
    pub player_count_by_team: TeamCounts,
}

/// Raw per-player stats record; fields vary between CRCON versions
pub type PlayerRecord = serde_json::Map<String, serde_json::Value>;

/// Result of `get_live_game_stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveStats {
    pub stats: Vec<PlayerRecord>,
}

/// One finished (or running) game from `get_scoreboard_maps`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricMap {
    pub id: i64,
    /// `YYYY-MM-DDTHH:MM:SS`, UTC
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    /// Final score; null while the game is still running
    #[serde(default)]
    pub result: Option<Score>,
    pub map: MapRef,
}

/// Result of `get_scoreboard_maps`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardMaps {
    pub maps: Vec<HistoricMap>,
}
