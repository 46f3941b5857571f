//! CRCON server interface
//!
//! Fetches public match info, live player stats and the scoreboard history
//! from a Hell Let Loose CRCON instance.

mod client;
mod team;
mod types;

pub use client::{CrconClient, CrconConfig};
pub use team::{FactionClassifier, TeamClassifier};
pub use types::{
    CrconError, CurrentMap, Envelope, HistoricMap, LiveStats, MapRef, PlayerRecord, PublicInfo,
    ScoreboardMaps, TeamCounts,
};

use crate::game::parse_timestamp;
use async_trait::async_trait;
use chrono::DateTime;

/// Source of match observations
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Current map, score and player counts
    async fn public_info(&self) -> Result<PublicInfo, CrconError>;
    /// Per-player stats for the running game
    async fn live_stats(&self) -> Result<LiveStats, CrconError>;
    /// Recent games, newest first
    async fn scoreboard_maps(&self) -> Result<ScoreboardMaps, CrconError>;

    /// Find the history entry for a game by map id and start time
    async fn find_game(
        &self,
        map_id: &str,
        start_time_s: i64,
        tolerance_secs: i64,
    ) -> Result<Option<HistoricMap>, CrconError> {
        let history = self.scoreboard_maps().await?;
        Ok(find_in_history(history.maps, map_id, start_time_s, tolerance_secs))
    }
}

/// Pick the entry whose map id matches and whose start is within tolerance
pub fn find_in_history(
    maps: Vec<HistoricMap>,
    map_id: &str,
    start_time_s: i64,
    tolerance_secs: i64,
) -> Option<HistoricMap> {
    let start = DateTime::from_timestamp(start_time_s, 0)?.naive_utc();

    maps.into_iter().find(|entry| {
        if entry.map.id != map_id {
            return false;
        }
        match parse_timestamp(&entry.start) {
            Ok(entry_start) => (entry_start - start).num_seconds().abs() <= tolerance_secs,
            Err(e) => {
                tracing::debug!(error = %e, id = entry.id, "Skipping history entry");
                false
            }
        }
    })
}
