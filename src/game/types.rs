//! Match error and result types

use super::{MatchState, Score};
use crate::crcon::HistoricMap;
use crate::stats::StatsError;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Timestamp format used by the scoreboard history
pub const RCON_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Match lifecycle errors
#[derive(Debug, Error)]
pub enum MatchError {
    /// Operation not allowed in the current state
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: MatchState,
        action: &'static str,
    },
    /// Snapshot could not be built
    #[error(transparent)]
    Stats(#[from] StatsError),
    /// Server timestamp did not parse
    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// Result has no final score or end time yet
    #[error("Result for game {0} is not final")]
    IncompleteResult(i64),
    /// Result ends before it starts
    #[error("Result for game {id} ends before it starts ({start} > {end})")]
    NegativeDuration {
        id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Parse a `YYYY-MM-DDTHH:MM:SS` server timestamp
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, MatchError> {
    NaiveDateTime::parse_from_str(value, RCON_TIME_FORMAT).map_err(|source| {
        MatchError::InvalidTimestamp {
            value: value.to_string(),
            source,
        }
    })
}

/// Authoritative result of a finished game
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub id: i64,
    pub map_id: String,
    pub map_name: Option<String>,
    pub game_mode: String,
    pub start: String,
    pub end: Option<String>,
    pub score: Option<Score>,
}

impl From<HistoricMap> for GameResult {
    fn from(entry: HistoricMap) -> Self {
        Self {
            id: entry.id,
            map_id: entry.map.id,
            map_name: entry.map.pretty_name,
            game_mode: entry.map.game_mode.unwrap_or_default(),
            start: entry.start,
            end: entry.end,
            score: entry.result,
        }
    }
}
