//! Match lifecycle module
//!
//! Snapshots of both teams per poll tick, the match state machine and the
//! steamroll classification of a finished match.

mod lifecycle;
mod outcome;
mod snapshot;
mod types;

pub use lifecycle::{LabelRow, Match, MatchTable};
pub use outcome::{
    evaluate_outcome, Outcome, SteamrollReason, DEFAULT_STEAMROLL_THRESHOLD_MINUTES, WARFARE_MODE,
};
pub use snapshot::{MatchSnapshot, SnapshotOutcome};
pub use types::{parse_timestamp, GameResult, MatchError, RCON_TIME_FORMAT};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchState {
    /// No players on the server
    Empty,
    /// Too few players for a real game
    Seeding,
    /// Tracked but not yet observed in play
    Warmup,
    Playing,
    GameOver,
}

impl MatchState {
    /// States the poller may report before play starts
    pub fn is_pre_play(&self) -> bool {
        matches!(
            self,
            MatchState::Empty | MatchState::Seeding | MatchState::Warmup
        )
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchState::Empty => "EMPTY",
            MatchState::Seeding => "SEEDING",
            MatchState::Warmup => "WARMUP",
            MatchState::Playing => "PLAYING",
            MatchState::GameOver => "GAMEOVER",
        };
        f.write_str(name)
    }
}

/// Score per side, in captured sectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub axis: u32,
    pub allied: u32,
}

impl Score {
    pub fn new(axis: u32, allied: u32) -> Self {
        Self { axis, allied }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ax: {} Al: {}", self.axis, self.allied)
    }
}
