//! Steamroll classification

use super::Score;
use crate::stats::Side;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_STEAMROLL_THRESHOLD_MINUTES: i64 = 30;

/// The only game mode eligible for a steamroll
pub const WARFARE_MODE: &str = "warfare";

/// Why a match was or was not classified as a steamroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SteamrollReason {
    OffensiveMode,
    DurationExceeded,
    ScoresTied,
    UnderThreshold,
}

impl fmt::Display for SteamrollReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SteamrollReason::OffensiveMode => "offensive game mode excluded.",
            SteamrollReason::DurationExceeded => "duration exceeded threshold.",
            SteamrollReason::ScoresTied => "scores tied.",
            SteamrollReason::UnderThreshold => "ended under threshold in warfare mode.",
        };
        f.write_str(reason)
    }
}

/// Final classification of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Side,
    pub loser: Side,
    pub steamroll: bool,
    pub reason: SteamrollReason,
}

/// Classify a finished match
///
/// Winner is the side with the strictly higher score; a tie has no winner.
/// Rules apply in order: a non-warfare mode is never a steamroll, then a game
/// lasting `threshold` or longer, then a tied score ("scores tied."). Any
/// other warfare game is a steamroll.
pub fn evaluate_outcome(
    game_mode: &str,
    duration: Duration,
    score: Score,
    threshold: Duration,
) -> Outcome {
    let (winner, loser) = if score.axis > score.allied {
        (Side::Axis, Side::Allies)
    } else if score.allied > score.axis {
        (Side::Allies, Side::Axis)
    } else {
        (Side::Unknown, Side::Unknown)
    };

    let (steamroll, reason) = if !game_mode.eq_ignore_ascii_case(WARFARE_MODE) {
        (false, SteamrollReason::OffensiveMode)
    } else if duration >= threshold {
        (false, SteamrollReason::DurationExceeded)
    } else if winner == Side::Unknown {
        (false, SteamrollReason::ScoresTied)
    } else {
        (true, SteamrollReason::UnderThreshold)
    };

    Outcome {
        winner,
        loser,
        steamroll,
        reason,
    }
}
