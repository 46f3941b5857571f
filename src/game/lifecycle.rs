//! Match state machine
//!
//! A match moves forward only: EMPTY/SEEDING/WARMUP -> PLAYING -> GAMEOVER.
//! Once GAMEOVER, snapshots and outcome are frozen.

use super::outcome::{evaluate_outcome, Outcome, SteamrollReason};
use super::snapshot::{MatchSnapshot, SnapshotOutcome};
use super::types::{parse_timestamp, GameResult, MatchError};
use super::{MatchState, Score, DEFAULT_STEAMROLL_THRESHOLD_MINUTES};
use crate::stats::Side;
use chrono::{Duration, NaiveDateTime};
use uuid::Uuid;

/// Per-match label record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelRow {
    pub axis_score: u32,
    pub allied_score: u32,
    pub steamroll: bool,
}

impl LabelRow {
    pub fn header() -> Vec<String> {
        ["axis_score", "allied_score", "steamroll"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn values(&self) -> [f64; 3] {
        [
            f64::from(self.axis_score),
            f64::from(self.allied_score),
            if self.steamroll { 1.0 } else { 0.0 },
        ]
    }
}

/// Feature rows (one per snapshot) and the match label
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub label: LabelRow,
}

/// One game on one server, from first sighting to final result
#[derive(Debug, Clone)]
pub struct Match {
    id: Uuid,
    server: String,
    map_id: String,
    start_time_s: i64,
    state: MatchState,
    snapshots: Vec<MatchSnapshot>,
    score: Score,
    time_remaining_secs: f64,
    steamroll_threshold: Duration,
    game_mode: Option<String>,
    started_at: Option<NaiveDateTime>,
    ended_at: Option<NaiveDateTime>,
    duration: Option<Duration>,
    outcome: Option<Outcome>,
}

impl Match {
    /// Start tracking a game first seen as `(map_id, start_time_s)`
    pub fn new(server: impl Into<String>, map_id: impl Into<String>, start_time_s: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            server: server.into(),
            map_id: map_id.into(),
            start_time_s,
            state: MatchState::Warmup,
            snapshots: Vec::new(),
            score: Score::default(),
            time_remaining_secs: 0.0,
            steamroll_threshold: Duration::minutes(DEFAULT_STEAMROLL_THRESHOLD_MINUTES),
            game_mode: None,
            started_at: None,
            ended_at: None,
            duration: None,
            outcome: None,
        }
    }

    /// Override the steamroll duration threshold
    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        self.steamroll_threshold = threshold;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn map_id(&self) -> &str {
        &self.map_id
    }

    pub fn start_time_s(&self) -> i64 {
        self.start_time_s
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn snapshots(&self) -> &[MatchSnapshot] {
        &self.snapshots
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn time_remaining_secs(&self) -> f64 {
        self.time_remaining_secs
    }

    pub fn game_mode(&self) -> Option<&str> {
        self.game_mode.as_deref()
    }

    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<NaiveDateTime> {
        self.ended_at
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn winner(&self) -> Side {
        self.outcome.map_or(Side::Unknown, |o| o.winner)
    }

    pub fn loser(&self) -> Side {
        self.outcome.map_or(Side::Unknown, |o| o.loser)
    }

    pub fn steamroll(&self) -> bool {
        self.outcome.is_some_and(|o| o.steamroll)
    }

    pub fn steamroll_reason(&self) -> Option<SteamrollReason> {
        self.outcome.map(|o| o.reason)
    }

    /// Whether this match is the game identified by `(map_id, start_time_s)`
    pub fn is_same_game(&self, map_id: &str, start_time_s: i64) -> bool {
        self.map_id == map_id && self.start_time_s == start_time_s
    }

    /// Record a pre-play state observed by the poller
    pub fn report_state(&mut self, state: MatchState) -> Result<(), MatchError> {
        if !self.state.is_pre_play() || !state.is_pre_play() {
            return Err(MatchError::InvalidTransition {
                from: self.state,
                action: "report pre-play state",
            });
        }
        if self.state != state {
            tracing::debug!(
                map = %self.map_id,
                from = %self.state,
                to = %state,
                "Match state changed"
            );
        }
        self.state = state;
        Ok(())
    }

    /// Append a snapshot, entering PLAYING on the first one
    pub fn add_snapshot(&mut self, snapshot: MatchSnapshot) -> Result<(), MatchError> {
        if self.state == MatchState::GameOver {
            return Err(MatchError::InvalidTransition {
                from: self.state,
                action: "add snapshot",
            });
        }
        if self.state != MatchState::Playing {
            tracing::info!(map = %self.map_id, from = %self.state, "Match is now playing");
            self.state = MatchState::Playing;
        }

        self.score = snapshot.score();
        self.time_remaining_secs = snapshot.time_remaining_secs;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Apply the authoritative result and classify the match
    ///
    /// Fails without touching the match if the result is not final, its
    /// timestamps do not parse, or it ends before it starts.
    pub fn process_result(&mut self, result: &GameResult) -> Result<&Outcome, MatchError> {
        if self.state == MatchState::GameOver {
            return Err(MatchError::InvalidTransition {
                from: self.state,
                action: "process result",
            });
        }

        let (Some(score), Some(end)) = (result.score, result.end.as_deref()) else {
            return Err(MatchError::IncompleteResult(result.id));
        };
        let started_at = parse_timestamp(&result.start)?;
        let ended_at = parse_timestamp(end)?;
        if ended_at < started_at {
            return Err(MatchError::NegativeDuration {
                id: result.id,
                start: started_at,
                end: ended_at,
            });
        }
        let duration = ended_at - started_at;

        let outcome =
            evaluate_outcome(&result.game_mode, duration, score, self.steamroll_threshold);

        self.started_at = Some(started_at);
        self.ended_at = Some(ended_at);
        self.duration = Some(duration);
        self.score = score;
        self.game_mode = Some(result.game_mode.clone());
        self.state = MatchState::GameOver;

        let stamp = SnapshotOutcome {
            was_steamroll: outcome.steamroll,
            final_score: score,
            final_duration_secs: duration.num_seconds(),
        };
        for snapshot in &mut self.snapshots {
            snapshot.stamp(stamp);
        }

        tracing::info!(
            map = %self.map_id,
            mode = %result.game_mode,
            duration_mins = duration.num_minutes(),
            score = %score,
            steamroll = outcome.steamroll,
            reason = %outcome.reason,
            "Match over"
        );

        Ok(&*self.outcome.insert(outcome))
    }

    /// Feature matrix plus label for a finished match
    pub fn to_table(&self) -> Result<MatchTable, MatchError> {
        let Some(outcome) = self.outcome.filter(|_| self.state == MatchState::GameOver) else {
            return Err(MatchError::InvalidTransition {
                from: self.state,
                action: "export",
            });
        };

        let rows = self
            .snapshots
            .iter()
            .map(|s| s.export_row().into_iter().map(|f| f.value).collect())
            .collect();

        Ok(MatchTable {
            header: MatchSnapshot::export_header(),
            rows,
            label: LabelRow {
                axis_score: self.score.axis,
                allied_score: self.score.allied,
                steamroll: outcome.steamroll,
            },
        })
    }
}
