//! One poll tick's observation of both teams

use super::Score;
use crate::crcon::{LiveStats, PublicInfo, TeamClassifier};
use crate::stats::{ExportField, MetricKey, NumericKind, Side, StatsError, TeamStatSet};
use serde::Serialize;
use serde_json::Value;

/// Final match outcome, stamped onto every snapshot once the match ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotOutcome {
    pub was_steamroll: bool,
    pub final_score: Score,
    pub final_duration_secs: i64,
}

/// Both team stat sets plus shared fields for one poll tick
#[derive(Debug, Clone)]
pub struct MatchSnapshot {
    pub allies: TeamStatSet,
    pub axis: TeamStatSet,
    pub time_remaining_secs: f64,
    pub total_players: u32,
    outcome: Option<SnapshotOutcome>,
}

impl MatchSnapshot {
    /// Empty snapshot with `capacity` slots per series
    pub fn new(capacity: usize) -> Self {
        Self {
            allies: TeamStatSet::new(Side::Allies, capacity),
            axis: TeamStatSet::new(Side::Axis, capacity),
            time_remaining_secs: 0.0,
            total_players: 0,
            outcome: None,
        }
    }

    /// Merge public info and live player stats into a snapshot
    ///
    /// Players the classifier cannot place are skipped, as are fields that are
    /// not registered metrics. Any failure discards the whole snapshot.
    pub fn build(
        live: &LiveStats,
        public: &PublicInfo,
        classifier: &dyn TeamClassifier,
        capacity: usize,
    ) -> Result<Self, StatsError> {
        let mut snapshot = Self::new(capacity);
        snapshot.apply_public_info(public);

        for player in &live.stats {
            let side = classifier.classify(player);
            let Some(team) = snapshot.team_mut(side) else {
                continue;
            };

            for (field, value) in player {
                let Some(key) = MetricKey::from_rcon_name(field) else {
                    continue;
                };
                match value {
                    Value::Number(n) => {
                        let value = n.as_f64().ok_or_else(|| malformed(key, value))?;
                        team.add(key, value)?;
                    }
                    Value::Null => {}
                    other => return Err(malformed(key, other)),
                }
            }
        }

        Ok(snapshot)
    }

    fn apply_public_info(&mut self, public: &PublicInfo) {
        self.time_remaining_secs = public.time_remaining;
        self.total_players = public.player_count;

        self.axis.time_remaining_secs = public.time_remaining;
        self.allies.time_remaining_secs = public.time_remaining;
        self.axis.score = public.score.axis;
        self.allies.score = public.score.allied;
        self.axis.player_count = public.player_count_by_team.axis;
        self.allies.player_count = public.player_count_by_team.allied;
    }

    pub fn team(&self, side: Side) -> Option<&TeamStatSet> {
        match side {
            Side::Axis => Some(&self.axis),
            Side::Allies => Some(&self.allies),
            Side::Unknown => None,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> Option<&mut TeamStatSet> {
        match side {
            Side::Axis => Some(&mut self.axis),
            Side::Allies => Some(&mut self.allies),
            Side::Unknown => None,
        }
    }

    pub fn score(&self) -> Score {
        Score::new(self.axis.score, self.allies.score)
    }

    pub fn outcome(&self) -> Option<&SnapshotOutcome> {
        self.outcome.as_ref()
    }

    pub fn was_steamroll(&self) -> Option<bool> {
        self.outcome.map(|o| o.was_steamroll)
    }

    pub(crate) fn stamp(&mut self, outcome: SnapshotOutcome) {
        self.outcome = Some(outcome);
    }

    /// Column names for [`MatchSnapshot::export_row`]
    pub fn export_header() -> Vec<String> {
        let mut header = vec!["time_remaining".to_string()];
        header.extend(TeamStatSet::export_header(Side::Allies));
        header.extend(TeamStatSet::export_header(Side::Axis));
        header
    }

    /// Time remaining, then allies, then axis
    pub fn export_row(&self) -> Vec<ExportField> {
        let mut row = vec![ExportField {
            name: "time_remaining".to_string(),
            value: self.time_remaining_secs,
            kind: NumericKind::Float,
        }];
        row.extend(self.allies.export_row());
        row.extend(self.axis.export_row());
        row
    }
}

fn malformed(key: MetricKey, value: &Value) -> StatsError {
    StatsError::MalformedValue {
        metric: key.to_string(),
        value: value.to_string(),
    }
}
