//! Scripted server and recording collaborators

use async_trait::async_trait;
use hll_steamroll::crcon::{
    CrconError, CurrentMap, HistoricMap, LiveStats, MapRef, MatchSource, PublicInfo,
    ScoreboardMaps, TeamCounts,
};
use hll_steamroll::data::{ExportError, ExportSummary, Exporter};
use hll_steamroll::game::{Match, Score};
use hll_steamroll::watch::{Notifier, Poller, PollerConfig};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// 2025-06-08T16:22:48Z
pub const FOY_START: i64 = 1_749_399_768;
pub const FOY_START_TS: &str = "2025-06-08T16:22:48";
pub const CARENTAN_START: i64 = FOY_START + 5_400;

#[derive(Default)]
struct Script {
    public: VecDeque<Option<PublicInfo>>,
    live: VecDeque<Option<LiveStats>>,
    history: Vec<HistoricMap>,
    history_down: bool,
    live_calls: usize,
}

/// `MatchSource` replaying queued responses; `None` entries fail
#[derive(Clone, Default)]
pub struct FakeServer {
    script: Arc<Mutex<Script>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_public(&self, info: PublicInfo) {
        self.script.lock().unwrap().public.push_back(Some(info));
    }

    pub fn push_public_failure(&self) {
        self.script.lock().unwrap().public.push_back(None);
    }

    pub fn push_live(&self, stats: Value) {
        let stats = serde_json::from_value(json!({ "stats": stats })).unwrap();
        self.script.lock().unwrap().live.push_back(Some(stats));
    }

    pub fn push_live_failure(&self) {
        self.script.lock().unwrap().live.push_back(None);
    }

    /// Queue one playing tick: public info plus live stats
    pub fn push_playing(&self, info: PublicInfo, stats: Value) {
        self.push_public(info);
        self.push_live(stats);
    }

    pub fn set_history(&self, history: Vec<HistoricMap>) {
        self.script.lock().unwrap().history = history;
    }

    /// Make every history lookup fail until cleared
    pub fn set_history_down(&self, down: bool) {
        self.script.lock().unwrap().history_down = down;
    }

    pub fn live_calls(&self) -> usize {
        self.script.lock().unwrap().live_calls
    }
}

fn failure(endpoint: &str) -> CrconError {
    CrconError::Status {
        url: format!("http://fake/{}", endpoint),
        status: 502,
    }
}

#[async_trait]
impl MatchSource for FakeServer {
    async fn public_info(&self) -> Result<PublicInfo, CrconError> {
        let next = self.script.lock().unwrap().public.pop_front();
        next.flatten().ok_or_else(|| failure("api/get_public_info"))
    }

    async fn live_stats(&self) -> Result<LiveStats, CrconError> {
        let mut script = self.script.lock().unwrap();
        script.live_calls += 1;
        script
            .live
            .pop_front()
            .flatten()
            .ok_or_else(|| failure("api/get_live_game_stats"))
    }

    async fn scoreboard_maps(&self) -> Result<ScoreboardMaps, CrconError> {
        let script = self.script.lock().unwrap();
        if script.history_down {
            return Err(CrconError::Status {
                url: "http://fake/api/get_scoreboard_maps".to_string(),
                status: 503,
            });
        }
        Ok(ScoreboardMaps {
            maps: script.history.clone(),
        })
    }
}

/// Public info for a map with `per_side` players on each team
pub fn public_info(
    map_id: &str,
    start: i64,
    per_side: u32,
    score: Score,
    time_remaining: f64,
) -> PublicInfo {
    PublicInfo {
        current_map: CurrentMap {
            map: MapRef {
                id: map_id.to_string(),
                pretty_name: None,
                game_mode: None,
            },
            start: start as f64,
        },
        time_remaining,
        score,
        player_count: per_side * 2,
        player_count_by_team: TeamCounts {
            axis: per_side,
            allied: per_side,
        },
    }
}

/// A handful of players on both sides
pub fn players() -> Value {
    json!([
        {"player": "a", "team": "axis", "kills": 12, "deaths": 3, "combat": 80,
         "kills_per_minute": 0.8},
        {"player": "b", "team": "axis", "kills": 4, "deaths": 6, "combat": 30,
         "kills_per_minute": 0.2},
        {"player": "c", "team": "allies", "kills": 2, "deaths": 9, "combat": 15,
         "kills_per_minute": 0.1},
        {"player": "d", "weapons": {"M1 GARAND": 5}, "kills": 5, "deaths": 4}
    ])
}

/// Finished history entry
pub fn history_entry(
    id: i64,
    map_id: &str,
    start: &str,
    end: Option<&str>,
    result: Option<Score>,
) -> HistoricMap {
    HistoricMap {
        id,
        start: start.to_string(),
        end: end.map(String::from),
        result,
        map: MapRef {
            id: map_id.to_string(),
            pretty_name: None,
            game_mode: Some("warfare".to_string()),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Tick(String, usize),
    Finished(String, bool),
}

/// Notifier collecting events
#[derive(Clone, Default)]
pub struct Recorder {
    pub events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for Recorder {
    fn tick_recorded(&self, game: &Match) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Tick(game.map_id().to_string(), game.snapshots().len()));
    }

    fn match_finished(&self, game: &Match) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Finished(game.map_id().to_string(), game.steamroll()));
    }
}

/// Exporter keeping a copy of every exported match
#[derive(Clone, Default)]
pub struct Captured {
    pub matches: Arc<Mutex<Vec<Match>>>,
}

impl Exporter for Captured {
    fn export(&self, game: &Match) -> Result<ExportSummary, ExportError> {
        let table = game.to_table()?;
        self.matches.lock().unwrap().push(game.clone());
        Ok(ExportSummary {
            rows: table.rows.len(),
            paths: Vec::new(),
        })
    }
}

pub fn poller_config() -> PollerConfig {
    PollerConfig {
        server_name: "test".to_string(),
        result_lookup_attempts: 3,
        ..Default::default()
    }
}

/// Poller wired to a fake server, a recorder and a capturing exporter
pub fn poller(server: &FakeServer) -> (Poller<FakeServer>, Recorder, Captured) {
    let recorder = Recorder::default();
    let captured = Captured::default();
    let poller = Poller::new(server.clone(), poller_config())
        .with_notifier(recorder.clone())
        .with_exporter(Some(Box::new(captured.clone())));
    (poller, recorder, captured)
}
