//! Single-server poller

use super::{LogNotifier, Notifier};
use crate::config::Config;
use crate::crcon::{FactionClassifier, MatchSource, PublicInfo, TeamClassifier};
use crate::data::Exporter;
use crate::game::{GameResult, Match, MatchError, MatchSnapshot, MatchState, Outcome};
use crate::telemetry::{self, CounterMetric};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Poller settings, lifted from [`Config`]
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub server_name: String,
    pub interval: Duration,
    pub seeding_threshold: u32,
    pub series_capacity: usize,
    pub steamroll_threshold: chrono::Duration,
    pub result_lookup_attempts: u32,
    pub start_tolerance_secs: i64,
}

impl PollerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            server_name: config.server.name.clone(),
            interval: Duration::from_secs(config.poll.interval_secs),
            seeding_threshold: config.classification.seeding_threshold,
            series_capacity: config.classification.series_capacity,
            steamroll_threshold: chrono::Duration::minutes(
                config.classification.steamroll_threshold_minutes,
            ),
            result_lookup_attempts: config.poll.result_lookup_attempts,
            start_tolerance_secs: config.poll.start_tolerance_secs,
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            server_name: "default".to_string(),
            interval: Duration::from_secs(120),
            seeding_threshold: 25,
            series_capacity: crate::stats::DEFAULT_SERIES_CAPACITY,
            steamroll_threshold: chrono::Duration::minutes(
                crate::game::DEFAULT_STEAMROLL_THRESHOLD_MINUTES,
            ),
            result_lookup_attempts: 5,
            start_tolerance_secs: 5,
        }
    }
}

/// What one tick observed
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Map of the tracked match
    pub map_id: String,
    /// Server state observed this tick
    pub observed: MatchState,
    /// Snapshots held by the tracked match
    pub snapshot_count: usize,
    /// Matches classified this tick
    pub finished: Vec<Outcome>,
}

/// Retired match waiting for its history entry
#[derive(Debug)]
struct PendingResult {
    game: Match,
    attempts: u32,
}

/// Polls one server and drives its matches through their lifecycle
pub struct Poller<S: MatchSource> {
    source: S,
    classifier: Box<dyn TeamClassifier>,
    notifier: Box<dyn Notifier>,
    exporter: Option<Box<dyn Exporter>>,
    config: PollerConfig,
    current: Option<Match>,
    pending: VecDeque<PendingResult>,
}

impl<S: MatchSource> Poller<S> {
    pub fn new(source: S, config: PollerConfig) -> Self {
        Self {
            source,
            classifier: Box::new(FactionClassifier::new()),
            notifier: Box::new(LogNotifier),
            exporter: None,
            config,
            current: None,
            pending: VecDeque::new(),
        }
    }

    pub fn with_classifier(mut self, classifier: impl TeamClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_exporter(mut self, exporter: Option<Box<dyn Exporter>>) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Match currently being tracked
    pub fn current(&self) -> Option<&Match> {
        self.current.as_ref()
    }

    /// Retired matches still waiting for a result
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Server state implied by public info
    pub fn observe_state(&self, public: &PublicInfo) -> MatchState {
        let counts = public.player_count_by_team;
        if public.player_count == 0 {
            MatchState::Empty
        } else if counts.axis < self.config.seeding_threshold
            && counts.allied < self.config.seeding_threshold
        {
            MatchState::Seeding
        } else {
            MatchState::Playing
        }
    }

    /// Run one poll cycle
    ///
    /// All server fetches for the live game happen before any match is
    /// touched, so a failed fetch leaves the poller exactly as it was.
    pub async fn tick(&mut self) -> anyhow::Result<TickReport> {
        let started = Instant::now();

        let public = self.source.public_info().await?;
        let observed = self.observe_state(&public);
        let snapshot = if observed == MatchState::Playing {
            let live = self.source.live_stats().await?;
            Some(MatchSnapshot::build(
                &live,
                &public,
                self.classifier.as_ref(),
                self.config.series_capacity,
            )?)
        } else {
            None
        };

        let map_id = public.current_map.map.id.clone();
        let start = public.current_map.start_secs();

        let changed = self
            .current
            .as_ref()
            .is_some_and(|game| !game.is_same_game(&map_id, start));
        if let Some(previous) = changed.then(|| self.current.take()).flatten() {
            self.retire(previous, &map_id);
        }

        let threshold = self.config.steamroll_threshold;
        let server = &self.config.server_name;
        let game = self.current.get_or_insert_with(|| {
            tracing::info!(map = %map_id, start, "Tracking new match");
            Match::new(server.as_str(), map_id.as_str(), start).with_threshold(threshold)
        });

        match snapshot {
            Some(snapshot) => {
                game.add_snapshot(snapshot)?;
                telemetry::increment(CounterMetric::SnapshotsRecorded);
                telemetry::set_live_match(game.score(), game.time_remaining_secs());
                self.notifier.tick_recorded(game);
            }
            None if game.state().is_pre_play() => {
                game.report_state(observed)?;
                tracing::info!(
                    map = %map_id,
                    players = public.player_count,
                    state = %observed,
                    "Server not in play"
                );
            }
            None => {
                tracing::debug!(
                    map = %map_id,
                    state = %observed,
                    "Player count dropped mid-game"
                );
            }
        }

        let snapshot_count = game.snapshots().len();
        let finished = self.resolve_pending().await;

        telemetry::record_poll_latency(started.elapsed());

        Ok(TickReport {
            map_id,
            observed,
            snapshot_count,
            finished,
        })
    }

    /// Queue a match left behind by a map change
    ///
    /// Only matches observed in play wait for a result; the rest are dropped.
    fn retire(&mut self, previous: Match, next_map: &str) {
        if previous.state() != MatchState::Playing {
            tracing::debug!(
                map = %previous.map_id(),
                state = %previous.state(),
                next = %next_map,
                "Map changed before play, dropping match"
            );
            return;
        }

        tracing::info!(
            map = %previous.map_id(),
            snapshots = previous.snapshots().len(),
            next = %next_map,
            "Map changed, awaiting result"
        );
        self.pending.push_back(PendingResult {
            game: previous,
            attempts: 0,
        });
    }

    /// Look up results for retired matches
    async fn resolve_pending(&mut self) -> Vec<Outcome> {
        let mut finished = Vec::new();
        let mut still_pending = VecDeque::new();

        while let Some(mut entry) = self.pending.pop_front() {
            let lookup = self
                .source
                .find_game(
                    entry.game.map_id(),
                    entry.game.start_time_s(),
                    self.config.start_tolerance_secs,
                )
                .await;

            match lookup {
                Ok(Some(found)) => {
                    let result = GameResult::from(found);
                    match entry.game.process_result(&result) {
                        Ok(outcome) => {
                            finished.push(*outcome);
                            self.finish(&entry.game);
                            continue;
                        }
                        Err(MatchError::IncompleteResult(id)) => {
                            tracing::debug!(
                                map = %entry.game.map_id(),
                                id,
                                "Result not final yet"
                            );
                        }
                        Err(e) => {
                            tracing::warn!(
                                map = %entry.game.map_id(),
                                error = %e,
                                "Dropping match with unusable result"
                            );
                            telemetry::increment(CounterMetric::ResultsAbandoned);
                            continue;
                        }
                    }
                }
                Ok(None) => {
                    tracing::debug!(map = %entry.game.map_id(), "Game not in history yet");
                }
                Err(e) => {
                    tracing::warn!(
                        map = %entry.game.map_id(),
                        error = %e,
                        "History lookup failed"
                    );
                    telemetry::increment(CounterMetric::PollErrors);
                }
            }

            // Misses and failed lookups both count
            entry.attempts += 1;
            if entry.attempts >= self.config.result_lookup_attempts {
                tracing::warn!(
                    map = %entry.game.map_id(),
                    attempts = entry.attempts,
                    "Giving up on match result"
                );
                telemetry::increment(CounterMetric::ResultsAbandoned);
            } else {
                still_pending.push_back(entry);
            }
        }

        self.pending = still_pending;
        finished
    }

    fn finish(&self, game: &Match) {
        telemetry::increment(CounterMetric::MatchesFinished);
        if game.steamroll() {
            telemetry::increment(CounterMetric::Steamrolls);
        }
        self.notifier.match_finished(game);

        if let Some(exporter) = &self.exporter {
            match exporter.export(game) {
                Ok(summary) => {
                    tracing::info!(map = %game.map_id(), rows = summary.rows, "Exported match");
                }
                Err(e) => {
                    tracing::error!(map = %game.map_id(), error = %e, "Export failed");
                }
            }
        }
    }

    /// Tick every `interval` until Ctrl-C
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        telemetry::increment(CounterMetric::PollErrors);
                        tracing::warn!(error = %e, "Poll failed");
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("Received shutdown signal");
                    break;
                }
            }
        }

        Ok(())
    }
}
