//! Prometheus metrics

use crate::game::Score;
use std::net::SocketAddr;
use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Poll ticks that failed
    PollErrors,
    /// Snapshots appended to a match
    SnapshotsRecorded,
    /// Matches that reached GAMEOVER
    MatchesFinished,
    /// Finished matches classified as steamrolls
    Steamrolls,
    /// Finished matches dropped without a result
    ResultsAbandoned,
}

impl CounterMetric {
    fn name(&self) -> &'static str {
        match self {
            CounterMetric::PollErrors => "hll_poll_errors_total",
            CounterMetric::SnapshotsRecorded => "hll_snapshots_recorded_total",
            CounterMetric::MatchesFinished => "hll_matches_finished_total",
            CounterMetric::Steamrolls => "hll_steamrolls_total",
            CounterMetric::ResultsAbandoned => "hll_results_abandoned_total",
        }
    }
}

/// Start the Prometheus scrape endpoint on `port`
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Record how long one poll tick took
pub fn record_poll_latency(duration: Duration) {
    metrics::histogram!("hll_poll_latency_ms").record(duration.as_secs_f64() * 1000.0);
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Publish the live score and clock of the tracked match
pub fn set_live_match(score: Score, time_remaining_secs: f64) {
    metrics::gauge!("hll_score", "side" => "axis").set(f64::from(score.axis));
    metrics::gauge!("hll_score", "side" => "allies").set(f64::from(score.allied));
    metrics::gauge!("hll_time_remaining_secs").set(time_remaining_secs);
}
