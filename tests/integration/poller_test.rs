//! Poller driven by a scripted server

use crate::common::*;
use hll_steamroll::game::{MatchState, Score, SteamrollReason};
use hll_steamroll::stats::{MetricKey, Side};
use serde_json::json;

fn foy(per_side: u32, score: Score, time_remaining: f64) -> hll_steamroll::crcon::PublicInfo {
    public_info("foy_warfare", FOY_START, per_side, score, time_remaining)
}

fn carentan() -> hll_steamroll::crcon::PublicInfo {
    public_info("carentan_warfare", CARENTAN_START, 40, Score::new(2, 2), 5400.0)
}

#[tokio::test]
async fn test_playing_ticks_record_snapshots() {
    let server = FakeServer::new();
    server.push_playing(foy(40, Score::new(1, 0), 3000.0), players());
    server.push_playing(foy(40, Score::new(3, 1), 2400.0), players());
    let (mut poller, recorder, _) = poller(&server);

    let first = poller.tick().await.unwrap();
    assert_eq!(first.observed, MatchState::Playing);
    assert_eq!(first.snapshot_count, 1);

    let second = poller.tick().await.unwrap();
    assert_eq!(second.snapshot_count, 2);
    assert!(second.finished.is_empty());

    let game = poller.current().unwrap();
    assert_eq!(game.state(), MatchState::Playing);
    assert_eq!(game.score(), Score::new(3, 1));
    assert_eq!(game.time_remaining_secs(), 2400.0);

    let snap = &game.snapshots()[1];
    assert_eq!(snap.axis.series(MetricKey::Kills).values(), &[12.0, 4.0]);
    // Player without a team field is placed by weapon kills
    assert_eq!(snap.allies.series(MetricKey::Kills).values(), &[2.0, 5.0]);
    assert_eq!(snap.axis.series(MetricKey::Combat).mean(), 55.0);

    assert_eq!(
        recorder.events(),
        vec![
            Event::Tick("foy_warfare".to_string(), 1),
            Event::Tick("foy_warfare".to_string(), 2)
        ]
    );
}

#[tokio::test]
async fn test_seeding_and_empty_skip_live_stats() {
    let server = FakeServer::new();
    server.push_public(foy(0, Score::new(2, 2), 5400.0));
    server.push_public(foy(10, Score::new(2, 2), 5400.0));
    server.push_playing(foy(40, Score::new(2, 2), 5300.0), players());
    let (mut poller, recorder, _) = poller(&server);

    let report = poller.tick().await.unwrap();
    assert_eq!(report.observed, MatchState::Empty);
    assert_eq!(poller.current().unwrap().state(), MatchState::Empty);

    let report = poller.tick().await.unwrap();
    assert_eq!(report.observed, MatchState::Seeding);
    assert_eq!(report.snapshot_count, 0);
    assert_eq!(poller.current().unwrap().state(), MatchState::Seeding);
    assert_eq!(server.live_calls(), 0);
    assert!(recorder.events().is_empty());

    poller.tick().await.unwrap();
    assert_eq!(poller.current().unwrap().state(), MatchState::Playing);
    assert_eq!(server.live_calls(), 1);
}

#[tokio::test]
async fn test_population_drop_mid_game_keeps_playing() {
    let server = FakeServer::new();
    server.push_playing(foy(40, Score::new(1, 0), 3000.0), players());
    server.push_public(foy(10, Score::new(1, 0), 2900.0));
    let (mut poller, _, _) = poller(&server);

    poller.tick().await.unwrap();
    let report = poller.tick().await.unwrap();

    assert_eq!(report.observed, MatchState::Seeding);
    assert_eq!(report.snapshot_count, 1);
    assert_eq!(poller.current().unwrap().state(), MatchState::Playing);
}

#[tokio::test]
async fn test_map_change_classifies_finished_match() {
    let server = FakeServer::new();
    server.push_playing(foy(40, Score::new(1, 0), 3000.0), players());
    server.push_playing(foy(40, Score::new(4, 0), 2000.0), players());
    server.push_playing(carentan(), players());
    server.set_history(vec![
        history_entry(8, "carentan_warfare", "2025-06-08T17:52:48", None, None),
        history_entry(
            7,
            "foy_warfare",
            FOY_START_TS,
            Some("2025-06-08T16:34:48"),
            Some(Score::new(5, 0)),
        ),
    ]);
    let (mut poller, recorder, captured) = poller(&server);

    poller.tick().await.unwrap();
    poller.tick().await.unwrap();
    let report = poller.tick().await.unwrap();

    assert_eq!(report.map_id, "carentan_warfare");
    assert_eq!(report.snapshot_count, 1);
    assert_eq!(report.finished.len(), 1);
    let outcome = report.finished[0];
    assert!(outcome.steamroll);
    assert_eq!(outcome.winner, Side::Axis);
    assert_eq!(outcome.loser, Side::Allies);
    assert_eq!(outcome.reason, SteamrollReason::UnderThreshold);
    assert_eq!(poller.pending_count(), 0);
    assert!(poller.current().unwrap().is_same_game("carentan_warfare", CARENTAN_START));

    let exported = captured.matches.lock().unwrap();
    assert_eq!(exported.len(), 1);
    let finished = &exported[0];
    assert_eq!(finished.state(), MatchState::GameOver);
    assert_eq!(finished.score(), Score::new(5, 0));
    assert_eq!(finished.snapshots().len(), 2);
    for snap in finished.snapshots() {
        let stamp = snap.outcome().unwrap();
        assert!(stamp.was_steamroll);
        assert_eq!(stamp.final_duration_secs, 720);
        assert_eq!(stamp.final_score, Score::new(5, 0));
    }

    assert_eq!(
        recorder.events().last(),
        Some(&Event::Finished("foy_warfare".to_string(), true))
    );
}

#[tokio::test]
async fn test_long_game_is_not_steamroll() {
    let server = FakeServer::new();
    server.push_playing(foy(40, Score::new(1, 0), 3000.0), players());
    server.push_playing(carentan(), players());
    server.set_history(vec![history_entry(
        7,
        "foy_warfare",
        FOY_START_TS,
        Some("2025-06-08T17:52:48"),
        Some(Score::new(3, 2)),
    )]);
    let (mut poller, _, _) = poller(&server);

    poller.tick().await.unwrap();
    let report = poller.tick().await.unwrap();

    let outcome = report.finished[0];
    assert!(!outcome.steamroll);
    assert_eq!(outcome.winner, Side::Axis);
    assert_eq!(outcome.reason, SteamrollReason::DurationExceeded);
}

#[tokio::test]
async fn test_incomplete_result_is_retried() {
    let server = FakeServer::new();
    server.push_playing(foy(40, Score::new(1, 0), 3000.0), players());
    server.push_playing(carentan(), players());
    server.push_playing(carentan(), players());
    server.set_history(vec![history_entry(7, "foy_warfare", FOY_START_TS, None, None)]);
    let (mut poller, _, captured) = poller(&server);

    poller.tick().await.unwrap();
    let report = poller.tick().await.unwrap();
    assert!(report.finished.is_empty());
    assert_eq!(poller.pending_count(), 1);

    server.set_history(vec![history_entry(
        7,
        "foy_warfare",
        FOY_START_TS,
        Some("2025-06-08T16:50:48"),
        Some(Score::new(2, 5)),
    )]);
    let report = poller.tick().await.unwrap();

    assert_eq!(report.finished.len(), 1);
    assert_eq!(report.finished[0].winner, Side::Allies);
    assert!(report.finished[0].steamroll);
    assert_eq!(poller.pending_count(), 0);
    assert_eq!(captured.matches.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_result_is_abandoned() {
    let server = FakeServer::new();
    server.push_playing(foy(40, Score::new(1, 0), 3000.0), players());
    for _ in 0..3 {
        server.push_playing(carentan(), players());
    }
    let (mut poller, recorder, captured) = poller(&server);

    poller.tick().await.unwrap();
    poller.tick().await.unwrap();
    assert_eq!(poller.pending_count(), 1);
    poller.tick().await.unwrap();
    assert_eq!(poller.pending_count(), 1);
    poller.tick().await.unwrap();

    assert_eq!(poller.pending_count(), 0);
    assert!(captured.matches.lock().unwrap().is_empty());
    assert!(!recorder
        .events()
        .iter()
        .any(|e| matches!(e, Event::Finished(..))));
}

#[tokio::test]
async fn test_failed_fetch_leaves_matches_untouched() {
    let server = FakeServer::new();
    server.push_playing(foy(40, Score::new(1, 0), 3000.0), players());
    server.push_public_failure();
    server.push_public(carentan());
    server.push_live_failure();
    let (mut poller, _, _) = poller(&server);

    poller.tick().await.unwrap();
    assert!(poller.tick().await.is_err());
    assert!(poller.tick().await.is_err());

    let game = poller.current().unwrap();
    assert!(game.is_same_game("foy_warfare", FOY_START));
    assert_eq!(game.snapshots().len(), 1);
    assert_eq!(game.score(), Score::new(1, 0));
    assert_eq!(poller.pending_count(), 0);
}

#[tokio::test]
async fn test_malformed_stats_discard_snapshot() {
    let server = FakeServer::new();
    server.push_playing(
        foy(40, Score::new(0, 0), 5400.0),
        json!([{"player": "a", "team": "axis", "kills": "lots"}]),
    );
    let (mut poller, recorder, _) = poller(&server);

    assert!(poller.tick().await.is_err());
    assert!(poller.current().is_none());
    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn test_match_never_played_is_not_classified() {
    let server = FakeServer::new();
    server.push_public(foy(10, Score::new(0, 0), 5400.0));
    server.push_public(foy(10, Score::new(0, 0), 5300.0));
    server.push_playing(carentan(), players());
    server.set_history(vec![history_entry(
        7,
        "foy_warfare",
        FOY_START_TS,
        Some("2025-06-08T16:34:48"),
        Some(Score::new(5, 0)),
    )]);
    let (mut poller, recorder, captured) = poller(&server);

    poller.tick().await.unwrap();
    poller.tick().await.unwrap();
    assert_eq!(poller.current().unwrap().state(), MatchState::Seeding);

    let report = poller.tick().await.unwrap();

    assert!(report.finished.is_empty());
    assert_eq!(poller.pending_count(), 0);
    assert!(poller.current().unwrap().is_same_game("carentan_warfare", CARENTAN_START));
    assert!(captured.matches.lock().unwrap().is_empty());
    assert!(!recorder
        .events()
        .iter()
        .any(|e| matches!(e, Event::Finished(..))));
}

#[tokio::test]
async fn test_history_outage_counts_toward_attempts() {
    let server = FakeServer::new();
    server.push_playing(foy(40, Score::new(1, 0), 3000.0), players());
    for _ in 0..5 {
        server.push_playing(carentan(), players());
    }
    server.set_history_down(true);
    let (mut poller, _, captured) = poller(&server);

    poller.tick().await.unwrap();
    poller.tick().await.unwrap();
    assert_eq!(poller.pending_count(), 1);
    poller.tick().await.unwrap();
    assert_eq!(poller.pending_count(), 1);
    poller.tick().await.unwrap();
    assert_eq!(poller.pending_count(), 0);

    // Recovery after the match was abandoned changes nothing
    server.set_history_down(false);
    server.set_history(vec![history_entry(
        7,
        "foy_warfare",
        FOY_START_TS,
        Some("2025-06-08T16:34:48"),
        Some(Score::new(5, 0)),
    )]);
    let report = poller.tick().await.unwrap();
    assert!(report.finished.is_empty());
    assert!(captured.matches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_recovers_within_attempts() {
    let server = FakeServer::new();
    server.push_playing(foy(40, Score::new(1, 0), 3000.0), players());
    server.push_playing(carentan(), players());
    server.push_playing(carentan(), players());
    server.set_history_down(true);
    let (mut poller, _, captured) = poller(&server);

    poller.tick().await.unwrap();
    poller.tick().await.unwrap();
    assert_eq!(poller.pending_count(), 1);

    server.set_history_down(false);
    server.set_history(vec![history_entry(
        7,
        "foy_warfare",
        FOY_START_TS,
        Some("2025-06-08T16:34:48"),
        Some(Score::new(5, 0)),
    )]);
    let report = poller.tick().await.unwrap();

    assert_eq!(report.finished.len(), 1);
    assert_eq!(poller.pending_count(), 0);
    assert_eq!(captured.matches.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_result_ending_before_start_is_dropped() {
    let server = FakeServer::new();
    server.push_playing(foy(40, Score::new(1, 0), 3000.0), players());
    server.push_playing(carentan(), players());
    server.set_history(vec![history_entry(
        7,
        "foy_warfare",
        FOY_START_TS,
        Some("2025-06-08T15:22:48"),
        Some(Score::new(5, 0)),
    )]);
    let (mut poller, recorder, captured) = poller(&server);

    poller.tick().await.unwrap();
    let report = poller.tick().await.unwrap();

    assert!(report.finished.is_empty());
    assert_eq!(poller.pending_count(), 0);
    assert!(captured.matches.lock().unwrap().is_empty());
    assert!(!recorder
        .events()
        .iter()
        .any(|e| matches!(e, Event::Finished(..))));
}
