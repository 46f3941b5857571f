//! Poll loop
//!
//! Watches one CRCON server, builds snapshots while a game is played and
//! classifies each game once its result appears in the scoreboard history.

mod poller;

pub use poller::{Poller, PollerConfig, TickReport};

use crate::game::Match;

/// Receives match progress from the poller
pub trait Notifier: Send + Sync {
    /// A snapshot was appended to `game`
    fn tick_recorded(&self, game: &Match);
    /// `game` reached GAMEOVER and has an outcome
    fn match_finished(&self, game: &Match);
}

/// Writes match progress through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn tick_recorded(&self, game: &Match) {
        tracing::info!(
            server = %game.server(),
            map = %game.map_id(),
            time_left = %format_clock(game.time_remaining_secs()),
            score = %game.score(),
            snapshots = game.snapshots().len(),
            "Game is still on {}",
            game.map_id()
        );
    }

    fn match_finished(&self, game: &Match) {
        let reason = game
            .steamroll_reason()
            .map(|r| r.to_string())
            .unwrap_or_default();

        if game.steamroll() {
            tracing::info!(
                server = %game.server(),
                map = %game.map_id(),
                winner = %game.winner(),
                loser = %game.loser(),
                "Game {} was a steamroll! {}",
                game.map_id(),
                reason
            );
        } else {
            tracing::info!(
                server = %game.server(),
                map = %game.map_id(),
                "Game {} was NOT a steamroll - {}",
                game.map_id(),
                reason
            );
        }
    }
}

/// `H:MM:SS` for a number of seconds
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
