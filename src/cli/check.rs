//! Check command implementation

use crate::config::Config;
use crate::crcon::{CrconClient, MatchSource};
use crate::game::{GameResult, Match};
use anyhow::Context;
use clap::Args;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Map id, e.g. `stmereeglise_warfare`
    #[arg(long)]
    pub map: String,

    /// Game start, epoch seconds
    #[arg(long)]
    pub start: i64,
}

impl CheckArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = CrconClient::new(config.server.crcon_config())?;
        let entry = client
            .find_game(&self.map, self.start, config.poll.start_tolerance_secs)
            .await?
            .with_context(|| format!("No game on {} starting at {}", self.map, self.start))?;

        let threshold =
            chrono::Duration::minutes(config.classification.steamroll_threshold_minutes);
        let mut game = Match::new(config.server.name.as_str(), self.map.as_str(), self.start)
            .with_threshold(threshold);
        let outcome = *game.process_result(&GameResult::from(entry))?;

        println!("Game: {}", game.map_id());
        println!("  Mode: {}", game.game_mode().unwrap_or("unknown"));
        if let Some(duration) = game.duration() {
            println!("  Duration: {} min", duration.num_minutes());
        }
        println!("  Score: {}", game.score());
        println!("  Winner: {}  Loser: {}", outcome.winner, outcome.loser);
        println!("  Steamroll: {} ({})", outcome.steamroll, outcome.reason);

        Ok(())
    }
}
