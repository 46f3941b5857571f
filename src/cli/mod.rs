//! CLI interface for hll-steamroll
//!
//! Provides subcommands for:
//! - `watch`: Poll the server and classify finished games
//! - `check`: Classify one game from the scoreboard history
//! - `header`: Print export column names
//! - `config`: Show configuration

mod check;
mod watch;

pub use check::CheckArgs;
pub use watch::WatchArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hll-steamroll")]
#[command(about = "Match poller and steamroll classifier for Hell Let Loose CRCON servers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the server until Ctrl-C
    Watch(WatchArgs),
    /// Look up a finished game and print its classification
    Check(CheckArgs),
    /// Print feature and label column names
    Header,
    /// Show configuration
    Config,
}
