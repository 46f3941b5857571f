//! Watch command implementation

use crate::config::Config;
use crate::crcon::CrconClient;
use crate::data::exporter_for;
use crate::watch::{Poller, PollerConfig};
use clap::Args;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Run a single poll tick and exit
    #[arg(long)]
    pub once: bool,
}

impl WatchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = CrconClient::new(config.server.crcon_config())?;
        let mut poller = Poller::new(client, PollerConfig::from_config(config))
            .with_exporter(exporter_for(&config.export));

        if self.once {
            let report = poller.tick().await?;
            println!(
                "{} {} ({} snapshots)",
                report.map_id, report.observed, report.snapshot_count
            );
            return Ok(());
        }

        tracing::info!(
            server = %config.server.name,
            url = %config.server.url,
            interval_secs = config.poll.interval_secs,
            "Watching server"
        );
        poller.run().await
    }
}
