use clap::Parser;
use hll_steamroll::cli::{Cli, Commands};
use hll_steamroll::config::Config;
use hll_steamroll::data::{feature_header, label_header};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using bundled configuration");
            toml::from_str(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    let _telemetry = hll_steamroll::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Watch(args) => {
            tracing::info!("Starting poller");
            args.execute(&config).await?;
        }
        Commands::Check(args) => {
            args.execute(&config).await?;
        }
        Commands::Header => {
            println!("Features: {}", feature_header().join(","));
            println!("Labels: {}", label_header().join(","));
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Server: {} ({})", config.server.name, config.server.url);
            println!(
                "  Poll: every {}s, {} result lookups",
                config.poll.interval_secs, config.poll.result_lookup_attempts
            );
            println!(
                "  Steamroll: under {} min, seeding below {} per side",
                config.classification.steamroll_threshold_minutes,
                config.classification.seeding_threshold
            );
            if config.export.enabled {
                println!(
                    "  Export: {:?} to {}",
                    config.export.format,
                    config.export.output_dir.display()
                );
            } else {
                println!("  Export: disabled");
            }
        }
    }

    Ok(())
}
