use anyhow::Context;
use clap::Parser;
use srcds_restarter::config::{Config, Protocol};
use srcds_restarter::FleetRunner;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

/// Restart idle or unreachable Source dedicated servers.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "srcds-restarter.json")]
    config: PathBuf,

    /// Probe protocol, overrides the configuration (a2s or rcon)
    #[arg(short, long)]
    protocol: Option<Protocol>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(protocol) = cli.protocol {
        config.probe.protocol = protocol;
    }

    tracing::info!("Starting restart run");
    let report = FleetRunner::new(config).run().await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    tracing::info!("Restart run complete");
    Ok(())
}
