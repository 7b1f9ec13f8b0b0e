use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use signal_bridge::config::BridgeConfig;
use signal_bridge::engine::Bridge;
use signal_bridge::hal::mock::SimulatedAdc;
use signal_bridge::transport::HttpSender;

/// Sample the analog front-end and stream batches to the collector
#[derive(Parser, Debug)]
#[command(name = "signal-bridge", version, about)]
struct Args {
    /// JSON configuration file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Drive the pipeline from the built-in converter simulation
    #[arg(long)]
    simulate: bool,

    /// Stop after this many full batches
    #[arg(long)]
    batches: Option<u64>,

    /// Print the default configuration as JSON and exit
    #[arg(long)]
    print_default_config: bool,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if args.print_default_config {
        println!("{}", BridgeConfig::default().to_json_pretty()?);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => BridgeConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => BridgeConfig::default(),
    };

    if !args.simulate {
        bail!("No register-level converter driver is built in; run with --simulate");
    }

    let sender = HttpSender::new(&config.endpoint, config.wire.timestamp_format)?;
    info!("Posting batches to {}", sender.url());

    let device = SimulatedAdc::new(
        config.channels.len(),
        config.device.conversion_rate_hz,
        config.device.reference_voltage,
        config.device.gain,
    )
    .with_resolution_bits(config.device.resolution_bits);

    let mut bridge = Bridge::new(config, Arc::new(sender))?;
    bridge.start(device, args.batches)?;

    let snapshot = if args.batches.is_some() {
        bridge.wait().await?
    } else {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?;
        warn!("Interrupted, shutting down");
        bridge.shutdown().await?
    };

    info!("Final counters: {}", serde_json::to_string(&snapshot)?);
    Ok(())
}
