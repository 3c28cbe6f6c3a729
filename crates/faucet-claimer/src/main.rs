//! Main entry point for the faucet claimer.

use anyhow::{Context, Result};
use clap::Parser;
use faucet_claimer::{
    config::DEFAULT_CONFIG_FILE, resolve_address, AddressStore, ClaimerConfig, FaucetClient,
    PollLoop, TokioClock,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "faucet-claimer", author, version)]
#[command(about = "Stores a wallet address and claims testnet funds for it on a fixed interval")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Generate a default configuration file and exit
    #[arg(long)]
    generate_config: bool,

    /// JSON file holding the stored address
    #[arg(long, value_name = "PATH")]
    address_file: Option<PathBuf>,

    /// Faucet claim endpoint
    #[arg(long, env = "CLAIMER_ENDPOINT")]
    endpoint: Option<String>,

    /// Seconds between claims
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Claim once and exit
    #[arg(long)]
    once: bool,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let default_filter = if args.debug { "info,faucet_claimer=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if args.generate_config {
        let path = args
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        return generate_config(&path);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config, args.once).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Resolve the address, then claim until interrupted (or once)
async fn run(config: ClaimerConfig, once: bool) -> Result<()> {
    let store = AddressStore::new(&config.storage.address_file);
    let mut stdout = std::io::stdout();

    let address = {
        let mut input = std::io::stdin().lock();
        resolve_address(&store, &mut input, &mut stdout)
            .with_context(|| format!("Could not resolve address from {}", store.path().display()))?
    };

    let client = FaucetClient::from_config(&config.faucet)?;
    info!(
        "Claiming for {} at {} every {}s",
        address,
        client.endpoint(),
        config.schedule.interval_secs
    );

    let mut poll = PollLoop::new(client, TokioClock, address, config.interval());

    if once {
        poll.run(&mut stdout, Some(1)).await?;
        return Ok(());
    }

    let interrupted = tokio::select! {
        result = poll.run(&mut stdout, None) => {
            result?;
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };

    if interrupted {
        let stats = poll.stats();
        info!(
            "Interrupted after {} claims ({} succeeded, {} informational, {} failed)",
            stats.cycles, stats.successes, stats.infos, stats.failures
        );
    }

    Ok(())
}

/// Build the configuration: defaults, config file, environment, then flags
fn load_config(args: &Args) -> Result<ClaimerConfig> {
    let path = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow::anyhow!(
                    "Configuration file '{}' not found. Use --generate-config to create one.",
                    path.display()
                ));
            }
            Some(path.clone())
        }
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            default_path.exists().then_some(default_path)
        }
    };

    if let Some(path) = &path {
        info!("Loading configuration from: {}", path.display());
    }

    let mut config = ClaimerConfig::load(path.as_deref()).context("Failed to parse config")?;
    apply_overrides(&mut config, args);
    config.validate()?;

    Ok(config)
}

fn apply_overrides(config: &mut ClaimerConfig, args: &Args) {
    if let Some(address_file) = &args.address_file {
        config.storage.address_file = address_file.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        config.faucet.endpoint = endpoint.clone();
    }
    if let Some(interval_secs) = args.interval_secs {
        config.schedule.interval_secs = interval_secs;
    }
}

/// Generate a default configuration file
fn generate_config(path: &std::path::Path) -> Result<()> {
    let config = ClaimerConfig::default();

    config.save_to_file(path)?;

    println!("Generated default configuration file: {}", path.display());
    println!();
    println!("Example usage:");
    println!("  faucet-claimer --config {}", path.display());

    Ok(())
}
