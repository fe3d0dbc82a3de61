use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::modes::HumanMode;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a grid with obstacles")]
struct Cli {
    /// TOML file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds per game tick
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Let the bot play
    #[arg(long)]
    autopilot: bool,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_tracing(path, &cli.log_level)?;
    }

    let config = build_config(&cli)?;
    info!(
        grid_size = config.grid_size,
        tick_ms = config.tick_ms,
        autopilot = cli.autopilot,
        "starting"
    );

    let mut mode = HumanMode::new(config).with_autopilot(cli.autopilot);
    mode.run().await?;

    Ok(())
}

/// Load the config file (if any), then apply command-line overrides
fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => GameConfig::default(),
    };

    if let Some(size) = cli.grid_size {
        config.grid_size = size;
        config.obstacles.retain(|pos| pos.is_within(size));
    }
    if let Some(seed) = cli.seed {
        config.food_seed = Some(seed);
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_ms = tick_ms;
    }

    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

/// Initialize tracing/logging into a file
fn init_tracing(path: &Path, log_level: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}
