#![recursion_limit = "256"]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dqn_2048::ai::{Policy, QualityPolicy};
use dqn_2048::checkpoint::{CheckpointManager, TrainingState};
use dqn_2048::config::AppConfig;
use dqn_2048::training::trainer::Trainer;

/// Train a 2048 value-network policy with deep Q-learning.
#[derive(Parser)]
#[command(name = "train", about = "Train a 2048 value-network policy")]
struct Cli {
    /// Resume training from the latest checkpoint
    #[arg(long)]
    resume: bool,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Override learning rate
    #[arg(long)]
    lr: Option<f64>,

    /// Seed every random source for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(episodes) = cli.episodes {
        app_config.training.num_episodes = episodes;
    }
    if let Some(lr) = cli.lr {
        app_config.quality.learning_rate = lr;
    }
    if cli.seed.is_some() {
        app_config.training.seed = cli.seed;
    }
    app_config
        .validate()
        .context("validating configuration overrides")?;

    let size = app_config.board.size;
    let mut online = QualityPolicy::new(app_config.quality.clone(), size);
    let mut target = QualityPolicy::new(app_config.quality.clone(), size);

    let mut trainer = Trainer::new(
        app_config.training.clone(),
        app_config.board.clone(),
        app_config.checkpoint.clone(),
    );

    let manager = CheckpointManager::new(app_config.checkpoint.clone());
    if cli.resume {
        match manager.load_latest() {
            Ok(data) => {
                online
                    .load_weights(&data.weights)
                    .with_context(|| format!("loading weights from {}", data.weights.display()))?;
                trainer.resume_from(&data.state);
                tracing::info!(
                    episode = data.state.episode,
                    snapshot = %data.weights.display(),
                    "resumed from checkpoint"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "no checkpoint to resume, starting fresh");
            }
        }
    }

    let summary = trainer
        .train(&mut online, &mut target)
        .context("training failed")?;

    // Always leave a final checkpoint behind.
    let state = TrainingState {
        episode: trainer.episode_count(),
        step_count: trainer.step_count(),
        epsilon: trainer.epsilon(),
        policy: online.name().to_string(),
        average_max_tile: summary.average_max_tile,
    };
    manager
        .save(&online, &state)
        .context("saving final checkpoint")?;

    println!(
        "episodes: {}  best tile: {}  avg max tile: {:.1}  avg moves: {:.1}",
        summary.episodes, summary.best_tile, summary.average_max_tile, summary.average_moves
    );
    Ok(())
}
