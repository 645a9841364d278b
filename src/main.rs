#![recursion_limit = "256"]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use dqn_2048::ai::{Policy, QualityPolicy, RandomPolicy};
use dqn_2048::config::AppConfig;
use dqn_2048::training::episode::{play_episode, EpisodeOptions};

/// Play one game of 2048 and print the final board.
#[derive(Parser)]
#[command(name = "dqn-2048", about = "Play one game of 2048 with a policy")]
struct Cli {
    /// Path to TOML configuration file ([board] and [quality] are used)
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Rows (and columns) of the board; overrides [board] size
    #[arg(long)]
    size: Option<usize>,

    /// Value of a freshly seeded tile; overrides [board] unit
    #[arg(long)]
    unit: Option<u32>,

    /// Seed the board and policy for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Value-network snapshot to play with; plays randomly when absent
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Stop after this many moves
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(size) = cli.size {
        app_config.board.size = size;
    }
    if let Some(unit) = cli.unit {
        app_config.board.unit = unit;
    }
    app_config
        .validate()
        .context("validating configuration overrides")?;
    let board_config = app_config.board.clone();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut policy: Box<dyn Policy> = match &cli.weights {
        Some(path) => {
            let policy =
                QualityPolicy::from_snapshot(app_config.quality.clone(), board_config.size, path)
                    .with_context(|| format!("loading weights from {}", path.display()))?;
            Box::new(policy)
        }
        None => match cli.seed {
            Some(seed) => Box::new(RandomPolicy::with_seed(seed.wrapping_add(1))),
            None => Box::new(RandomPolicy::new()),
        },
    };

    let options = EpisodeOptions {
        max_steps: cli.max_steps,
        ..Default::default()
    };
    let trace = play_episode(policy.as_mut(), &board_config, &options, &mut rng)
        .context("playing game")?;
    tracing::debug!(policy = policy.name(), moves = trace.result.moves, "game finished");

    println!("{}", trace.final_board);
    println!();
    println!(
        "policy: {}  moves: {}  merges: {}  max tile: {}  {}",
        policy.name(),
        trace.result.moves,
        trace.result.merges,
        trace.result.max_tile,
        if trace.result.terminal {
            "no moves left"
        } else {
            "step limit reached"
        }
    );
    Ok(())
}
