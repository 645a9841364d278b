use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ai::{Experience, Policy};
use crate::checkpoint::{CheckpointManager, CheckpointManagerConfig, TrainingState};
use crate::error::TrainingError;
use crate::game::{BoardConfig, Tile};
use crate::training::episode::{play_episode, EpisodeOptions};
use crate::training::metrics::TrainingMetrics;
use crate::training::replay_buffer::ReplayBuffer;

/// Trainer configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_episodes: usize,
    pub gamma: f32,
    pub epsilon_start: f32,
    pub epsilon_end: f32,
    pub epsilon_decay_episodes: usize,
    pub batch_size: usize,
    pub replay_capacity: usize,
    pub min_replay_size: usize,
    /// Gradient updates after each episode once the buffer is warm.
    pub updates_per_episode: usize,
    /// Episodes between target-policy syncs.
    pub target_update_interval: usize,
    /// Episodes between progress log lines; 0 disables.
    pub log_interval: usize,
    /// Episodes between checkpoints; 0 disables.
    pub checkpoint_interval: usize,
    pub max_steps: usize,
    pub invalid_move_penalty: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_episodes: 10_000,
            gamma: 0.95,
            epsilon_start: 1.0,
            epsilon_end: 0.05,
            epsilon_decay_episodes: 5_000,
            batch_size: 64,
            replay_capacity: 50_000,
            min_replay_size: 1_000,
            updates_per_episode: 4,
            target_update_interval: 10,
            log_interval: 100,
            checkpoint_interval: 1_000,
            max_steps: 10_000,
            invalid_move_penalty: -1.0,
            seed: None,
        }
    }
}

/// Totals reported when a training run finishes.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub step_count: usize,
    pub best_tile: Tile,
    pub average_max_tile: f32,
    pub average_moves: f32,
    pub average_loss: f32,
}

/// Deep Q-learning trainer: plays episodes with an online policy, replays
/// transitions against a lagged target policy, and checkpoints periodically.
pub struct Trainer {
    config: TrainerConfig,
    board: BoardConfig,
    checkpoint_manager: CheckpointManager,
    replay_buffer: ReplayBuffer,
    rng: StdRng,
    epsilon: f32,
    episode_count: usize,
    step_count: usize,
}

impl Trainer {
    pub fn new(
        config: TrainerConfig,
        board: BoardConfig,
        checkpoint: CheckpointManagerConfig,
    ) -> Self {
        let (rng, replay_buffer) = match config.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                ReplayBuffer::with_seed(config.replay_capacity, seed.wrapping_add(1)),
            ),
            None => (
                StdRng::from_os_rng(),
                ReplayBuffer::new(config.replay_capacity),
            ),
        };
        let epsilon = config.epsilon_start;

        Trainer {
            config,
            board,
            checkpoint_manager: CheckpointManager::new(checkpoint),
            replay_buffer,
            rng,
            epsilon,
            episode_count: 0,
            step_count: 0,
        }
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn replay_len(&self) -> usize {
        self.replay_buffer.len()
    }

    /// Continue counting episodes and updates from a saved state.
    pub fn resume_from(&mut self, state: &TrainingState) {
        self.episode_count = state.episode;
        self.step_count = state.step_count;
        self.epsilon = state.epsilon;
    }

    /// Run `num_episodes` episodes. The target policy is synced from the
    /// online policy before the first episode.
    pub fn train<P: Policy>(
        &mut self,
        online: &mut P,
        target: &mut P,
    ) -> Result<TrainingSummary, TrainingError> {
        let mut metrics = TrainingMetrics::new();
        target.copy_weights(online);

        let start_episode = self.episode_count + 1;
        let end_episode = self.episode_count + self.config.num_episodes;
        let window = self.config.log_interval.max(1);

        tracing::info!(
            policy = online.name(),
            episodes = self.config.num_episodes,
            start = start_episode,
            end = end_episode,
            "starting training"
        );

        for episode in start_episode..=end_episode {
            self.decay_epsilon();
            let options = EpisodeOptions {
                epsilon: self.epsilon,
                max_steps: self.config.max_steps,
                invalid_move_penalty: self.config.invalid_move_penalty,
            };
            let trace = play_episode(online, &self.board, &options, &mut self.rng)?;
            for transition in trace.transitions {
                self.replay_buffer.push(transition);
            }
            metrics.record_episode(trace.result);
            self.episode_count = episode;

            // Guard against min_replay_size < batch_size
            let threshold = self.config.min_replay_size.max(self.config.batch_size);
            if self.replay_buffer.len() >= threshold {
                for _ in 0..self.config.updates_per_episode {
                    let loss = self.train_step(online, target);
                    metrics.record_update(loss);
                }
            }

            if self.config.target_update_interval > 0
                && episode % self.config.target_update_interval == 0
            {
                target.copy_weights(online);
                tracing::debug!(episode, "target policy synced");
            }

            if self.config.log_interval > 0 && episode % self.config.log_interval == 0 {
                tracing::info!(
                    episode,
                    end = end_episode,
                    epsilon = self.epsilon,
                    loss = metrics.average_loss(window),
                    avg_moves = metrics.average_moves(window),
                    avg_max_tile = metrics.average_max_tile(window),
                    best_tile = metrics.best_tile(),
                    "training progress"
                );
            }

            if self.config.checkpoint_interval > 0 && episode % self.config.checkpoint_interval == 0
            {
                let state = self.training_state(online.name(), &metrics, window);
                if let Err(e) = self.checkpoint_manager.save(&*online, &state) {
                    tracing::warn!(episode, error = %e, "checkpoint failed");
                }
            }
        }

        let summary = TrainingSummary {
            episodes: metrics.total_episodes(),
            step_count: self.step_count,
            best_tile: metrics.best_tile(),
            average_max_tile: metrics.average_max_tile(window),
            average_moves: metrics.average_moves(window),
            average_loss: metrics.average_loss(window),
        };
        tracing::info!(
            episodes = summary.episodes,
            best_tile = summary.best_tile,
            "training complete"
        );
        Ok(summary)
    }

    /// Snapshot of trainer progress for checkpointing.
    pub fn training_state(
        &self,
        policy: &str,
        metrics: &TrainingMetrics,
        window: usize,
    ) -> TrainingState {
        TrainingState {
            episode: self.episode_count,
            step_count: self.step_count,
            epsilon: self.epsilon,
            policy: policy.to_string(),
            average_max_tile: metrics.average_max_tile(window),
        }
    }

    /// One gradient update: sample transitions, bootstrap their values from
    /// the target policy, and let the online policy learn them.
    fn train_step<P: Policy>(&mut self, online: &mut P, target: &mut P) -> f32 {
        let batch = self.replay_buffer.sample(self.config.batch_size);
        let gamma = self.config.gamma;

        let experiences: Vec<Experience> = batch
            .into_iter()
            .map(|t| {
                let value = if t.done {
                    t.reward
                } else {
                    t.reward + gamma * target.select_action(&t.next_state).1
                };
                Experience {
                    state: t.state,
                    action: t.action,
                    value,
                }
            })
            .collect();

        self.step_count += 1;
        online.learn(&experiences).loss
    }

    /// Decay epsilon linearly over configured episodes, based on the number
    /// of episodes already played.
    fn decay_epsilon(&mut self) {
        if self.config.epsilon_decay_episodes == 0 {
            self.epsilon = self.config.epsilon_end;
            return;
        }
        let progress =
            (self.episode_count as f32) / (self.config.epsilon_decay_episodes as f32);
        let progress = progress.min(1.0);
        self.epsilon = self.config.epsilon_start
            + (self.config.epsilon_end - self.config.epsilon_start) * progress;
    }
}
