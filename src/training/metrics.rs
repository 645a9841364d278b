use std::collections::VecDeque;

use crate::game::Tile;
use crate::training::episode::EpisodeResult;

/// Training metrics tracker with rolling window computations.
pub struct TrainingMetrics {
    episode_results: VecDeque<EpisodeResult>,
    update_losses: VecDeque<f32>,
    capacity: usize,
    total_episodes: usize, // lifetime count, never capped
    best_tile: Tile,
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            episode_results: VecDeque::with_capacity(capacity),
            update_losses: VecDeque::with_capacity(capacity),
            capacity,
            total_episodes: 0,
            best_tile: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_episode(&mut self, result: EpisodeResult) {
        self.total_episodes += 1;
        self.best_tile = self.best_tile.max(result.max_tile);
        self.episode_results.push_back(result);
        if self.episode_results.len() > self.capacity {
            self.episode_results.pop_front();
        }
    }

    pub fn record_update(&mut self, loss: f32) {
        self.update_losses.push_back(loss);
        if self.update_losses.len() > self.capacity {
            self.update_losses.pop_front();
        }
    }

    fn average_over<F>(&self, last_n: usize, f: F) -> f32
    where
        F: Fn(&EpisodeResult) -> f32,
    {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: f32 = self.episode_results.iter().rev().take(n).map(f).sum();
        total / n as f32
    }

    /// Average number of moves in the last N episodes.
    pub fn average_moves(&self, last_n: usize) -> f32 {
        self.average_over(last_n, |r| r.moves as f32)
    }

    /// Average highest tile in the last N episodes.
    pub fn average_max_tile(&self, last_n: usize) -> f32 {
        self.average_over(last_n, |r| r.max_tile as f32)
    }

    /// Fraction of the last N episodes that ended with a stuck board
    /// rather than the step limit.
    pub fn terminal_rate(&self, last_n: usize) -> f32 {
        self.average_over(last_n, |r| if r.terminal { 1.0 } else { 0.0 })
    }

    /// Average loss over the last N updates.
    pub fn average_loss(&self, last_n: usize) -> f32 {
        let n = self.update_losses.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let sum: f32 = self.update_losses.iter().rev().take(n).sum();
        sum / n as f32
    }

    /// Highest tile seen over the whole run.
    pub fn best_tile(&self) -> Tile {
        self.best_tile
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}
