use std::path::{Path, PathBuf};

use crate::error::CheckpointError;
use crate::game::{Action, Board};

/// A board, the action taken on it, and the value that action realized.
/// This is the unit a policy learns from.
#[derive(Debug, Clone)]
pub struct Experience {
    pub state: Board,
    pub action: Action,
    pub value: f32,
}

/// Metrics returned from a training update.
#[derive(Debug, Clone, Default)]
pub struct UpdateMetrics {
    pub loss: f32,
}

/// Value-estimating move selector driven by the episode loop.
pub trait Policy {
    /// Return the policy's display name.
    fn name(&self) -> &str;

    /// Pick the locally best action for `board` and its estimated value.
    fn select_action(&mut self, board: &Board) -> (Action, f32);

    /// Fit the policy to a batch of experiences. Returns training metrics.
    fn learn(&mut self, _batch: &[Experience]) -> UpdateMetrics {
        UpdateMetrics::default()
    }

    /// Replace this policy's parameters with those of `from`.
    fn copy_weights(&mut self, from: &Self)
    where
        Self: Sized;

    /// Write a timestamped snapshot of the parameters into `dir`.
    /// Returns the snapshot path, or `None` for policies without parameters.
    fn persist(&self, _dir: &Path) -> Result<Option<PathBuf>, CheckpointError> {
        Ok(None)
    }
}
