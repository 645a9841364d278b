use serde::{Deserialize, Serialize};

/// Trainer progress written next to each weight snapshot as `<stem>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingState {
    pub episode: usize,
    pub step_count: usize,
    pub epsilon: f32,
    pub policy: String,
    /// Mean max tile over the trainer's rolling window.
    #[serde(default)]
    pub average_max_tile: f32,
}
