use std::path::Path;

use crate::ai::QualityConfig;
use crate::checkpoint::CheckpointManagerConfig;
use crate::error::ConfigError;
use crate::game::BoardConfig;
use crate::training::trainer::TrainerConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub quality: QualityConfig,
    pub training: TrainerConfig,
    pub checkpoint: CheckpointManagerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.size == 0 {
            return Err(ConfigError::Validation("board.size must be > 0".into()));
        }
        if self.board.unit == 0 {
            return Err(ConfigError::Validation("board.unit must be > 0".into()));
        }
        if self.board.initial_tiles > self.board.size * self.board.size {
            return Err(ConfigError::Validation(
                "board.initial_tiles must fit on the board".into(),
            ));
        }

        if self.quality.learning_rate <= 0.0 {
            return Err(ConfigError::Validation(
                "quality.learning_rate must be > 0".into(),
            ));
        }
        if self.quality.first_hidden == 0 || self.quality.second_hidden == 0 {
            return Err(ConfigError::Validation(
                "quality hidden layers must be > 0".into(),
            ));
        }

        let t = &self.training;
        if t.num_episodes == 0 {
            return Err(ConfigError::Validation(
                "training.num_episodes must be > 0".into(),
            ));
        }
        if t.gamma < 0.0 || t.gamma > 1.0 {
            return Err(ConfigError::Validation(
                "training.gamma must be in [0, 1]".into(),
            ));
        }

        // Epsilon schedule
        if t.epsilon_start < 0.0 || t.epsilon_start > 1.0 {
            return Err(ConfigError::Validation(
                "training.epsilon_start must be in [0, 1]".into(),
            ));
        }
        if t.epsilon_end < 0.0 || t.epsilon_end > 1.0 {
            return Err(ConfigError::Validation(
                "training.epsilon_end must be in [0, 1]".into(),
            ));
        }
        if t.epsilon_end > t.epsilon_start {
            return Err(ConfigError::Validation(
                "training.epsilon_end must be <= training.epsilon_start".into(),
            ));
        }

        // Replay
        if t.batch_size == 0 {
            return Err(ConfigError::Validation(
                "training.batch_size must be > 0".into(),
            ));
        }
        if t.replay_capacity < t.batch_size {
            return Err(ConfigError::Validation(
                "training.replay_capacity must be >= training.batch_size".into(),
            ));
        }
        if t.min_replay_size < t.batch_size {
            return Err(ConfigError::Validation(
                "training.min_replay_size must be >= training.batch_size".into(),
            ));
        }
        if t.min_replay_size > t.replay_capacity {
            return Err(ConfigError::Validation(
                "training.min_replay_size must be <= training.replay_capacity".into(),
            ));
        }
        if t.max_steps == 0 {
            return Err(ConfigError::Validation(
                "training.max_steps must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
