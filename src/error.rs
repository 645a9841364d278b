use std::path::PathBuf;

/// Errors raised while constructing or comparing boards.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("invalid board {field}: {reason}")]
    Configuration { field: &'static str, reason: String },

    #[error("board shape mismatch: expected size {expected}, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("unknown direction code {0} (expected 0..4)")]
    UnknownDirection(usize),
}

/// Errors that can occur during checkpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("no snapshot found in {0}")]
    NoSnapshot(PathBuf),

    #[error("failed to read training state from {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse training state from {path}: {source}")]
    MetadataParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to save model: {0}")]
    ModelSave(String),

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during training.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("board error: {0}")]
    Board(#[from] BoardError),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
