//! Weight snapshots named by timestamp (`YYYYMMDD_HHMMSS.mpk`), each with a
//! JSON sidecar recording trainer progress.

mod manager;
mod metadata;

pub use manager::{
    snapshot_stem, CheckpointData, CheckpointManager, CheckpointManagerConfig, SNAPSHOT_EXTENSION,
};
pub use metadata::TrainingState;
