use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::ai::Policy;
use crate::checkpoint::metadata::TrainingState;
use crate::error::CheckpointError;

/// File extension of weight snapshots (burn's default named-msgpack recorder).
pub const SNAPSHOT_EXTENSION: &str = "mpk";

const STATE_EXTENSION: &str = "json";
const STEM_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Snapshot file stem for a point in time, e.g. `20261019_081503`.
pub fn snapshot_stem(time: &NaiveDateTime) -> String {
    time.format(STEM_FORMAT).to_string()
}

fn is_snapshot(path: &Path) -> bool {
    let has_extension = path.extension().and_then(|e| e.to_str()) == Some(SNAPSHOT_EXTENSION);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    has_extension && NaiveDateTime::parse_from_str(stem, STEM_FORMAT).is_ok()
}

/// Configuration for the checkpoint manager.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CheckpointManagerConfig {
    pub checkpoint_dir: PathBuf,
    /// Snapshots to retain; 0 keeps everything.
    pub keep_last_n: usize,
}

impl Default for CheckpointManagerConfig {
    fn default() -> Self {
        CheckpointManagerConfig {
            checkpoint_dir: PathBuf::from("checkpoints"),
            keep_last_n: 5,
        }
    }
}

/// A snapshot on disk together with the trainer state saved beside it.
#[derive(Debug)]
pub struct CheckpointData {
    pub weights: PathBuf,
    pub state: TrainingState,
}

/// Manages saving, listing, loading, and pruning weight snapshots.
pub struct CheckpointManager {
    config: CheckpointManagerConfig,
}

impl CheckpointManager {
    pub fn new(config: CheckpointManagerConfig) -> Self {
        fs::create_dir_all(&config.checkpoint_dir).ok();
        CheckpointManager { config }
    }

    pub fn dir(&self) -> &Path {
        &self.config.checkpoint_dir
    }

    /// Persist the policy and write the training state beside the snapshot.
    ///
    /// Returns `None` when the policy has no parameters to save.
    pub fn save<P: Policy + ?Sized>(
        &self,
        policy: &P,
        state: &TrainingState,
    ) -> Result<Option<PathBuf>, CheckpointError> {
        let Some(weights) = policy.persist(&self.config.checkpoint_dir)? else {
            tracing::debug!(policy = policy.name(), "policy has no weights to persist");
            return Ok(None);
        };

        let state_path = weights.with_extension(STATE_EXTENSION);
        fs::write(&state_path, serde_json::to_string_pretty(state)?)?;
        self.prune_old_snapshots()?;

        tracing::info!(
            path = %weights.display(),
            episode = state.episode,
            "checkpoint saved"
        );
        Ok(Some(weights))
    }

    /// List all snapshots, oldest first.
    pub fn list_snapshots(&self) -> Result<Vec<PathBuf>, CheckpointError> {
        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.config.checkpoint_dir)? {
            let path = entry?.path();
            if path.is_file() && is_snapshot(&path) {
                snapshots.push(path);
            }
        }
        // Stems are zero-padded timestamps, so name order is time order.
        snapshots.sort();
        Ok(snapshots)
    }

    /// Path of the newest snapshot.
    pub fn latest_snapshot(&self) -> Result<PathBuf, CheckpointError> {
        self.list_snapshots()?
            .pop()
            .ok_or_else(|| CheckpointError::NoSnapshot(self.config.checkpoint_dir.clone()))
    }

    /// Read the training state saved beside `snapshot`.
    pub fn load_training_state(&self, snapshot: &Path) -> Result<TrainingState, CheckpointError> {
        let path = snapshot.with_extension(STATE_EXTENSION);
        let json = fs::read_to_string(&path).map_err(|e| CheckpointError::MetadataRead {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| CheckpointError::MetadataParse { path, source: e })
    }

    /// Locate the newest snapshot and its training state.
    pub fn load_latest(&self) -> Result<CheckpointData, CheckpointError> {
        let weights = self.latest_snapshot()?;
        let state = self.load_training_state(&weights)?;
        Ok(CheckpointData { weights, state })
    }

    /// Delete all but the newest `keep_last_n` snapshots and their sidecars.
    fn prune_old_snapshots(&self) -> Result<(), CheckpointError> {
        if self.config.keep_last_n == 0 {
            return Ok(());
        }
        let snapshots = self.list_snapshots()?;
        let excess = snapshots.len().saturating_sub(self.config.keep_last_n);
        for path in &snapshots[..excess] {
            fs::remove_file(path)?;
            let sidecar = path.with_extension(STATE_EXTENSION);
            if sidecar.exists() {
                fs::remove_file(sidecar)?;
            }
            tracing::debug!(path = %path.display(), "pruned snapshot");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomPolicy;
    use crate::game::{Action, Board, Direction};
    use chrono::NaiveDate;

    /// Writes an empty snapshot file under a fixed stem.
    struct FixedStemPolicy {
        stem: String,
    }

    impl Policy for FixedStemPolicy {
        fn name(&self) -> &str {
            "Fixed"
        }

        fn select_action(&mut self, _board: &Board) -> (Action, f32) {
            (Action::new(Direction::Up), 0.0)
        }

        fn copy_weights(&mut self, from: &Self) {
            self.stem = from.stem.clone();
        }

        fn persist(&self, dir: &Path) -> Result<Option<PathBuf>, CheckpointError> {
            let path = dir.join(format!("{}.{}", self.stem, SNAPSHOT_EXTENSION));
            fs::write(&path, b"")?;
            Ok(Some(path))
        }
    }

    fn manager(dir: &Path, keep_last_n: usize) -> CheckpointManager {
        CheckpointManager::new(CheckpointManagerConfig {
            checkpoint_dir: dir.to_path_buf(),
            keep_last_n,
        })
    }

    fn state(episode: usize) -> TrainingState {
        TrainingState {
            episode,
            step_count: episode * 10,
            epsilon: 0.5,
            policy: "Fixed".to_string(),
            average_max_tile: 64.0,
        }
    }

    fn policy(stem: &str) -> FixedStemPolicy {
        FixedStemPolicy {
            stem: stem.to_string(),
        }
    }

    #[test]
    fn test_snapshot_stem_format() {
        let time = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 5, 3)
            .unwrap();
        assert_eq!(snapshot_stem(&time), "20261019_080503");
    }

    #[test]
    fn test_is_snapshot() {
        assert!(is_snapshot(Path::new("ckpt/20261019_080503.mpk")));
        assert!(!is_snapshot(Path::new("ckpt/20261019_080503.json")));
        assert!(!is_snapshot(Path::new("ckpt/latest.mpk")));
    }

    #[test]
    fn test_save_writes_snapshot_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 5);

        let path = manager
            .save(&policy("20261019_080503"), &state(100))
            .unwrap()
            .unwrap();
        assert!(path.exists());
        assert!(path.with_extension("json").exists());

        let data = manager.load_latest().unwrap();
        assert_eq!(data.weights, path);
        assert_eq!(data.state, state(100));
    }

    #[test]
    fn test_save_without_weights() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 5);
        let saved = manager.save(&RandomPolicy::new(), &state(1)).unwrap();
        assert!(saved.is_none());
        assert!(manager.list_snapshots().unwrap().is_empty());
    }

    #[test]
    fn test_list_snapshots_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 0);
        for stem in ["20261019_120000", "20250101_000000", "20261019_090000"] {
            manager.save(&policy(stem), &state(1)).unwrap();
        }
        fs::write(dir.path().join("notes.mpk"), b"").unwrap();

        let names: Vec<String> = manager
            .list_snapshots()
            .unwrap()
            .iter()
            .map(|p| p.file_stem().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["20250101_000000", "20261019_090000", "20261019_120000"]
        );
        assert!(manager
            .latest_snapshot()
            .unwrap()
            .ends_with("20261019_120000.mpk"));
    }

    #[test]
    fn test_pruning_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 2);
        let stems = [
            "20261019_080000",
            "20261019_080001",
            "20261019_080002",
            "20261019_080003",
        ];
        for (i, stem) in stems.iter().enumerate() {
            manager.save(&policy(stem), &state(i)).unwrap();
        }

        let list = manager.list_snapshots().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].ends_with("20261019_080002.mpk"));
        assert!(list[1].ends_with("20261019_080003.mpk"));
        assert!(!dir.path().join("20261019_080000.json").exists());
    }

    #[test]
    fn test_latest_without_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 5);
        let err = manager.load_latest().unwrap_err();
        assert!(
            matches!(err, CheckpointError::NoSnapshot(_)),
            "expected NoSnapshot, got: {err}"
        );
    }

    #[test]
    fn test_missing_state_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 5);
        let weights = dir.path().join("20261019_080000.mpk");
        fs::write(&weights, b"").unwrap();

        let err = manager.load_training_state(&weights).unwrap_err();
        assert!(matches!(err, CheckpointError::MetadataRead { .. }));
    }

    #[test]
    fn test_corrupt_state_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 5);
        let weights = dir.path().join("20261019_080000.mpk");
        fs::write(&weights, b"").unwrap();
        fs::write(weights.with_extension("json"), "{ not json").unwrap();

        let err = manager.load_training_state(&weights).unwrap_err();
        assert!(matches!(err, CheckpointError::MetadataParse { .. }));
    }
}
