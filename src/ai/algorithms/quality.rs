use std::fs;
use std::path::{Path, PathBuf};

use burn::backend::{Autodiff, NdArray};
use burn::module::AutodiffModule;
use burn::optim::adaptor::OptimizerAdaptor;
use burn::optim::{Adam, AdamConfig, GradientsParams, Optimizer, Sgd, SgdConfig};
use burn::prelude::*;
use burn::record::DefaultRecorder;
use burn::tensor::TensorData;
use chrono::Local;

use crate::ai::networks::{QualityNetwork, QualityNetworkConfig};
use crate::ai::policy::{Experience, Policy, UpdateMetrics};
use crate::ai::state_encoding::{encode_board, encode_boards_batch};
use crate::checkpoint::{snapshot_stem, SNAPSHOT_EXTENSION};
use crate::error::CheckpointError;
use crate::game::{Action, Board, Direction};

type InferBackend = NdArray<f32>;
type TrainBackend = Autodiff<InferBackend>;

/// Gradient-descent rule used by `QualityPolicy::learn`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    #[default]
    Adam,
    Sgd,
}

/// Value-network hyperparameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub learning_rate: f64,
    pub optimizer: OptimizerKind,
    pub first_hidden: usize,
    pub second_hidden: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        QualityConfig {
            learning_rate: 1e-3,
            optimizer: OptimizerKind::Adam,
            first_hidden: 64,
            second_hidden: 32,
        }
    }
}

enum QualityOptimizer {
    Adam(OptimizerAdaptor<Adam, QualityNetwork<TrainBackend>, TrainBackend>),
    Sgd(OptimizerAdaptor<Sgd<InferBackend>, QualityNetwork<TrainBackend>, TrainBackend>),
}

impl QualityOptimizer {
    fn new(kind: OptimizerKind) -> Self {
        match kind {
            OptimizerKind::Adam => QualityOptimizer::Adam(AdamConfig::new().init()),
            OptimizerKind::Sgd => QualityOptimizer::Sgd(SgdConfig::new().init()),
        }
    }

    fn step(
        &mut self,
        lr: f64,
        network: QualityNetwork<TrainBackend>,
        grads: GradientsParams,
    ) -> QualityNetwork<TrainBackend> {
        match self {
            QualityOptimizer::Adam(optim) => optim.step(lr, network, grads),
            QualityOptimizer::Sgd(optim) => optim.step(lr, network, grads),
        }
    }
}

/// Policy backed by an MLP that estimates one value per direction.
///
/// The network's input width is fixed at construction, so every board
/// passed in must have the `board_size` given to `new`.
pub struct QualityPolicy {
    network: QualityNetwork<TrainBackend>,
    optimizer: QualityOptimizer,
    net_config: QualityNetworkConfig,
    config: QualityConfig,
    device: <TrainBackend as Backend>::Device,
}

impl QualityPolicy {
    pub fn new(config: QualityConfig, board_size: usize) -> Self {
        let device = Default::default();
        let net_config = QualityNetworkConfig::new(board_size * board_size, Direction::COUNT)
            .with_first_hidden(config.first_hidden)
            .with_second_hidden(config.second_hidden);
        let network: QualityNetwork<TrainBackend> = net_config.init(&device);
        let optimizer = QualityOptimizer::new(config.optimizer);

        QualityPolicy {
            network,
            optimizer,
            net_config,
            config,
            device,
        }
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Estimated value of each direction, indexed by direction code.
    pub fn q_values(&self, board: &Board) -> Vec<f32> {
        let input = encode_board::<InferBackend>(board, &self.device);
        self.network
            .valid()
            .forward(input)
            .into_data()
            .to_vec()
            .expect("f32 tensor data extraction")
    }

    /// Save network weights to `path` (burn appends the `.mpk` extension).
    pub fn save_weights(&self, path: &Path) -> Result<(), CheckpointError> {
        let recorder = DefaultRecorder::default();
        self.network
            .clone()
            .valid()
            .save_file(path.to_path_buf(), &recorder)
            .map_err(|e| CheckpointError::ModelSave(e.to_string()))
    }

    /// Build a policy whose network shape comes from `config`, then load a
    /// snapshot into it. The snapshot must have been trained with the same
    /// hidden sizes and board size.
    pub fn from_snapshot(
        config: QualityConfig,
        board_size: usize,
        path: &Path,
    ) -> Result<Self, CheckpointError> {
        let mut policy = Self::new(config, board_size);
        policy.load_weights(path)?;
        Ok(policy)
    }

    /// Load network weights from a snapshot written by `save_weights` or `persist`.
    pub fn load_weights(&mut self, path: &Path) -> Result<(), CheckpointError> {
        let recorder = DefaultRecorder::default();
        let network: QualityNetwork<TrainBackend> = self
            .net_config
            .init(&self.device)
            .load_file(path.to_path_buf(), &recorder, &self.device)
            .map_err(|e| CheckpointError::ModelLoad(e.to_string()))?;
        self.network = network;
        Ok(())
    }
}

impl Policy for QualityPolicy {
    fn name(&self) -> &str {
        "Quality"
    }

    fn select_action(&mut self, board: &Board) -> (Action, f32) {
        let q_values = self.q_values(board);

        // First maximum wins ties.
        let mut best = 0;
        let mut best_q = f32::NEG_INFINITY;
        for (code, &q) in q_values.iter().enumerate().take(Direction::COUNT) {
            if q > best_q {
                best_q = q;
                best = code;
            }
        }
        (Action::new(Direction::ALL[best]), best_q)
    }

    /// Regress the taken action's output toward the experience value, keeping
    /// the other outputs at their current predictions.
    fn learn(&mut self, batch: &[Experience]) -> UpdateMetrics {
        if batch.is_empty() {
            return UpdateMetrics::default();
        }
        let batch_size = batch.len();

        let boards: Vec<&Board> = batch.iter().map(|e| &e.state).collect();
        let inputs = encode_boards_batch::<TrainBackend>(&boards, &self.device);
        let predicted = self.network.forward(inputs); // [B, 4]

        let mut target_data: Vec<f32> = predicted
            .clone()
            .into_data()
            .to_vec()
            .expect("f32 tensor data extraction");
        for (i, exp) in batch.iter().enumerate() {
            target_data[i * Direction::COUNT + exp.action.data()] = exp.value;
        }
        let targets = Tensor::<TrainBackend, 1>::from_data(
            TensorData::from(target_data.as_slice()),
            &self.device,
        )
        .reshape([batch_size as i32, Direction::COUNT as i32]);

        // MSE loss
        let diff = predicted - targets;
        let loss = (diff.clone() * diff).mean();

        let loss_val: f32 = loss
            .clone()
            .into_data()
            .to_vec::<f32>()
            .expect("f32 loss tensor extraction")[0];

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.network);
        self.network = self
            .optimizer
            .step(self.config.learning_rate, self.network.clone(), grads);

        UpdateMetrics { loss: loss_val }
    }

    fn copy_weights(&mut self, from: &Self) {
        self.network = from.network.clone();
    }

    fn persist(&self, dir: &Path) -> Result<Option<PathBuf>, CheckpointError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(snapshot_stem(&Local::now().naive_local()));
        self.save_weights(&path)?;
        Ok(Some(path.with_extension(SNAPSHOT_EXTENSION)))
    }
}
