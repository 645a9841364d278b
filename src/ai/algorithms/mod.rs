mod quality;

pub use quality::{OptimizerKind, QualityConfig, QualityPolicy};
