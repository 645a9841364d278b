//! Policies that choose moves: the `Policy` trait, a uniform random policy,
//! and a value-network policy with its board encoding.

pub mod algorithms;
pub mod networks;
mod policy;
mod random;
pub mod state_encoding;

pub use algorithms::{OptimizerKind, QualityConfig, QualityPolicy};
pub use networks::{QualityNetwork, QualityNetworkConfig};
pub use policy::{Experience, Policy, UpdateMetrics};
pub use random::RandomPolicy;
