//! Training infrastructure: episode runner, replay buffer, rolling metrics,
//! and the DQN-style trainer that ties them to a pair of policies.

pub mod episode;
pub mod metrics;
pub mod replay_buffer;
pub mod trainer;
