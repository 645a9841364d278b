//! # DQN 2048
//!
//! A 2048 board engine with a deep Q-learning training loop built on the Burn
//! ML framework.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: direction, action, board, builder
//! - [`ai`]: Policy trait, random and value-network policies, state encoding
//! - [`training`]: Episode runner, replay buffer, metrics, trainer
//! - [`checkpoint`]: Timestamped weight snapshots and training state
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types
//!
//! Quick start:
//! ```
//! use dqn_2048::game::{BoardBuilder, Direction};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut board = BoardBuilder::new().set_size(4).set_unit(2).build().unwrap();
//! board.seeded(&mut rng);
//! board.seeded(&mut rng);
//! board.collapsed(Direction::Left);
//! assert!(board.is_collapsible());
//! ```

#![recursion_limit = "256"]

pub mod ai;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
pub mod training;
