//! Core 2048 game logic: directions, actions, the board state machine and
//! its builder.

mod action;
mod board;
mod builder;
mod direction;

use std::fmt;

pub use action::Action;
pub use board::{collapse_line, Board, Tile};
pub use builder::{BoardBuilder, BoardConfig};
pub use direction::Direction;

/// Something a policy can consume as numbers and a log can print as text.
pub trait Encode: fmt::Display {
    type Data;

    /// Numeric form handed to a value-function approximator.
    fn data(&self) -> Self::Data;
}
