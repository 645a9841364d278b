use std::fmt;

use crate::error::BoardError;

/// A direction to slide and merge tiles.
///
/// The discriminant is the stable code used to index a policy's output
/// vector, so the order of variants must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// Number of directions (and the width of a policy's output vector).
    pub const COUNT: usize = 4;

    /// Every direction, ordered by code.
    pub const ALL: [Direction; Direction::COUNT] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Integer code in `0..COUNT`.
    pub fn code(self) -> usize {
        self as usize
    }

    /// Look up a direction by its code.
    pub fn from_code(code: usize) -> Option<Direction> {
        Direction::ALL.get(code).copied()
    }

    /// True when the move runs along rows.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True when tiles slide toward the higher index of the line.
    pub fn is_reversed(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }

    /// Get direction name for display
    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl TryFrom<usize> for Direction {
    type Error = BoardError;

    fn try_from(code: usize) -> Result<Self, Self::Error> {
        Direction::from_code(code).ok_or(BoardError::UnknownDirection(code))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
