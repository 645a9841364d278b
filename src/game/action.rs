use std::fmt;

use rand::Rng;

use super::direction::Direction;
use super::Encode;

/// A move chosen by a policy: one of the four directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    direction: Direction,
}

impl Action {
    pub fn new(direction: Direction) -> Self {
        Action { direction }
    }

    /// Draw a direction uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = rng.random_range(0..Direction::COUNT);
        Action::new(Direction::ALL[code])
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Integer code of the wrapped direction, usable as an output-vector index.
    pub fn data(&self) -> usize {
        self.direction.code()
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::new(direction)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.direction.fmt(f)
    }
}

impl Encode for Action {
    type Data = usize;

    fn data(&self) -> usize {
        Action::data(self)
    }
}
