use rand::Rng;

use super::board::{Board, Tile};
use crate::error::BoardError;

/// Fluent constructor for an empty `Board`.
#[derive(Debug, Clone, Default)]
pub struct BoardBuilder {
    size: usize,
    unit: Tile,
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows (and columns).
    pub fn set_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Value of a freshly spawned tile. Every other tile is a power-of-two
    /// multiple of it.
    pub fn set_unit(mut self, unit: Tile) -> Self {
        self.unit = unit;
        self
    }

    /// Build an all-empty board.
    pub fn build(&self) -> Result<Board, BoardError> {
        if self.size == 0 {
            return Err(BoardError::Configuration {
                field: "size",
                reason: "size must be > 0".into(),
            });
        }
        if self.unit == 0 {
            return Err(BoardError::Configuration {
                field: "unit",
                reason: "unit must be > 0".into(),
            });
        }
        Ok(Board::empty(self.size, self.unit))
    }
}

/// Board parameters, loadable from the `[board]` TOML section.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub size: usize,
    pub unit: Tile,
    /// Tiles seeded before the first move of an episode.
    pub initial_tiles: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            size: 4,
            unit: 2,
            initial_tiles: 2,
        }
    }
}

impl BoardConfig {
    pub fn builder(&self) -> BoardBuilder {
        BoardBuilder::new().set_size(self.size).set_unit(self.unit)
    }

    /// Build a board and seed `initial_tiles` tiles on it.
    pub fn new_episode_board<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Board, BoardError> {
        let mut board = self.builder().build()?;
        for _ in 0..self.initial_tiles {
            if board.seeded(rng) == Board::EMPTY {
                break;
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_build_empty_board() {
        let board = BoardBuilder::new().set_size(5).set_unit(3).build().unwrap();
        assert_eq!(board.size(), 5);
        assert_eq!(board.unit(), 3);
        assert_eq!(board.cells().len(), 25);
        assert_eq!(board.empty_count(), 25);
    }

    #[test]
    fn test_builder_rejects_zero_size() {
        let err = BoardBuilder::new().set_unit(2).build().unwrap_err();
        assert!(matches!(err, BoardError::Configuration { field: "size", .. }));
    }

    #[test]
    fn test_builder_rejects_zero_unit() {
        let err = BoardBuilder::new().set_size(4).build().unwrap_err();
        assert!(matches!(err, BoardError::Configuration { field: "unit", .. }));
    }

    #[test]
    fn test_builder_is_reusable() {
        let builder = BoardBuilder::new().set_size(2).set_unit(2);
        let mut a = builder.build().unwrap();
        let b = builder.build().unwrap();
        a.seeded(&mut StdRng::seed_from_u64(0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_episode_board_is_seeded() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = BoardConfig::default();
        let board = config.new_episode_board(&mut rng).unwrap();
        assert_eq!(board.empty_count(), 14);
        assert_eq!(board.tile_sum(), 4);
    }

    #[test]
    fn test_episode_board_stops_when_full() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = BoardConfig {
            size: 1,
            unit: 2,
            initial_tiles: 3,
        };
        let board = config.new_episode_board(&mut rng).unwrap();
        assert_eq!(board.cells(), &[2]);
    }
}
