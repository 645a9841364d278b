use std::fmt;

use rand::Rng;

use super::direction::Direction;
use super::Encode;
use crate::error::BoardError;

/// Value held by a single cell. `Board::EMPTY` marks a free cell.
pub type Tile = u32;

/// Square grid of tiles, stored row-major.
///
/// Non-empty cells always hold `unit` or a value produced by merging two
/// equal tiles, so every tile is `unit * 2^k`.
#[derive(Debug, Clone, Eq)]
pub struct Board {
    size: usize,
    unit: Tile,
    cells: Vec<Tile>,
}

impl Board {
    /// Sentinel for a free cell.
    pub const EMPTY: Tile = 0;

    /// Create an empty board. Callers are expected to go through
    /// `BoardBuilder`, which rejects a zero size or unit.
    pub(crate) fn empty(size: usize, unit: Tile) -> Self {
        Board {
            size,
            unit,
            cells: vec![Board::EMPTY; size * size],
        }
    }

    /// Build a board from explicit rows. Row 0 is the top.
    pub fn from_rows(unit: Tile, rows: &[Vec<Tile>]) -> Result<Self, BoardError> {
        if rows.is_empty() {
            return Err(BoardError::Configuration {
                field: "size",
                reason: "board must have at least one row".into(),
            });
        }
        if unit == 0 {
            return Err(BoardError::Configuration {
                field: "unit",
                reason: "unit must be > 0".into(),
            });
        }
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                return Err(BoardError::ShapeMismatch {
                    expected: size,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }
        Ok(Board { size, unit, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn unit(&self) -> Tile {
        self.unit
    }

    /// Get the tile at a specific position. Row 0 is the top.
    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.cells[row * self.size + col]
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&t| t == Board::EMPTY).count()
    }

    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(Board::EMPTY)
    }

    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|&t| t as u64).sum()
    }

    /// Spawn a `unit` tile on a uniformly chosen empty cell.
    ///
    /// Returns the spawned value, or `Board::EMPTY` (leaving the grid
    /// untouched) when the board has no free cell.
    pub fn seeded<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Tile {
        let free: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, &t)| t == Board::EMPTY)
            .map(|(i, _)| i)
            .collect();
        if free.is_empty() {
            return Board::EMPTY;
        }
        let idx = free[rng.random_range(0..free.len())];
        self.cells[idx] = self.unit;
        self.unit
    }

    /// Slide and merge every line toward `direction`.
    ///
    /// Returns true if any cell changed.
    pub fn collapsed(&mut self, direction: Direction) -> bool {
        let mut changed = false;
        for index in 0..self.size {
            let line = collapse_line(&self.peel(direction, index));
            changed |= self.pave(direction, index, &line);
        }
        changed
    }

    /// True while at least one move could still change the board.
    pub fn is_collapsible(&self) -> bool {
        let n = self.size;
        (0..n).any(|i| {
            (0..n).any(|j| {
                let in_row = self.get(i, j);
                let in_col = self.get(j, i);
                in_row == Board::EMPTY
                    || in_col == Board::EMPTY
                    || (j + 1 < n && (in_row == self.get(i, j + 1) || in_col == self.get(j + 1, i)))
            })
        })
    }

    /// Compare grids, failing if the boards have different dimensions.
    pub fn same_grid(&self, other: &Board) -> Result<bool, BoardError> {
        if self.size != other.size {
            return Err(BoardError::ShapeMismatch {
                expected: self.size,
                found: other.size,
            });
        }
        Ok(self.cells == other.cells)
    }

    /// Cell index of the `offset`-th element of line `index`, in slide order.
    fn cell_index(&self, direction: Direction, index: usize, offset: usize) -> usize {
        let last = self.size - 1;
        let (row, col) = match direction {
            Direction::Left => (index, offset),
            Direction::Right => (index, last - offset),
            Direction::Up => (offset, index),
            Direction::Down => (last - offset, index),
        };
        row * self.size + col
    }

    /// Extract row or column `index` so that sliding toward `direction`
    /// becomes sliding toward offset 0.
    fn peel(&self, direction: Direction, index: usize) -> Vec<Tile> {
        (0..self.size)
            .map(|offset| self.cells[self.cell_index(direction, index, offset)])
            .collect()
    }

    /// Inverse of `peel`. Returns true if any cell changed.
    fn pave(&mut self, direction: Direction, index: usize, line: &[Tile]) -> bool {
        let mut changed = false;
        for (offset, &tile) in line.iter().take(self.size).enumerate() {
            let idx = self.cell_index(direction, index, offset);
            if self.cells[idx] != tile {
                self.cells[idx] = tile;
                changed = true;
            }
        }
        changed
    }
}

/// Slide a line toward index 0, merging equal neighbours once per pass.
///
/// A tile produced by a merge cannot merge again in the same pass, so
/// `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`. Merged values saturate at
/// `Tile::MAX`.
pub fn collapse_line(line: &[Tile]) -> Vec<Tile> {
    let mut collapsed: Vec<Tile> = Vec::with_capacity(line.len());
    let mut just_merged = false;
    for &tile in line.iter().filter(|&&t| t != Board::EMPTY) {
        match collapsed.last_mut() {
            Some(last) if *last == tile && !just_merged => {
                *last = last.saturating_add(tile);
                just_merged = true;
            }
            _ => {
                collapsed.push(tile);
                just_merged = false;
            }
        }
    }
    collapsed.resize(line.len(), Board::EMPTY);
    collapsed
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.cells == other.cells
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.size.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for tile in row {
                write!(f, "{:>4}", tile)?;
            }
        }
        Ok(())
    }
}

impl Encode for Board {
    type Data = Vec<Tile>;

    fn data(&self) -> Vec<Tile> {
        self.cells.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board(rows: &[[Tile; 4]]) -> Board {
        let rows: Vec<Vec<Tile>> = rows.iter().map(|r| r.to_vec()).collect();
        Board::from_rows(2, &rows).unwrap()
    }

    #[test]
    fn test_collapse_line_slides() {
        assert_eq!(collapse_line(&[0, 2, 0, 0]), vec![2, 0, 0, 0]);
    }

    #[test]
    fn test_collapse_line_single_merge() {
        assert_eq!(collapse_line(&[0, 2, 2, 4]), vec![4, 4, 0, 0]);
    }

    #[test]
    fn test_collapse_line_pairwise_merge() {
        assert_eq!(collapse_line(&[2, 2, 2, 2]), vec![4, 4, 0, 0]);
    }

    #[test]
    fn test_collapse_line_no_chain_merge() {
        // The fresh 4 must not absorb the existing 4.
        assert_eq!(collapse_line(&[2, 2, 4, 0]), vec![4, 4, 0, 0]);
        assert_eq!(collapse_line(&[4, 2, 2, 0]), vec![4, 4, 0, 0]);
        assert_eq!(collapse_line(&[2, 2, 2, 0]), vec![4, 2, 0, 0]);
        assert_eq!(collapse_line(&[4, 4, 8, 8]), vec![8, 16, 0, 0]);
    }

    #[test]
    fn test_collapse_line_merges_across_gaps() {
        assert_eq!(collapse_line(&[2, 0, 0, 2]), vec![4, 0, 0, 0]);
    }

    #[test]
    fn test_collapse_line_empty_input() {
        assert!(collapse_line(&[]).is_empty());
    }

    #[test]
    fn test_peel_reversed_row() {
        let b = board(&[[0, 2, 4, 0], [0, 0, 0, 0], [0, 0, 2, 0], [0, 0, 0, 0]]);
        assert_eq!(b.peel(Direction::Right, 0), vec![0, 4, 2, 0]);
        assert_eq!(b.peel(Direction::Left, 0), vec![0, 2, 4, 0]);
    }

    #[test]
    fn test_peel_columns() {
        let b = board(&[[0, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 4, 2, 0]]);
        assert_eq!(b.peel(Direction::Up, 1), vec![2, 0, 0, 4]);
        assert_eq!(b.peel(Direction::Down, 1), vec![4, 0, 0, 2]);
    }

    #[test]
    fn test_peel_then_pave_each_direction() {
        let b = board(&[[2, 4, 8, 16], [32, 64, 128, 256], [2, 0, 4, 0], [0, 8, 0, 2]]);
        for dir in Direction::ALL {
            for index in 0..4 {
                let line = b.peel(dir, index);
                let mut copy = b.clone();
                assert!(!copy.pave(dir, index, &line), "{} line {}", dir, index);
                assert_eq!(copy, b);
            }
        }
        assert_eq!(b.peel(Direction::Down, 0), vec![0, 2, 32, 2]);
        assert_eq!(b.peel(Direction::Right, 1), vec![256, 128, 64, 32]);
    }

    #[test]
    fn test_merge_saturates_at_tile_max() {
        let huge = 1 << 31;
        assert_eq!(collapse_line(&[huge, huge, 2]), vec![Tile::MAX, 2, 0]);

        let mut b = Board::from_rows(huge, &[vec![huge, huge], vec![0, 0]]).unwrap();
        assert!(b.collapsed(Direction::Left));
        assert_eq!(b.cells(), &[Tile::MAX, 0, 0, 0]);
    }

    #[test]
    fn test_large_unit_board_never_overflows() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut b = crate::game::BoardBuilder::new()
            .set_size(2)
            .set_unit(1 << 31)
            .build()
            .unwrap();
        for _ in 0..3 {
            b.seeded(&mut rng);
        }
        for _ in 0..4 {
            for dir in Direction::ALL {
                b.collapsed(dir);
                b.seeded(&mut rng);
            }
        }
        assert!(b.cells().iter().all(|&t| t == Board::EMPTY || t >= 1 << 31));
    }

    #[test]
    fn test_pave_column_up() {
        let mut b = board(&[[0, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 2, 0]]);
        assert!(b.pave(Direction::Up, 2, &[4, 0, 2, 0]));
        let expected = board(&[[0, 2, 4, 0], [0, 0, 0, 0], [0, 0, 2, 0], [0, 0, 0, 0]]);
        assert_eq!(b, expected);
    }

    #[test]
    fn test_pave_reports_unchanged() {
        let mut b = board(&[[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(!b.pave(Direction::Left, 0, &[2, 4, 0, 0]));
    }

    #[test]
    fn test_collapsed_up() {
        let mut b = board(&[[0, 0, 0, 4], [0, 0, 0, 0], [0, 0, 0, 2], [0, 0, 2, 0]]);
        assert!(b.collapsed(Direction::Up));
        let expected = board(&[[0, 0, 2, 4], [0, 0, 0, 2], [0, 0, 0, 0], [0, 0, 0, 0]]);
        assert_eq!(b, expected);
    }

    #[test]
    fn test_collapsed_each_direction() {
        let start = board(&[[2, 2, 0, 4], [0, 0, 0, 0], [2, 0, 0, 4], [0, 0, 0, 0]]);

        let mut left = start.clone();
        assert!(left.collapsed(Direction::Left));
        assert_eq!(left, board(&[[4, 4, 0, 0], [0; 4], [2, 4, 0, 0], [0; 4]]));

        let mut right = start.clone();
        assert!(right.collapsed(Direction::Right));
        assert_eq!(right, board(&[[0, 0, 4, 4], [0; 4], [0, 0, 2, 4], [0; 4]]));

        let mut up = start.clone();
        assert!(up.collapsed(Direction::Up));
        assert_eq!(up, board(&[[4, 2, 0, 8], [0; 4], [0; 4], [0; 4]]));

        let mut down = start.clone();
        assert!(down.collapsed(Direction::Down));
        assert_eq!(down, board(&[[0; 4], [0; 4], [0; 4], [4, 2, 0, 8]]));
    }

    #[test]
    fn test_collapsed_right_merges_from_leading_edge() {
        let mut b = board(&[[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);
        b.collapsed(Direction::Right);
        assert_eq!(b, board(&[[0, 0, 2, 4], [0; 4], [0; 4], [0; 4]]));
    }

    #[test]
    fn test_collapsed_twice_is_noop() {
        let mut b = board(&[[0, 2, 0, 4], [8, 0, 8, 0], [2, 4, 8, 16], [0, 0, 0, 2]]);
        assert!(b.collapsed(Direction::Left));
        let snapshot = b.clone();
        assert!(!b.collapsed(Direction::Left));
        assert_eq!(b, snapshot);
    }

    #[test]
    fn test_second_collapse_only_merges() {
        let b = board(&[[2, 2, 2, 2], [4, 0, 4, 0], [0, 8, 0, 8], [2, 4, 8, 16]]);
        for dir in Direction::ALL {
            let mut once = b.clone();
            once.collapsed(dir);
            let free = once.empty_count();
            let snapshot = once.clone();
            if once.collapsed(dir) {
                assert!(once.empty_count() > free, "second collapse {} only slid", dir);
            } else {
                assert_eq!(once, snapshot);
            }
        }
        // [4, 4, 0, 0] still merges on the second pass.
        let mut row = board(&[[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]);
        row.collapsed(Direction::Left);
        assert!(row.collapsed(Direction::Left));
        assert_eq!(row.get(0, 0), 8);
    }

    #[test]
    fn test_collapsed_unchanged_returns_false() {
        let mut b = board(&[[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(!b.collapsed(Direction::Left));
        assert!(!b.collapsed(Direction::Up));
        assert!(b.collapsed(Direction::Right));
    }

    #[test]
    fn test_seeded_places_unit_tile() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut b = Board::empty(4, 2);
        let before = b.empty_count();
        assert_eq!(b.seeded(&mut rng), 2);
        assert_eq!(b.empty_count(), before - 1);
        assert_eq!(b.tile_sum(), 2);
    }

    #[test]
    fn test_seeded_full_board_is_noop() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut b = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let before = b.clone();
        assert_eq!(b.seeded(&mut rng), Board::EMPTY);
        assert_eq!(b, before);
    }

    #[test]
    fn test_seeded_fills_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut b = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 0, 4], [4, 2, 4, 2]]);
        assert_eq!(b.seeded(&mut rng), 2);
        assert_eq!(b.get(2, 2), 2);
        assert_eq!(b.empty_count(), 0);
    }

    #[test]
    fn test_is_collapsible_with_empty_cell() {
        let b = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 0, 4], [4, 2, 4, 2]]);
        assert!(b.is_collapsible());
    }

    #[test]
    fn test_is_collapsible_with_row_pair() {
        let b = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 2, 8]]);
        assert!(b.is_collapsible());
    }

    #[test]
    fn test_is_collapsible_with_column_pair() {
        let b = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 8], [4, 2, 4, 8]]);
        assert!(b.is_collapsible());
    }

    #[test]
    fn test_is_not_collapsible_when_stuck() {
        let b = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!b.is_collapsible());
        for dir in Direction::ALL {
            assert!(!b.clone().collapsed(dir));
        }
    }

    #[test]
    fn test_single_cell_board() {
        let mut b = Board::from_rows(2, &[vec![0]]).unwrap();
        assert!(b.is_collapsible());
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(b.seeded(&mut rng), 2);
        assert!(!b.is_collapsible());
        assert!(!b.collapsed(Direction::Left));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = board(&[[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.collapsed(Direction::Left);
        copy.seeded(&mut StdRng::seed_from_u64(9));
        assert_ne!(copy, original);
        assert_eq!(original.get(0, 0), 2);
        assert_eq!(original.get(0, 1), 2);
    }

    #[test]
    fn test_same_grid_rejects_mismatched_sizes() {
        let a = board(&[[0; 4]; 4]);
        let b = Board::from_rows(2, &[vec![0, 0], vec![0, 0]]).unwrap();
        assert!(matches!(
            a.same_grid(&b),
            Err(BoardError::ShapeMismatch { expected: 4, found: 2 })
        ));
        assert!(a.same_grid(&a.clone()).unwrap());
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Board::from_rows(2, &[vec![0, 0], vec![0]]).unwrap_err();
        assert!(matches!(err, BoardError::ShapeMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_display_fixed_width() {
        let b = Board::from_rows(2, &[vec![0, 2], vec![1024, 16]]).unwrap();
        assert_eq!(b.to_string(), "   0   2\n1024  16");
    }

    #[test]
    fn test_encode_is_row_major() {
        let b = Board::from_rows(2, &[vec![0, 2], vec![4, 8]]).unwrap();
        assert_eq!(b.data(), vec![0, 2, 4, 8]);
        assert_eq!(b.cells(), &[0, 2, 4, 8]);
    }

    #[test]
    fn test_max_tile_and_sum() {
        let b = board(&[[2, 0, 0, 0], [0, 32, 0, 0], [0; 4], [0, 0, 0, 4]]);
        assert_eq!(b.max_tile(), 32);
        assert_eq!(b.tile_sum(), 38);
        assert_eq!(b.empty_count(), 13);
    }
}
