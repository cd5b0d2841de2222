use std::fmt;

use thiserror::Error;

use crate::PatternOffset;
use crate::cell::Cell;
use crate::pattern::Pattern;
use crate::rule_set::B3S23;

pub const ROWS: usize = 10;
pub const COLUMNS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Cell ({row}, {column}) lies outside the grid")]
    OutOfBounds {
        row: PatternOffset,
        column: PatternOffset,
    },
}

/// The board: a fixed `ROWS` x `COLUMNS` torus.
///
/// Row `0` is adjacent to row `ROWS - 1` and column `0` to column `COLUMNS - 1`, so every cell has
/// exactly eight neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [[Cell; COLUMNS]; ROWS],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Create a grid where every cell is dead
    pub fn new() -> Self {
        let cells =
            std::array::from_fn(|row| std::array::from_fn(|column| Cell::dead(row, column)));

        Self { cells }
    }

    /// Seed a new grid with every cell of `pattern`.
    pub fn from_pattern(pattern: &Pattern) -> Result<Self, GridError> {
        let mut grid = Self::new();

        for &(row, column) in pattern.cells() {
            let out_of_bounds = GridError::OutOfBounds { row, column };

            let (Ok(r), Ok(c)) = (usize::try_from(row), usize::try_from(column)) else {
                return Err(out_of_bounds);
            };

            grid.set(r, c).map_err(|_| out_of_bounds)?;
        }

        Ok(grid)
    }

    /// Bring the cell at (`row`, `column`) to life.
    pub fn set(&mut self, row: usize, column: usize) -> Result<(), GridError> {
        if row >= ROWS || column >= COLUMNS {
            return Err(GridError::OutOfBounds {
                row: PatternOffset::try_from(row).unwrap_or(PatternOffset::MAX),
                column: PatternOffset::try_from(column).unwrap_or(PatternOffset::MAX),
            });
        }

        self.cells[row][column].revive();

        Ok(())
    }

    /// # Panics
    /// If (`row`, `column`) is outside the grid.
    pub fn is_alive(&self, row: usize, column: usize) -> bool {
        self.cells[row][column].is_alive()
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    /// Positions of the live cells, row by row.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells()
            .filter(|cell| cell.is_alive())
            .map(|cell| (cell.row, cell.column))
    }

    pub fn population(&self) -> usize {
        self.cells().filter(|cell| cell.is_alive()).count()
    }

    /// Count the live neighbors of (`row`, `column`), wrapping around the edges.
    pub fn count_alive_neighbors(&self, row: usize, column: usize) -> u8 {
        // Adding `len - 1` is subtracting one, modulo `len`
        let row_offsets = [ROWS - 1, 0, 1];
        let column_offsets = [COLUMNS - 1, 0, 1];

        let mut count = 0;

        for dr in row_offsets {
            for dc in column_offsets {
                if dr == 0 && dc == 0 {
                    continue;
                }

                let r = (row + dr) % ROWS;
                let c = (column + dc) % COLUMNS;

                if self.cells[r][c].is_alive() {
                    count += 1;
                }
            }
        }

        count
    }

    /// Compute every cell's next generation from the current one. Current states are left
    /// untouched until [`Grid::swap_generation`].
    pub fn compute_next_generation(&mut self) {
        for row in 0..ROWS {
            for column in 0..COLUMNS {
                let neighbors = self.count_alive_neighbors(row, column);

                let cell = &mut self.cells[row][column];
                let alive = B3S23.next_state(cell.is_alive(), neighbors);

                cell.set_next_gen(alive);
            }
        }
    }

    /// Commit every cell's next generation. Returns the resulting population.
    pub fn swap_generation(&mut self) -> usize {
        let mut population = 0;

        for cell in self.cells.iter_mut().flatten() {
            cell.swap_generation();

            if cell.is_alive() {
                population += 1;
            }
        }

        population
    }

    /// Advance by one generation. Returns the resulting population.
    pub fn step(&mut self) -> usize {
        self.compute_next_generation();
        self.swap_generation()
    }
}

/// One line per row, `#` for live cells and `.` for dead ones.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }

            for cell in row {
                let c = if cell.is_alive() { '#' } else { '.' };
                write!(f, "{c}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::COLUMNS;
    use super::Grid;
    use super::GridError;
    use super::ROWS;

    fn grid_of(cells: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new();

        for &(row, column) in cells {
            grid.set(row, column).unwrap();
        }

        grid
    }

    #[test]
    fn new_grid_is_dead() {
        let grid = Grid::new();

        assert_eq!(grid.population(), 0);
        assert_eq!(grid.cells().count(), ROWS * COLUMNS);
    }

    #[test]
    fn cells_know_their_position() {
        let grid = Grid::new();

        for (i, cell) in grid.cells().enumerate() {
            assert_eq!((cell.row, cell.column), (i / COLUMNS, i % COLUMNS));
        }
    }

    #[test]
    fn set_out_of_bounds() {
        let mut grid = Grid::new();

        assert_eq!(
            grid.set(ROWS, 0),
            Err(GridError::OutOfBounds { row: 10, column: 0 })
        );
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn set_far_out_of_bounds() {
        let mut grid = Grid::new();

        assert_eq!(
            grid.set(usize::MAX, 3),
            Err(GridError::OutOfBounds {
                row: i64::MAX,
                column: 3
            })
        );
    }

    #[test]
    fn neighbors_interior() {
        let grid = grid_of(&[(4, 4), (4, 5), (5, 5), (6, 6)]);

        assert_eq!(grid.count_alive_neighbors(5, 5), 3);
        assert_eq!(grid.count_alive_neighbors(4, 4), 2);
        assert_eq!(grid.count_alive_neighbors(0, 0), 0);
    }

    #[test]
    fn neighbors_wrap_corners() {
        // The four corners are mutual neighbors on a torus
        let grid = grid_of(&[(0, 0), (0, 9), (9, 0), (9, 9)]);

        for (row, column) in [(0, 0), (0, 9), (9, 0), (9, 9)] {
            assert_eq!(grid.count_alive_neighbors(row, column), 3);
        }
    }

    #[test]
    fn neighbors_wrap_edges() {
        let grid = grid_of(&[(0, 4), (0, 5), (0, 6)]);

        // Row 9 sees row 0 directly below it
        assert_eq!(grid.count_alive_neighbors(9, 5), 3);
        assert_eq!(grid.count_alive_neighbors(9, 3), 1);

        let grid = grid_of(&[(3, 9), (4, 9), (5, 9)]);

        // Column 0 sees column 9 directly to its left
        assert_eq!(grid.count_alive_neighbors(4, 0), 3);
        assert_eq!(grid.count_alive_neighbors(6, 0), 1);
    }

    #[test]
    fn next_generation_reads_snapshot() {
        // A blinker only oscillates if no cell sees a half-updated row
        let mut grid = grid_of(&[(5, 4), (5, 5), (5, 6)]);

        grid.compute_next_generation();
        assert_eq!(grid.population(), 3);
        assert!(grid.is_alive(5, 4));

        assert_eq!(grid.swap_generation(), 3);
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), [(4, 5), (5, 5), (6, 5)]);

        grid.step();
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), [(5, 4), (5, 5), (5, 6)]);
    }

    #[test]
    fn block_is_still() {
        let mut grid = grid_of(&[(0, 0), (0, 9), (9, 0), (9, 9)]);
        let before: Vec<_> = grid.live_cells().collect();

        assert_eq!(grid.step(), 4);
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), before);
    }

    #[test]
    fn lonely_cell_dies() {
        let mut grid = grid_of(&[(3, 3)]);

        assert_eq!(grid.step(), 0);
    }

    #[test]
    fn crowded_cell_dies() {
        // The centre has four neighbors
        let mut grid = grid_of(&[(5, 5), (4, 4), (4, 6), (6, 4), (6, 6)]);

        grid.step();

        assert!(!grid.is_alive(5, 5));
    }

    #[test]
    fn display() {
        let grid = grid_of(&[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]);

        insta::assert_snapshot!(grid.to_string(), @r"
        .#........
        ..#.......
        ###.......
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ");
    }
}
