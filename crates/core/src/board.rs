//! Board module - the 8x8 game grid
//!
//! The board is an 8x8 grid where each cell is empty or holds a color token.
//! Uses a flat array for cache locality; boards are small `Copy` values so the
//! placement engine can hand out fresh boards instead of mutating in place.
//! Coordinates: (row, col), row 0 at the top, col 0 at the left.

use crate::types::{Cell, Color, GRID_SIZE};

/// Total number of cells on the board
pub const BOARD_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// The game board - 8 rows x 8 columns using flat array storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (row * GRID_SIZE + col)
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_CELLS],
        }
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(row: i32, col: i32) -> Option<usize> {
        if row < 0 || row >= GRID_SIZE as i32 || col < 0 || col >= GRID_SIZE as i32 {
            return None;
        }
        Some((row as usize) * GRID_SIZE + (col as usize))
    }

    /// Side length of the board
    pub fn size(&self) -> usize {
        GRID_SIZE
    }

    /// Get cell at (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col)
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and empty
    pub fn is_empty_at(&self, row: i32, col: i32) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        matches!(self.get(row, col), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= GRID_SIZE {
            return false;
        }
        let start = row * GRID_SIZE;
        self.cells[start..start + GRID_SIZE]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Check if a column is completely filled
    pub fn is_col_full(&self, col: usize) -> bool {
        if col >= GRID_SIZE {
            return false;
        }
        (0..GRID_SIZE).all(|row| self.cells[row * GRID_SIZE + col].is_some())
    }

    /// Empty every cell of a row
    pub fn clear_row(&mut self, row: usize) {
        if row >= GRID_SIZE {
            return;
        }
        let start = row * GRID_SIZE;
        self.cells[start..start + GRID_SIZE].fill(None);
    }

    /// Empty every cell of a column
    pub fn clear_col(&mut self, col: usize) {
        if col >= GRID_SIZE {
            return;
        }
        for row in 0..GRID_SIZE {
            self.cells[row * GRID_SIZE + col] = None;
        }
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Whether no cell is filled
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(GRID_SIZE)
    }

    /// Build a board from text rows: `.` is empty, any other character is
    /// filled with `fill`.
    ///
    /// Returns `None` unless there are exactly 8 rows of 8 characters.
    ///
    /// ```
    /// use block_blast_core::Board;
    /// use block_blast_core::types::Color;
    ///
    /// let board = Board::from_rows(
    ///     &[
    ///         "########",
    ///         "........",
    ///         "........",
    ///         "........",
    ///         "........",
    ///         "........",
    ///         "........",
    ///         "#.......",
    ///     ],
    ///     Color::Red,
    /// )
    /// .unwrap();
    /// assert!(board.is_row_full(0));
    /// assert_eq!(board.filled_count(), 9);
    /// ```
    pub fn from_rows(rows: &[&str], fill: Color) -> Option<Self> {
        if rows.len() != GRID_SIZE {
            return None;
        }
        let mut board = Self::new();
        for (r, line) in rows.iter().enumerate() {
            if line.chars().count() != GRID_SIZE {
                return None;
            }
            for (c, ch) in line.chars().enumerate() {
                if ch != '.' {
                    board.cells[r * GRID_SIZE + c] = Some(fill);
                }
            }
        }
        Some(board)
    }

    /// Create from a 2D array (rows of cells)
    pub fn from_grid(grid: [[Cell; GRID_SIZE]; GRID_SIZE]) -> Self {
        let mut cells = [None; BOARD_CELLS];
        for (r, row) in grid.iter().enumerate() {
            cells[r * GRID_SIZE..(r + 1) * GRID_SIZE].copy_from_slice(row);
        }
        Self { cells }
    }

    /// Convert to a 2D array of cells
    pub fn to_grid(&self) -> [[Cell; GRID_SIZE]; GRID_SIZE] {
        let mut grid = [[None; GRID_SIZE]; GRID_SIZE];
        for (r, row) in self.rows().enumerate() {
            grid[r].copy_from_slice(row);
        }
        grid
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
