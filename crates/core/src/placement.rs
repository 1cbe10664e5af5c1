//! Placement engine - fit test, commit, and row/column clearing
//!
//! All functions are pure: they take a board by reference and hand back a new
//! board value. The caller keeps the "before" board untouched, which the
//! session relies on to show the committed board while a clear is pending.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::shapes::Shape;
use crate::types::{Point, GRID_SIZE};

/// Indices of cleared lines, ascending
pub type LineIndices = ArrayVec<u8, GRID_SIZE>;

/// Result of [`detect_and_clear_lines`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClear {
    /// Board with every cleared row and column emptied
    pub board: Board,
    pub rows: LineIndices,
    pub cols: LineIndices,
}

impl LineClear {
    /// Rows plus columns cleared
    pub fn total_lines(&self) -> u32 {
        (self.rows.len() + self.cols.len()) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

/// Can `shape` be anchored at `at` without leaving the board or overlapping a
/// filled cell?
pub fn fits(board: &Board, shape: &Shape, at: Point) -> bool {
    shape
        .cells()
        .all(|(dr, dc)| board.is_empty_at(at.row + dr, at.col + dc))
}

/// Write `shape` onto a copy of `board` at `at`.
///
/// The caller must have checked [`fits`]; cells that would land off the board
/// are skipped rather than re-validated.
pub fn commit(board: &Board, shape: &Shape, at: Point) -> Board {
    let mut next = *board;
    let color = shape.color();
    for (dr, dc) in shape.cells() {
        next.set(at.row + dr, at.col + dc, Some(color));
    }
    next
}

/// Find every full row and column and empty them all at once.
///
/// A cell where a cleared row crosses a cleared column is emptied once. When
/// nothing is full the returned board equals the input.
pub fn detect_and_clear_lines(board: &Board) -> LineClear {
    let mut rows = LineIndices::new();
    let mut cols = LineIndices::new();

    for i in 0..GRID_SIZE {
        if board.is_row_full(i) {
            rows.push(i as u8);
        }
        if board.is_col_full(i) {
            cols.push(i as u8);
        }
    }

    let mut next = *board;
    for &r in &rows {
        next.clear_row(r as usize);
    }
    for &c in &cols {
        next.clear_col(c as usize);
    }

    LineClear {
        board: next,
        rows,
        cols,
    }
}
