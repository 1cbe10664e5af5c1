use crate::board::Board;
use crate::offer::Offer;
use crate::placement::LineIndices;
use crate::types::{Point, PopupKind};

/// Rows and columns that are full and waiting to be emptied
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClearingLines {
    pub rows: LineIndices,
    pub cols: LineIndices,
}

impl ClearingLines {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }

    /// Whether board cell (row, col) lies on a line being cleared
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.rows.iter().any(|&r| r as usize == row) || self.cols.iter().any(|&c| c as usize == col)
    }
}

/// Floating text shown over the board for a short time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub id: u32,
    pub at: Point,
    pub text: String,
    pub kind: PopupKind,
    /// Time left before the popup expires
    pub remaining_ms: u32,
}

/// Read-only view of a session for the render layer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub board: Board,
    pub offer: Offer,
    pub score: u32,
    pub high_score: u32,
    pub combo: u32,
    pub game_over: bool,
    pub busy: bool,
    pub clearing: ClearingLines,
    pub popups: Vec<Popup>,
    pub episode_id: u32,
    pub offer_batches: u32,
}

impl SessionSnapshot {
    /// Whether a placement attempt could currently be accepted
    pub fn playable(&self) -> bool {
        !self.game_over && !self.busy
    }
}
