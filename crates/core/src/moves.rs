//! Move validator - exhaustive "can anything still be placed?" search

use crate::board::Board;
use crate::offer::Offer;
use crate::placement::fits;
use crate::shapes::Shape;
use crate::types::{Point, GRID_SIZE};

/// Every anchor on the board where `shape` fits, row-major
pub fn anchors<'a>(board: &'a Board, shape: &'a Shape) -> impl Iterator<Item = Point> + 'a {
    (0..GRID_SIZE as i32)
        .flat_map(|row| (0..GRID_SIZE as i32).map(move |col| Point::new(row, col)))
        .filter(move |&at| fits(board, shape, at))
}

/// Whether `shape` fits at any anchor on the board
pub fn fits_anywhere(board: &Board, shape: &Shape) -> bool {
    anchors(board, shape).next().is_some()
}

/// Whether any shape left in `offer` fits anywhere.
///
/// An exhausted offer counts as playable: it is waiting for a refill, which is
/// checked separately once the new shapes arrive.
pub fn has_valid_move(board: &Board, offer: &Offer) -> bool {
    if offer.is_exhausted() {
        return true;
    }
    offer.shapes().any(|shape| fits_anywhere(board, shape))
}
