//! Keyboard cursor: pick a tray shape, then steer it over the board.
//!
//! The cursor has two modes. In tray mode Left/Right cycle through the
//! non-empty tray slots and Confirm picks the selected shape. In grid mode the
//! directions move the anchor over the board and Confirm asks the session to
//! place the shape there. A rejected placement starts a short shake.

use block_blast_core::{Offer, Session};
use log::debug;

use crate::types::{InputAction, Point, GRID_SIZE, OFFER_SLOTS, SHAKE_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    Tray,
    Grid,
}

/// A placement the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceRequest {
    pub slot: usize,
    pub at: Point,
}

/// What an action did to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorEvent {
    Ignored,
    Moved,
    Place(PlaceRequest),
    Restart,
}

#[derive(Debug, Clone)]
pub struct KeyboardCursor {
    mode: CursorMode,
    slot: usize,
    at: Point,
    shake_ms: u32,
}

impl KeyboardCursor {
    pub fn new() -> Self {
        let mid = (GRID_SIZE / 2) as i32 - 1;
        Self {
            mode: CursorMode::Tray,
            slot: 0,
            at: Point::new(mid, mid),
            shake_ms: 0,
        }
    }

    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    /// Selected tray slot
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Anchor of the shape in grid mode
    pub fn position(&self) -> Point {
        self.at
    }

    pub fn shaking(&self) -> bool {
        self.shake_ms > 0
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance the shake timer.
    pub fn update(&mut self, elapsed_ms: u32) {
        self.shake_ms = self.shake_ms.saturating_sub(elapsed_ms);
    }

    /// Move the selection off a used slot onto the first slot that has a shape.
    pub fn sync(&mut self, offer: &Offer) {
        if offer.get(self.slot).is_none() {
            if let Some(first) = offer.first_available() {
                self.slot = first;
            }
        }
    }

    /// Interpret one action against the current tray.
    pub fn apply(&mut self, action: InputAction, offer: &Offer, game_over: bool) -> CursorEvent {
        if action == InputAction::Restart {
            return CursorEvent::Restart;
        }
        if game_over {
            return CursorEvent::Ignored;
        }
        match self.mode {
            CursorMode::Tray => self.apply_tray(action, offer),
            CursorMode::Grid => self.apply_grid(action),
        }
    }

    fn apply_tray(&mut self, action: InputAction, offer: &Offer) -> CursorEvent {
        match action {
            InputAction::Left => self.cycle(offer, OFFER_SLOTS - 1),
            InputAction::Right => self.cycle(offer, 1),
            InputAction::Confirm => {
                let Some(shape) = offer.get(self.slot) else {
                    return CursorEvent::Ignored;
                };
                let half = (GRID_SIZE / 2) as i32;
                self.at = Point::new(half - (shape.rows() / 2) as i32, half - (shape.cols() / 2) as i32);
                self.mode = CursorMode::Grid;
                CursorEvent::Moved
            }
            _ => CursorEvent::Ignored,
        }
    }

    /// Step through the slots by `step` (mod slot count) until one holds a shape.
    fn cycle(&mut self, offer: &Offer, step: usize) -> CursorEvent {
        let mut next = self.slot;
        for _ in 0..OFFER_SLOTS {
            next = (next + step) % OFFER_SLOTS;
            if offer.get(next).is_some() {
                let moved = next != self.slot;
                self.slot = next;
                return if moved {
                    CursorEvent::Moved
                } else {
                    CursorEvent::Ignored
                };
            }
        }
        CursorEvent::Ignored
    }

    fn apply_grid(&mut self, action: InputAction) -> CursorEvent {
        let max = GRID_SIZE as i32 - 1;
        let before = self.at;
        match action {
            InputAction::Up => self.at.row = (self.at.row - 1).max(0),
            InputAction::Down => self.at.row = (self.at.row + 1).min(max),
            InputAction::Left => self.at.col = (self.at.col - 1).max(0),
            InputAction::Right => self.at.col = (self.at.col + 1).min(max),
            InputAction::Confirm => {
                return CursorEvent::Place(PlaceRequest {
                    slot: self.slot,
                    at: self.at,
                })
            }
            InputAction::Cancel => {
                self.mode = CursorMode::Tray;
                return CursorEvent::Moved;
            }
            InputAction::Restart => return CursorEvent::Restart,
        }
        if self.at == before {
            CursorEvent::Ignored
        } else {
            CursorEvent::Moved
        }
    }

    /// Report the outcome of a [`PlaceRequest`].
    pub fn placement_result(&mut self, accepted: bool) {
        if accepted {
            self.mode = CursorMode::Tray;
        } else {
            self.shake_ms = SHAKE_MS;
        }
    }

    /// Run one action end to end against a session.
    ///
    /// Returns true when the session or the cursor changed.
    pub fn drive(&mut self, action: InputAction, session: &mut Session) -> bool {
        self.sync(session.offer());
        match self.apply(action, session.offer(), session.game_over()) {
            CursorEvent::Ignored => false,
            CursorEvent::Moved => true,
            CursorEvent::Restart => {
                session.reset();
                self.reset();
                self.sync(session.offer());
                true
            }
            CursorEvent::Place(req) => {
                let accepted = session.attempt_placement(req.slot, Some(req.at));
                if !accepted {
                    debug!("keyboard placement at {:?} rejected", req.at);
                }
                self.placement_result(accepted);
                self.sync(session.offer());
                true
            }
        }
    }
}

impl Default for KeyboardCursor {
    fn default() -> Self {
        Self::new()
    }
}
