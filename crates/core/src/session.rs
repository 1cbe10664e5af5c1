//! Session module - the game state machine
//!
//! The session owns the board, the tray, the score, and the combo counter, and
//! is the only place they change. Placements are two-phase: a placement that
//! completes lines commits the shape immediately, marks the full lines as
//! clearing, and schedules the actual clear after `clear_delay_ms`. An
//! exhausted tray is refilled after `refill_delay_ms`. While either follow-up
//! is pending the session is busy and rejects placements.
//!
//! Time only advances through [`Session::tick`]. With zero delays the
//! follow-ups run inside the placement call itself.

use std::fmt;

use log::{debug, info, warn};
use thiserror::Error;

use crate::board::Board;
use crate::moves::has_valid_move;
use crate::offer::{Offer, OfferGenerator};
use crate::placement::{commit, detect_and_clear_lines, fits, LineIndices};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::{calculate_score, clear_label, ScoreResult};
use crate::shapes::Shape;
use crate::snapshot::{ClearingLines, Popup, SessionSnapshot};
use crate::store::{MemoryStore, ScoreStore};
use crate::types::{
    Point, PopupKind, CLEAR_DELAY_MS, COMBO_POPUP_DELAY_MS, POPUP_TTL_MS, REFILL_DELAY_MS,
};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    GameOver,
}

/// Delays of the timed follow-ups, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    pub clear_delay_ms: u32,
    pub refill_delay_ms: u32,
    pub popup_ttl_ms: u32,
    pub combo_popup_delay_ms: u32,
}

impl SessionTiming {
    /// No delays: clears and refills happen inside the placement call.
    pub fn immediate() -> Self {
        Self {
            clear_delay_ms: 0,
            refill_delay_ms: 0,
            popup_ttl_ms: POPUP_TTL_MS,
            combo_popup_delay_ms: 0,
        }
    }
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            clear_delay_ms: CLEAR_DELAY_MS,
            refill_delay_ms: REFILL_DELAY_MS,
            popup_ttl_ms: POPUP_TTL_MS,
            combo_popup_delay_ms: COMBO_POPUP_DELAY_MS,
        }
    }
}

/// Why a placement attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("game is over")]
    GameOver,
    #[error("a clear or refill is still in progress")]
    Busy,
    #[error("slot index is out of range")]
    SlotOutOfRange,
    #[error("slot has already been used")]
    SlotEmpty,
    #[error("no target position")]
    NoTarget,
    #[error("shape does not fit at the target position")]
    DoesNotFit,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::GameOver => "game_over",
            PlaceError::Busy => "busy",
            PlaceError::SlotOutOfRange | PlaceError::SlotEmpty => "invalid_slot",
            PlaceError::NoTarget | PlaceError::DoesNotFit => "invalid_place",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::GameOver => "game is over",
            PlaceError::Busy => "a clear or refill is still in progress",
            PlaceError::SlotOutOfRange => "slot index is out of range",
            PlaceError::SlotEmpty => "slot has already been used",
            PlaceError::NoTarget => "no target position",
            PlaceError::DoesNotFit => "shape does not fit at the target position",
        }
    }
}

/// An accepted placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub slot: usize,
    pub shape: &'static Shape,
    pub at: Point,
    pub score: ScoreResult,
    pub rows: LineIndices,
    pub cols: LineIndices,
    /// Combo counter after this placement
    pub combo: u32,
}

impl Placement {
    pub fn lines(&self) -> u32 {
        (self.rows.len() + self.cols.len()) as u32
    }
}

#[derive(Debug, Clone)]
enum FollowUp {
    FinishClear { board: Board, points: u32, lines: u32, at: Point },
    Refill,
}

#[derive(Debug, Clone)]
struct Pending {
    action: FollowUp,
    remaining_ms: u32,
}

#[derive(Debug, Clone)]
struct DeferredPopup {
    at: Point,
    text: String,
    kind: PopupKind,
    remaining_ms: u32,
}

/// Complete game session
pub struct Session {
    board: Board,
    offer: Offer,
    generator: OfferGenerator,
    rng: Box<dyn RandomSource>,
    store: Box<dyn ScoreStore>,
    timing: SessionTiming,
    phase: Phase,
    score: u32,
    high_score: u32,
    combo: u32,
    /// Scheduled clear or refill; the session is busy while this is set.
    pending: Option<Pending>,
    clearing: ClearingLines,
    popups: Vec<Popup>,
    deferred: Vec<DeferredPopup>,
    next_popup_id: u32,
    /// Monotonic episode id (increments on reset).
    episode_id: u32,
    /// Offers generated this episode, including the first.
    offer_batches: u32,
    placements: u32,
}

impl Session {
    /// Session with a seeded [`SimpleRng`], in-memory high score, default delays
    pub fn new(seed: u32) -> Self {
        Self::with_parts(
            OfferGenerator::standard(),
            Box::new(SimpleRng::new(seed)),
            Box::new(MemoryStore::new()),
            SessionTiming::default(),
        )
    }

    pub fn with_parts(
        generator: OfferGenerator,
        mut rng: Box<dyn RandomSource>,
        store: Box<dyn ScoreStore>,
        timing: SessionTiming,
    ) -> Self {
        let high_score = match store.load() {
            Ok(v) => v.unwrap_or(0),
            Err(e) => {
                warn!("could not read high score, starting from 0: {e}");
                0
            }
        };
        let offer = generator.generate(rng.as_mut());

        Self {
            board: Board::new(),
            offer,
            generator,
            rng,
            store,
            timing,
            phase: Phase::Active,
            score: 0,
            high_score,
            combo: 0,
            pending: None,
            clearing: ClearingLines::default(),
            popups: Vec::new(),
            deferred: Vec::new(),
            next_popup_id: 0,
            episode_id: 0,
            offer_batches: 1,
            placements: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn offer(&self) -> &Offer {
        &self.offer
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// A clear or refill is pending
    pub fn busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clearing(&self) -> &ClearingLines {
        &self.clearing
    }

    pub fn popups(&self) -> &[Popup] {
        &self.popups
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn offer_batches(&self) -> u32 {
        self.offer_batches
    }

    pub fn timing(&self) -> SessionTiming {
        self.timing
    }

    pub fn store(&self) -> &dyn ScoreStore {
        self.store.as_ref()
    }

    /// Boundary call for the input layer: place the shape in `slot` at `at`.
    ///
    /// Returns false, without changing anything, when the attempt is rejected.
    pub fn attempt_placement(&mut self, slot: usize, at: Option<Point>) -> bool {
        self.try_place(slot, at).is_ok()
    }

    /// Place the shape in `slot` with its top-left corner at `at`.
    pub fn try_place(&mut self, slot: usize, at: Option<Point>) -> Result<Placement, PlaceError> {
        let result = self.place(slot, at);
        if let Err(e) = result {
            debug!("placement slot={slot} at={at:?} rejected: {e}");
        }
        result
    }

    fn place(&mut self, slot: usize, at: Option<Point>) -> Result<Placement, PlaceError> {
        if self.phase == Phase::GameOver {
            return Err(PlaceError::GameOver);
        }
        if self.busy() {
            return Err(PlaceError::Busy);
        }
        let shape = match self.offer.slots().get(slot) {
            None => return Err(PlaceError::SlotOutOfRange),
            Some(None) => return Err(PlaceError::SlotEmpty),
            Some(Some(shape)) => *shape,
        };
        let at = at.ok_or(PlaceError::NoTarget)?;
        if !fits(&self.board, shape, at) {
            return Err(PlaceError::DoesNotFit);
        }

        // Point of no return.
        let placed = commit(&self.board, shape, at);
        self.offer.take(slot);
        self.board = placed;
        self.placements += 1;

        let blocks = shape.cell_count() as u32;
        let clear = detect_and_clear_lines(&placed);
        let lines = clear.total_lines();
        let score = calculate_score(blocks, lines, self.combo);
        let popup_at = at.offset((shape.rows() / 2) as i32, (shape.cols() / 2) as i32);

        if lines > 0 {
            self.combo += 1;
            let kind = if lines > 1 || self.combo > 1 {
                PopupKind::Combo
            } else {
                PopupKind::Score
            };
            self.emit_popup(popup_at, format!("+{}", score.total), kind);
            if self.combo > 1 {
                self.defer_popup(popup_at, format!("{}x COMBO!", self.combo), PopupKind::Combo);
            }
            self.clearing = ClearingLines {
                rows: clear.rows.clone(),
                cols: clear.cols.clone(),
            };
            self.schedule(
                FollowUp::FinishClear {
                    board: clear.board,
                    points: score.total,
                    lines,
                    at: popup_at,
                },
                self.timing.clear_delay_ms,
            );
        } else {
            self.combo = 0;
            self.emit_popup(popup_at, format!("+{}", score.total), PopupKind::Score);
            self.award(score.total);
            self.after_turn();
        }

        debug!(
            "placed {} from slot {slot} at ({}, {}): +{} lines={lines} combo={}",
            shape.id(),
            at.row,
            at.col,
            score.total,
            self.combo
        );

        Ok(Placement {
            slot,
            shape,
            at,
            score,
            rows: clear.rows,
            cols: clear.cols,
            combo: self.combo,
        })
    }

    /// Advance timers by `elapsed_ms`.
    ///
    /// Returns true when a pending clear or refill was applied.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        self.popups.retain_mut(|p| {
            p.remaining_ms = p.remaining_ms.saturating_sub(elapsed_ms);
            p.remaining_ms > 0
        });

        let mut i = 0;
        while i < self.deferred.len() {
            let d = &mut self.deferred[i];
            d.remaining_ms = d.remaining_ms.saturating_sub(elapsed_ms);
            if d.remaining_ms == 0 {
                let d = self.deferred.remove(i);
                self.emit_popup(d.at, d.text, d.kind);
            } else {
                i += 1;
            }
        }

        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        pending.remaining_ms = pending.remaining_ms.saturating_sub(elapsed_ms);
        if pending.remaining_ms > 0 {
            return false;
        }
        match self.pending.take() {
            Some(pending) => {
                self.run(pending.action);
                true
            }
            None => false,
        }
    }

    /// Apply every pending follow-up now, skipping the remaining delays.
    pub fn flush_pending(&mut self) -> bool {
        let mut ran = false;
        while let Some(pending) = self.pending.take() {
            self.run(pending.action);
            ran = true;
        }
        ran
    }

    /// Start a new game. The high score is kept.
    ///
    /// A clear still pending is dropped, but its points count towards the
    /// high score since the placement was already committed.
    pub fn reset(&mut self) {
        self.discard_pending();
        self.board = Board::new();
        self.offer = self.generator.generate(self.rng.as_mut());
        self.phase = Phase::Active;
        self.score = 0;
        self.combo = 0;
        self.clearing = ClearingLines::default();
        self.popups.clear();
        self.deferred.clear();
        self.episode_id = self.episode_id.wrapping_add(1);
        self.offer_batches = 1;
        self.placements = 0;
        info!("new game (episode {})", self.episode_id);
    }

    /// Replace the board and tray with an arbitrary position.
    ///
    /// Score and combo are kept; any pending follow-up is dropped. The
    /// position is then judged like the end of a turn (refill when the tray is
    /// exhausted, game over when nothing fits).
    pub fn set_position(&mut self, board: Board, offer: Offer) {
        self.discard_pending();
        self.clearing = ClearingLines::default();
        self.board = board;
        self.offer = offer;
        self.phase = Phase::Active;
        self.after_turn();
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.board = self.board;
        out.offer = self.offer;
        out.score = self.score;
        out.high_score = self.high_score;
        out.combo = self.combo;
        out.game_over = self.game_over();
        out.busy = self.busy();
        out.clearing.clone_from(&self.clearing);
        out.popups.clone_from(&self.popups);
        out.episode_id = self.episode_id;
        out.offer_batches = self.offer_batches;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn schedule(&mut self, action: FollowUp, delay_ms: u32) {
        if delay_ms == 0 {
            self.run(action);
        } else {
            self.pending = Some(Pending {
                action,
                remaining_ms: delay_ms,
            });
        }
    }

    fn run(&mut self, action: FollowUp) {
        match action {
            FollowUp::FinishClear {
                board,
                points,
                lines,
                at,
            } => {
                self.board = board;
                self.clearing = ClearingLines::default();
                self.award(points);
                self.emit_popup(at, clear_label(lines), PopupKind::Clear);
                self.after_turn();
            }
            FollowUp::Refill => {
                self.offer = self.generator.generate(self.rng.as_mut());
                self.offer_batches += 1;
                debug!(
                    "refilled tray: {:?}",
                    self.offer.shapes().map(Shape::id).collect::<Vec<_>>()
                );
                self.check_game_over();
            }
        }
    }

    /// Refill an exhausted tray first; only then decide whether the game is over.
    fn after_turn(&mut self) {
        if self.offer.is_exhausted() {
            self.schedule(FollowUp::Refill, self.timing.refill_delay_ms);
        } else {
            self.check_game_over();
        }
    }

    fn check_game_over(&mut self) {
        if !has_valid_move(&self.board, &self.offer) {
            self.phase = Phase::GameOver;
            info!(
                "game over: score {} after {} placements",
                self.score, self.placements
            );
        }
    }

    fn discard_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        debug!("discarding pending {:?}", pending.action);
        if let FollowUp::FinishClear { points, .. } = pending.action {
            self.record_high_score(self.score.saturating_add(points));
        }
    }

    fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.record_high_score(self.score);
    }

    fn record_high_score(&mut self, score: u32) {
        if score > self.high_score {
            self.high_score = score;
            match self.store.save(score) {
                Ok(()) => debug!("new high score {score}"),
                Err(e) => warn!("could not save high score {score}: {e}"),
            }
        }
    }

    fn emit_popup(&mut self, at: Point, text: String, kind: PopupKind) {
        self.next_popup_id = self.next_popup_id.wrapping_add(1);
        self.popups.push(Popup {
            id: self.next_popup_id,
            at,
            text,
            kind,
            remaining_ms: self.timing.popup_ttl_ms,
        });
    }

    fn defer_popup(&mut self, at: Point, text: String, kind: PopupKind) {
        if self.timing.combo_popup_delay_ms == 0 {
            self.emit_popup(at, text, kind);
        } else {
            self.deferred.push(DeferredPopup {
                at,
                text,
                kind,
                remaining_ms: self.timing.combo_popup_delay_ms,
            });
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("high_score", &self.high_score)
            .field("combo", &self.combo)
            .field("busy", &self.busy())
            .field("episode_id", &self.episode_id)
            .field("offer", &self.offer)
            .finish_non_exhaustive()
    }
}
