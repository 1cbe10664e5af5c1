//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, headless tests).
//!
//! # Board Dimensions
//!
//! The playfield is a fixed 8x8 square:
//!
//! - **Rows**: indexed 0-7 (top to bottom)
//! - **Columns**: indexed 0-7 (left to right)
//! - **Offer**: 3 tray slots, refilled together once all are used
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `CLEAR_DELAY_MS` | 200 | Highlight time between commit and applying a clear |
//! | `REFILL_DELAY_MS` | 150 | Pause before an exhausted tray is refilled |
//! | `POPUP_TTL_MS` | 1000 | Lifetime of a floating text popup |
//! | `COMBO_POPUP_DELAY_MS` | 200 | Delay of the "Nx COMBO!" popup |
//! | `SHAKE_MS` | 300 | Rejected-placement shake feedback |
//!
//! # Scoring
//!
//! A placement scores one point per placed block. Clearing `n` lines adds
//! `10n`, plus `15n` per step of the running combo, plus `20n` when `n > 1`.
//!
//! # Examples
//!
//! ```
//! use block_blast_types::{Color, Point, GRID_SIZE, OFFER_SLOTS};
//!
//! assert_eq!(GRID_SIZE, 8);
//! assert_eq!(OFFER_SLOTS, 3);
//!
//! // Parse a color (case-insensitive)
//! assert_eq!(Color::from_str("Teal"), Some(Color::Teal));
//!
//! let p = Point::new(2, 5);
//! assert_eq!(p.offset(1, -1), Point::new(3, 4));
//! ```

/// Side length of the square board (8 cells)
pub const GRID_SIZE: usize = 8;

/// Number of slots in an offer (tray) batch
pub const OFFER_SLOTS: usize = 3;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Time a completed row/column stays highlighted before it is emptied
pub const CLEAR_DELAY_MS: u32 = 200;

/// Pause between the last tray slot being used and the refill
pub const REFILL_DELAY_MS: u32 = 150;

/// Lifetime of a floating text popup
pub const POPUP_TTL_MS: u32 = 1000;

/// Delay before the "Nx COMBO!" popup follows the score popup
pub const COMBO_POPUP_DELAY_MS: u32 = 200;

/// Duration of the rejection shake on the keyboard cursor
pub const SHAKE_MS: u32 = 300;

/// Points per cleared line
pub const LINE_CLEAR_POINTS: u32 = 10;

/// Points per cleared line per step of the running combo
pub const COMBO_POINTS_PER_LINE: u32 = 15;

/// Points per cleared line when more than one line clears at once
pub const MULTI_LINE_POINTS_PER_LINE: u32 = 20;

/// Largest occupied-cell count of a "small" shape
pub const SMALL_SHAPE_MAX_CELLS: usize = 3;

/// Occupied-cell count of a "medium" shape (larger ones are "large")
pub const MEDIUM_SHAPE_CELLS: usize = 4;

/// Cumulative bucket thresholds per offer slot.
///
/// For a uniform draw `r` in `[0, 1)`: `r < small` picks Small, `r < medium`
/// picks Medium, anything else picks Large.
pub const OFFER_SLOT_THRESHOLDS: [SlotThresholds; OFFER_SLOTS] = [
    SlotThresholds {
        small: 0.60,
        medium: 1.0,
    },
    SlotThresholds {
        small: 0.35,
        medium: 0.85,
    },
    SlotThresholds {
        small: 0.25,
        medium: 0.75,
    },
];

/// Storage key of the persisted high score
pub const HIGH_SCORE_KEY: &str = "blockBlastHighScore";

/// Cumulative probability cut points for one offer slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotThresholds {
    pub small: f64,
    pub medium: f64,
}


/// Color token of a placed block
///
/// Colors are opaque to the game rules; they only matter to rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
    Indigo,
    Teal,
}

impl Color {
    /// All colors in palette order
    pub const ALL: [Color; 10] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Cyan,
        Color::Blue,
        Color::Purple,
        Color::Pink,
        Color::Indigo,
        Color::Teal,
    ];

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use block_blast_types::Color;
    ///
    /// assert_eq!(Color::from_str("red"), Some(Color::Red));
    /// assert_eq!(Color::from_str("INDIGO"), Some(Color::Indigo));
    /// assert_eq!(Color::from_str("mauve"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "orange" => Some(Color::Orange),
            "yellow" => Some(Color::Yellow),
            "green" => Some(Color::Green),
            "cyan" => Some(Color::Cyan),
            "blue" => Some(Color::Blue),
            "purple" => Some(Color::Purple),
            "pink" => Some(Color::Pink),
            "indigo" => Some(Color::Indigo),
            "teal" => Some(Color::Teal),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Cyan => "cyan",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::Indigo => "indigo",
            Color::Teal => "teal",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Color)`: Cell filled with a block of that color
pub type Cell = Option<Color>;

/// Board coordinate: the top-left anchor of a shape when overlaid on the board.
///
/// Coordinates are signed so that off-board anchors can be expressed and
/// rejected by the fit test instead of by the type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Point shifted by `(dr, dc)`
    pub const fn offset(self, dr: i32, dc: i32) -> Self {
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    /// Whether the point lies on the board
    pub fn in_bounds(self) -> bool {
        (0..GRID_SIZE as i32).contains(&self.row) && (0..GRID_SIZE as i32).contains(&self.col)
    }
}

/// Category of a floating text popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupKind {
    /// Plain placement score
    Score,
    /// Multi-line clear or running combo
    Combo,
    /// A line clear being applied
    Clear,
}

impl PopupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PopupKind::Score => "score",
            PopupKind::Combo => "combo",
            PopupKind::Clear => "clear",
        }
    }
}

/// Player intents produced by the input layer
///
/// These are interpreted by the keyboard cursor; only `Confirm` in grid mode
/// ever reaches the session as a placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Move the tray selection or grid cursor left
    Left,
    /// Move the tray selection or grid cursor right
    Right,
    /// Move the grid cursor up
    Up,
    /// Move the grid cursor down
    Down,
    /// Pick the selected shape, or drop it at the cursor
    Confirm,
    /// Return from the grid back to the tray
    Cancel,
    /// Start a new game
    Restart,
}

impl InputAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use block_blast_types::InputAction;
    ///
    /// assert_eq!(InputAction::from_str("confirm"), Some(InputAction::Confirm));
    /// assert_eq!(InputAction::from_str("LEFT"), Some(InputAction::Left));
    /// assert_eq!(InputAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(InputAction::Left),
            "right" => Some(InputAction::Right),
            "up" => Some(InputAction::Up),
            "down" => Some(InputAction::Down),
            "confirm" => Some(InputAction::Confirm),
            "cancel" => Some(InputAction::Cancel),
            "restart" => Some(InputAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputAction::Left => "left",
            InputAction::Right => "right",
            InputAction::Up => "up",
            InputAction::Down => "down",
            InputAction::Confirm => "confirm",
            InputAction::Cancel => "cancel",
            InputAction::Restart => "restart",
        }
    }
}
