//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the block-placement puzzle: the 8x8 board,
//! the shape catalog, the placement engine, the tray generator, scoring, and
//! the session state machine that ties them together. It has no terminal or
//! input dependencies; randomness and high-score storage are injected.
//!
//! # Module Structure
//!
//! - [`board`]: 8x8 grid of optional colored cells
//! - [`shapes`]: the static catalog of 37 shapes and their size buckets
//! - [`placement`]: fit test, commit, and row/column clearing
//! - [`offer`]: the three-slot tray and its weighted generator
//! - [`moves`]: exhaustive search for any remaining legal placement
//! - [`scoring`]: points for a single placement
//! - [`rng`]: injectable random sources
//! - [`store`]: high score persistence
//! - [`session`]: the game state machine
//! - [`snapshot`]: read-only session view for rendering
//!
//! # Game Rules
//!
//! - A shape may be placed wherever all its cells land on empty board cells.
//! - After each placement every full row and full column is cleared at once;
//!   a cell on both a full row and a full column is cleared once.
//! - A placement that clears lines extends the combo; one that clears nothing
//!   resets it.
//! - When all three tray shapes are used a new tray is drawn.
//! - The game ends when no remaining tray shape fits anywhere.
//!
//! # Example
//!
//! ```
//! use block_blast_core::{Offer, Session, SessionTiming};
//! use block_blast_core::shapes::find;
//! use block_blast_core::types::Point;
//!
//! let mut session = Session::new(12345);
//! session.set_position(
//!     block_blast_core::Board::new(),
//!     Offer::new([find("2x2"), None, None]),
//! );
//!
//! assert!(session.attempt_placement(0, Some(Point::new(0, 0))));
//! assert_eq!(session.score(), 4);
//!
//! // The tray is exhausted; the refill arrives after its delay.
//! assert!(session.busy());
//! session.tick(SessionTiming::default().refill_delay_ms);
//! assert_eq!(session.offer().remaining(), 3);
//! ```
//!
//! # Timing
//!
//! Call [`Session::tick`](session::Session::tick) every frame with the elapsed
//! time. Clears land 200ms after the placement, refills 150ms after the tray
//! empties, and popups live for one second.

pub mod board;
pub mod moves;
pub mod offer;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod shapes;
pub mod snapshot;
pub mod store;

pub use block_blast_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use moves::{anchors, fits_anywhere, has_valid_move};
pub use offer::{CatalogError, Offer, OfferGenerator};
pub use placement::{commit, detect_and_clear_lines, fits, LineClear};
pub use rng::{RandomSource, SequenceRandom, SimpleRng};
pub use scoring::{calculate_score, ScoreResult};
pub use session::{Phase, PlaceError, Placement, Session, SessionTiming};
pub use shapes::{Shape, SizeBucket, CATALOG};
pub use snapshot::{ClearingLines, Popup, SessionSnapshot};
pub use store::{JsonFileStore, MemoryStore, ScoreStore, StoreError};
