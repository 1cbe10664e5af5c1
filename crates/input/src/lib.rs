//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::InputAction`] and turns
//! those actions into tray selections and placement attempts through the
//! [`KeyboardCursor`].

pub mod cursor;
pub mod map;

pub use block_blast_types as types;

pub use cursor::{CursorEvent, CursorMode, KeyboardCursor, PlaceRequest};
pub use map::{handle_key_event, should_quit};
