//! Block Blast (workspace facade crate).
//!
//! The game lives in dedicated crates under `crates/`; this package re-exports
//! them as `block_blast::{core,input,term,types}` and owns the runner's
//! configuration.

pub mod config;

pub use block_blast_core as core;
pub use block_blast_input as input;
pub use block_blast_term as term;
pub use block_blast_types as types;
