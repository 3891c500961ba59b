//! Board state store and its persistence plumbing.
//!
//! # Responsibility
//! - Expose the single mutation surface over the board.
//! - Keep presentation callers decoupled from storage and encoding.
//!
//! # Invariants
//! - All board mutations go through `BoardStore`; no caller edits a
//!   snapshot in place.

pub mod board_store;
pub mod observer;
pub mod outcome;
pub mod snapshot;
