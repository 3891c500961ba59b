//! Board domain model.
//!
//! # Responsibility
//! - Define the task, column and board shapes shared by the store, the
//!   persistence codec and presentation callers.
//! - Provide read helpers and invariant validation over one board snapshot.
//!
//! # Invariants
//! - A board snapshot is a plain value; mutation happens only by building a
//!   new snapshot inside `store::BoardStore`.
//! - Task `status` and column membership always agree.

pub mod board;
pub mod column;
pub mod query;
pub mod task;
