//! Shift and roster storage for Tempo.
//!
//! This crate provides the persistence abstraction for users, departments,
//! and shifts. Two production backends implement the same contract: SQLite
//! (relational) and a flat JSON key-value directory (local), plus an
//! in-memory store for tests.

mod error;
mod local;
mod memory;
mod sqlite;
mod traits;

pub use error::*;
pub use local::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
