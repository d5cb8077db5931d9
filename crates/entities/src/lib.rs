//! Core entity definitions for Tempo.
//!
//! This crate defines the data types shared across the attendance tracker:
//! users, departments, and shifts.

mod department;
mod shift;
mod user;

pub use department::*;
pub use shift::*;
pub use user::*;
