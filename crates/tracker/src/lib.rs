//! Attendance engine: roster model, shift lifecycle, staleness
//! reconciliation, rank reordering, and reporting, backed by any
//! [`shift_store::ShiftStore`].

mod engine;
mod error;
mod index;
mod lifecycle;
mod ranking;
mod reconciler;
pub mod report;
mod roster;
mod session;

pub use engine::Tracker;
pub use error::{TrackerError, TrackerResult};
pub use index::ActiveIndex;
pub use lifecycle::ToggleOutcome;
pub use ranking::{renormalize, MoveDirection};
pub use reconciler::Reconciler;
pub use session::AdminSession;
