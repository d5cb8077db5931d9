//! Tracker error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The persistence call failed. The optimistic in-memory update that
    /// preceded it is not rolled back; the caller decides whether to retry
    /// or reload.
    #[error("Store error: {0}")]
    Store(#[from] shift_store::StoreError),

    /// Operation requires an authenticated admin session.
    #[error("Admin session required")]
    AdminRequired,

    /// Unknown user.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Clock-out without an active shift.
    #[error("User {0} has no active shift")]
    NotClockedIn(Uuid),

    /// Input rejected before any persistence call.
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
