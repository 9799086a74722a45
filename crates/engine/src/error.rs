//! Error types for dispatch queries and the store.

use dispatch_core::DispatchId;
use dispatch_recurrence::RecurrenceError;

/// Errors from dispatch queries and store operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `until` was called on a dispatch without a duration. This is a
    /// caller contract violation, distinct from a normal "no result".
    #[error("dispatch {0} has no duration; until is undefined for infinite dispatches")]
    NoDuration(DispatchId),

    /// No dispatch with the given id exists in the store.
    #[error("dispatch not found: {0}")]
    NotFound(DispatchId),

    /// A recurrence rule failed boundary validation.
    #[error("invalid recurrence: {0}")]
    Recurrence(#[from] RecurrenceError),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
