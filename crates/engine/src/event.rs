//! Change events emitted by the dispatch store.

use serde::{Deserialize, Serialize};

use crate::dispatch::Dispatch;

/// The kind of change that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

/// A change event carrying the dispatch state after the change
/// (for deletions, the removed dispatch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchEvent {
    pub kind: EventKind,
    pub dispatch: Dispatch,
}
