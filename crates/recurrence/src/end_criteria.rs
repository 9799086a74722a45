//! Recurrence termination condition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RecurrenceError, Result};

/// The condition that stops a recurrence.
///
/// Count and until are mutually exclusive by construction; a rule with
/// no end criteria never terminates by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCriteria {
    /// Stop after this many occurrences (inclusive of the first).
    Count(u32),
    /// Stop before this instant: an occurrence at or after it is
    /// excluded. Stricter than RFC 5545's inclusive UNTIL.
    Until(DateTime<Utc>),
}

impl EndCriteria {
    /// Build end criteria from a pair of optional fields, rejecting
    /// the invalid combinations at construction time.
    pub fn from_parts(count: Option<u32>, until: Option<DateTime<Utc>>) -> Result<Option<Self>> {
        match (count, until) {
            (Some(_), Some(_)) => Err(RecurrenceError::ConflictingEndCriteria),
            (Some(0), None) => Err(RecurrenceError::ZeroCount),
            (Some(n), None) => Ok(Some(EndCriteria::Count(n))),
            (None, Some(t)) => Ok(Some(EndCriteria::Until(t))),
            (None, None) => Ok(None),
        }
    }
}
