//! Calendar recurrence rules and occurrence enumeration.
//!
//! This crate provides:
//! - `RecurrenceRule`: an immutable repeating-pattern description
//!   (frequency, interval, field filters, termination condition)
//! - Lazy occurrence enumeration anchored at an arbitrary start instant
//! - "first occurrence at or after" / "last occurrence at or before"
//!   queries that never materialize the (possibly infinite) sequence
//!
//! All instants are UTC. The stepping/filtering algorithm is implemented
//! directly on chrono so boundary semantics are explicit and testable.

mod end_criteria;
mod error;
mod frequency;
mod occurrences;
mod rule;
mod weekday;

pub use end_criteria::EndCriteria;
pub use error::{RecurrenceError, Result};
pub use frequency::Frequency;
pub use occurrences::Occurrences;
pub use rule::RecurrenceRule;
pub use weekday::Weekday;
