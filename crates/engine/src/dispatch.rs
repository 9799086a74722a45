//! [`Dispatch`] — an immutable schedule entry and its temporal queries.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dispatch_core::{DispatchId, TargetComponents};
use dispatch_recurrence::RecurrenceRule;

use crate::error::{EngineError, Result};

/// Whether a dispatch is currently supposed to be running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunningState {
    /// The dispatch is running.
    Running,
    /// The dispatch is stopped.
    Stopped,
    /// The dispatch is for a different type.
    DifferentType,
}

/// A dispatch: a scheduled instruction that activates behavior on a set
/// of target components for a bounded or unbounded duration, optionally
/// repeating.
///
/// Values are immutable; updates produce a new value (see
/// [`DispatchUpdate`](crate::update::DispatchUpdate)). All queries take
/// the reference instant explicitly so they stay deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispatch {
    /// Unique identifier, assigned by the store.
    pub id: DispatchId,
    /// User-defined type tag, understood by downstream applications
    /// and compared by equality only.
    #[serde(rename = "type")]
    pub kind: String,
    /// Start of the first occurrence, UTC.
    pub start_time: DateTime<Utc>,
    /// Length of each run. `None` means the dispatch, once started,
    /// never ends.
    pub duration: Option<Duration>,
    /// Components the dispatch targets; opaque to the scheduling logic.
    pub target: TargetComponents,
    /// Master on/off switch, independent of timing.
    pub active: bool,
    /// Executed for logging and monitoring only, without affecting
    /// component state.
    pub dry_run: bool,
    /// Arbitrary data carried to the executing application.
    pub payload: serde_json::Value,
    /// Recurrence pattern; the default rule means "no recurrence".
    pub recurrence: RecurrenceRule,
    /// Set by the store when the dispatch is created.
    pub create_time: DateTime<Utc>,
    /// Bumped by the store on every update.
    pub update_time: DateTime<Utc>,
}

impl Dispatch {
    /// Check whether this dispatch should be running at `now`.
    ///
    /// A type mismatch short-circuits every other check.
    pub fn running(&self, kind: &str, now: DateTime<Utc>) -> RunningState {
        if self.kind != kind {
            return RunningState::DifferentType;
        }
        if !self.active {
            return RunningState::Stopped;
        }
        if now < self.start_time {
            return RunningState::Stopped;
        }
        if self.duration.is_none() {
            // An infinite dispatch runs forever once started.
            return RunningState::Running;
        }
        match self.until(now) {
            Ok(Some(until)) if now < until => RunningState::Running,
            _ => RunningState::Stopped,
        }
    }

    /// The instant the current run ends.
    ///
    /// For a recurring dispatch this is the latest occurrence start at
    /// or before `now` plus the duration; `None` when no run has
    /// started yet or the dispatch is inactive. For a non-recurring
    /// dispatch it is always `start_time + duration`.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoDuration`] if the dispatch has no duration —
    /// "until" is meaningless for infinite dispatches and calling this
    /// is a contract violation, not a recoverable state.
    pub fn until(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        let Some(duration) = self.duration else {
            return Err(EngineError::NoDuration(self.id));
        };
        if !self.active {
            return Ok(None);
        }
        if !self.recurrence.is_recurring() {
            return Ok(Some(add_duration(self.start_time, duration)));
        }
        Ok(self
            .recurrence
            .last_at_or_before(self.start_time, now)
            .map(|start| add_duration(start, duration)))
    }

    /// Earliest occurrence start at or after `after`, or `None` if the
    /// dispatch has no further occurrences.
    ///
    /// A dispatch without a real recurrence, or without a duration
    /// (infinite dispatches are single occurrences), has exactly one
    /// occurrence at `start_time`. A recurrence whose weekday filter
    /// contains the UNSPECIFIED sentinel has none.
    pub fn next_run_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !self.recurrence.is_recurring() || self.duration.is_none() {
            return (after <= self.start_time).then_some(self.start_time);
        }
        if self.recurrence.has_unspecified_weekday() {
            return None;
        }
        self.recurrence.first_at_or_after(self.start_time, after)
    }

    /// End of the base schedule window (`start_time + duration`),
    /// ignoring recurrence. `None` for infinite dispatches. Used by
    /// list filters.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.duration.map(|d| add_duration(self.start_time, d))
    }
}

/// Durations cross the engine boundary at whole-second granularity.
pub(crate) fn add_duration(t: DateTime<Utc>, d: Duration) -> DateTime<Utc> {
    t + chrono::Duration::seconds(d.as_secs() as i64)
}
