//! Typed partial updates producing a new immutable [`Dispatch`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dispatch_core::TargetComponents;
use dispatch_recurrence::RecurrenceRule;

use crate::dispatch::Dispatch;

/// A partial change set for a dispatch.
///
/// Every field is optional; unset fields keep their current value.
/// `id`, `type`, `dry_run` and `create_time` are not updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchUpdate {
    pub start_time: Option<DateTime<Utc>>,
    /// `Some(None)` clears the duration, making the dispatch infinite.
    pub duration: Option<Option<Duration>>,
    pub target: Option<TargetComponents>,
    pub active: Option<bool>,
    pub payload: Option<serde_json::Value>,
    pub recurrence: Option<RecurrenceRule>,
}

impl DispatchUpdate {
    /// True if the change set would not modify anything.
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none()
            && self.duration.is_none()
            && self.target.is_none()
            && self.active.is_none()
            && self.payload.is_none()
            && self.recurrence.is_none()
    }
}

impl Dispatch {
    /// Apply a change set, producing a new dispatch with `update_time`
    /// set to `now`.
    pub fn apply(&self, update: &DispatchUpdate, now: DateTime<Utc>) -> Dispatch {
        let mut next = self.clone();
        if let Some(start_time) = update.start_time {
            next.start_time = start_time;
        }
        if let Some(duration) = update.duration {
            next.duration = duration;
        }
        if let Some(target) = &update.target {
            next.target = target.clone();
        }
        if let Some(active) = update.active {
            next.active = active;
        }
        if let Some(payload) = &update.payload {
            next.payload = payload.clone();
        }
        if let Some(recurrence) = &update.recurrence {
            next.recurrence = recurrence.clone();
        }
        next.update_time = now;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn dispatch() -> Dispatch {
        let start = ts("2023-01-01T12:00:00Z");
        Dispatch {
            id: 7,
            kind: "TypeA".to_string(),
            start_time: start,
            duration: Some(Duration::from_secs(1200)),
            target: TargetComponents::Ids(vec![1]),
            active: true,
            dry_run: false,
            payload: serde_json::json!({"power": 100}),
            recurrence: RecurrenceRule::default(),
            create_time: start,
            update_time: start,
        }
    }

    #[test]
    fn empty_update_only_bumps_update_time() {
        let d = dispatch();
        let update = DispatchUpdate::default();
        assert!(update.is_empty());

        let now = ts("2023-01-02T00:00:00Z");
        let next = d.apply(&update, now);
        assert_eq!(next.update_time, now);
        assert_eq!(next.start_time, d.start_time);
        assert_eq!(next.duration, d.duration);
        assert_eq!(next.create_time, d.create_time);
    }

    #[test]
    fn nested_option_clears_duration() {
        let d = dispatch();
        let update = DispatchUpdate {
            duration: Some(None),
            ..DispatchUpdate::default()
        };
        let next = d.apply(&update, ts("2023-01-02T00:00:00Z"));
        assert_eq!(next.duration, None);
    }

    #[test]
    fn apply_replaces_only_set_fields() {
        let d = dispatch();
        let update = DispatchUpdate {
            active: Some(false),
            payload: Some(serde_json::json!({"power": 50})),
            ..DispatchUpdate::default()
        };
        let next = d.apply(&update, ts("2023-01-02T00:00:00Z"));
        assert!(!next.active);
        assert_eq!(next.payload, serde_json::json!({"power": 50}));
        assert_eq!(next.kind, "TypeA");
        assert_eq!(next.target, TargetComponents::Ids(vec![1]));
    }
}
