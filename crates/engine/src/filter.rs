//! List filters for dispatches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dispatch_core::TargetComponents;

use crate::dispatch::Dispatch;

/// A half-open time interval: `from` inclusive, `to` exclusive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TimeInterval {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeInterval {
    fn contains(&self, t: DateTime<Utc>) -> bool {
        if let Some(from) = self.from {
            if t < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if t >= to {
                return false;
            }
        }
        true
    }
}

/// Filter for listing dispatches. Empty filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchFilter {
    /// Target selectors the dispatch must equal.
    pub targets: Vec<TargetComponents>,
    /// Restrict by start time.
    pub start_time: Option<TimeInterval>,
    /// Restrict by end time (`start_time + duration`). Dispatches
    /// without a duration have no end time and pass this filter.
    pub end_time: Option<TimeInterval>,
    /// Restrict by active flag.
    pub active: Option<bool>,
    /// Restrict by dry-run flag.
    pub dry_run: Option<bool>,
}

impl DispatchFilter {
    /// Check a dispatch against all set conditions.
    pub fn matches(&self, dispatch: &Dispatch) -> bool {
        for target in &self.targets {
            if *target != dispatch.target {
                return false;
            }
        }
        if let Some(interval) = &self.start_time {
            if !interval.contains(dispatch.start_time) {
                return false;
            }
        }
        if let Some(interval) = &self.end_time {
            if let Some(end) = dispatch.end_time() {
                if !interval.contains(end) {
                    return false;
                }
            }
        }
        if let Some(active) = self.active {
            if dispatch.active != active {
                return false;
            }
        }
        if let Some(dry_run) = self.dry_run {
            if dispatch.dry_run != dry_run {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_recurrence::RecurrenceRule;
    use std::time::Duration;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn dispatch(duration: Option<Duration>) -> Dispatch {
        let start = ts("2023-01-01T12:00:00Z");
        Dispatch {
            id: 1,
            kind: "TypeA".to_string(),
            start_time: start,
            duration,
            target: TargetComponents::Ids(vec![4]),
            active: true,
            dry_run: false,
            payload: serde_json::Value::Null,
            recurrence: RecurrenceRule::default(),
            create_time: start,
            update_time: start,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(DispatchFilter::default().matches(&dispatch(None)));
    }

    #[test]
    fn start_interval_is_half_open() {
        let d = dispatch(None);
        let exact = DispatchFilter {
            start_time: Some(TimeInterval {
                from: Some(d.start_time),
                to: None,
            }),
            ..DispatchFilter::default()
        };
        assert!(exact.matches(&d));

        let excluded = DispatchFilter {
            start_time: Some(TimeInterval {
                from: None,
                to: Some(d.start_time),
            }),
            ..DispatchFilter::default()
        };
        assert!(!excluded.matches(&d));
    }

    #[test]
    fn end_interval_ignores_infinite_dispatches() {
        let filter = DispatchFilter {
            end_time: Some(TimeInterval {
                from: Some(ts("2024-01-01T00:00:00Z")),
                to: None,
            }),
            ..DispatchFilter::default()
        };
        // No duration, no end time: passes.
        assert!(filter.matches(&dispatch(None)));
        // Ends at 12:20, well before 2024: filtered out.
        assert!(!filter.matches(&dispatch(Some(Duration::from_secs(1200)))));
    }

    #[test]
    fn target_and_flag_filters() {
        let d = dispatch(None);
        let matching = DispatchFilter {
            targets: vec![TargetComponents::Ids(vec![4])],
            active: Some(true),
            dry_run: Some(false),
            ..DispatchFilter::default()
        };
        assert!(matching.matches(&d));

        let wrong_target = DispatchFilter {
            targets: vec![TargetComponents::Ids(vec![5])],
            ..DispatchFilter::default()
        };
        assert!(!wrong_target.matches(&d));

        let wrong_flag = DispatchFilter {
            dry_run: Some(true),
            ..DispatchFilter::default()
        };
        assert!(!wrong_flag.matches(&d));
    }
}
