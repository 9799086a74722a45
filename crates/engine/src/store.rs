//! [`DispatchStore`] — in-memory dispatch registry with change events.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::debug;

use dispatch_core::{Config, DispatchId, TargetComponents};
use dispatch_recurrence::{RecurrenceError, RecurrenceRule};

use crate::dispatch::Dispatch;
use crate::error::{EngineError, Result};
use crate::event::{DispatchEvent, EventKind};
use crate::filter::DispatchFilter;
use crate::update::DispatchUpdate;

/// Fields supplied by the caller when creating a dispatch. The store
/// assigns `id`, `create_time` and `update_time`.
#[derive(Debug, Clone)]
pub struct NewDispatch {
    pub kind: String,
    pub start_time: DateTime<Utc>,
    pub duration: Option<Duration>,
    pub target: TargetComponents,
    pub active: bool,
    pub dry_run: bool,
    pub payload: serde_json::Value,
    pub recurrence: RecurrenceRule,
}

/// In-memory registry of dispatches.
///
/// Ids are assigned sequentially. Every mutating call takes the current
/// instant explicitly so tests stay deterministic; wall-clock reads are
/// the caller's concern. Mutations are broadcast as
/// [`DispatchEvent`]s to all subscribers.
pub struct DispatchStore {
    config: Config,
    dispatches: HashMap<DispatchId, Dispatch>,
    next_id: DispatchId,
    events: broadcast::Sender<DispatchEvent>,
}

impl DispatchStore {
    /// Create a store with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a store with the given configuration.
    pub fn with_config(config: Config) -> Self {
        let (events, _) = broadcast::channel(config.store.event_buffer);
        Self {
            config,
            dispatches: HashMap::new(),
            next_id: 1,
            events,
        }
    }

    /// Subscribe to change events. Only changes after the call are
    /// delivered; slow subscribers may observe lagged-receiver errors.
    pub fn subscribe(&self) -> broadcast::Receiver<DispatchEvent> {
        self.events.subscribe()
    }

    /// Create a dispatch. `create_time == update_time == now`.
    pub fn create(&mut self, new: NewDispatch, now: DateTime<Utc>) -> Result<Dispatch> {
        self.check_recurrence(&new.recurrence)?;

        let id = self.next_id;
        self.next_id += 1;

        let dispatch = Dispatch {
            id,
            kind: new.kind,
            start_time: new.start_time,
            duration: new.duration.map(whole_seconds),
            target: new.target,
            active: new.active,
            dry_run: new.dry_run,
            payload: new.payload,
            recurrence: new.recurrence,
            create_time: now,
            update_time: now,
        };
        self.dispatches.insert(id, dispatch.clone());
        debug!(id, kind = %dispatch.kind, "dispatch created");
        self.emit(EventKind::Created, dispatch.clone());
        Ok(dispatch)
    }

    /// Get a dispatch by id.
    pub fn get(&self, id: DispatchId) -> Option<&Dispatch> {
        self.dispatches.get(&id)
    }

    /// List dispatches matching the filter, ordered by id.
    pub fn list(&self, filter: &DispatchFilter) -> Vec<&Dispatch> {
        let mut matched: Vec<&Dispatch> = self
            .dispatches
            .values()
            .filter(|d| filter.matches(d))
            .collect();
        matched.sort_by_key(|d| d.id);
        matched
    }

    /// Apply a change set to an existing dispatch, bumping its
    /// `update_time` to `now`.
    pub fn update(
        &mut self,
        id: DispatchId,
        update: &DispatchUpdate,
        now: DateTime<Utc>,
    ) -> Result<Dispatch> {
        if let Some(recurrence) = &update.recurrence {
            self.check_recurrence(recurrence)?;
        }
        let current = self
            .dispatches
            .get(&id)
            .ok_or(EngineError::NotFound(id))?;

        let mut updated = current.apply(update, now);
        updated.duration = updated.duration.map(whole_seconds);
        self.dispatches.insert(id, updated.clone());
        debug!(id, "dispatch updated");
        self.emit(EventKind::Updated, updated.clone());
        Ok(updated)
    }

    /// Remove a dispatch, returning the removed value.
    pub fn delete(&mut self, id: DispatchId) -> Result<Dispatch> {
        let removed = self
            .dispatches
            .remove(&id)
            .ok_or(EngineError::NotFound(id))?;
        debug!(id, "dispatch deleted");
        self.emit(EventKind::Deleted, removed.clone());
        Ok(removed)
    }

    /// Number of stored dispatches.
    pub fn len(&self) -> usize {
        self.dispatches.len()
    }

    /// Whether the store has no dispatches.
    pub fn is_empty(&self) -> bool {
        self.dispatches.is_empty()
    }

    /// Boundary validation: field ranges always; the UNSPECIFIED
    /// weekday sentinel only under strict validation. Without strict
    /// validation such a rule is stored and enumerates as empty.
    fn check_recurrence(&self, recurrence: &RecurrenceRule) -> Result<()> {
        recurrence.validate()?;
        if self.config.validation.strict_weekdays && recurrence.has_unspecified_weekday() {
            return Err(EngineError::Recurrence(RecurrenceError::UnspecifiedWeekday));
        }
        Ok(())
    }

    fn emit(&self, kind: EventKind, dispatch: Dispatch) {
        // Send fails only when there are no subscribers; that is fine.
        let _ = self.events.send(DispatchEvent { kind, dispatch });
    }
}

impl Default for DispatchStore {
    fn default() -> Self {
        Self::new()
    }
}

fn whole_seconds(d: Duration) -> Duration {
    Duration::from_secs(d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::TimeInterval;
    use dispatch_core::ValidationConfig;
    use dispatch_recurrence::{Frequency, Weekday};

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn new_dispatch(kind: &str) -> NewDispatch {
        NewDispatch {
            kind: kind.to_string(),
            start_time: ts("2023-01-01T12:00:00Z"),
            duration: Some(Duration::from_secs(1200)),
            target: TargetComponents::Ids(vec![1]),
            active: true,
            dry_run: false,
            payload: serde_json::Value::Null,
            recurrence: RecurrenceRule::default(),
        }
    }

    #[test]
    fn create_assigns_sequential_ids_and_timestamps() {
        let mut store = DispatchStore::new();
        let now = ts("2023-01-01T00:00:00Z");

        let first = store.create(new_dispatch("A"), now).unwrap();
        let second = store.create(new_dispatch("B"), now).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.create_time, first.update_time);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn create_truncates_duration_to_whole_seconds() {
        let mut store = DispatchStore::new();
        let mut new = new_dispatch("A");
        new.duration = Some(Duration::from_millis(1500));

        let created = store.create(new, ts("2023-01-01T00:00:00Z")).unwrap();
        assert_eq!(created.duration, Some(Duration::from_secs(1)));
    }

    #[test]
    fn create_rejects_invalid_recurrence_fields() {
        let mut store = DispatchStore::new();
        let mut new = new_dispatch("A");
        new.recurrence.frequency = Frequency::Hourly;
        new.recurrence.by_minute = vec![99];

        let result = store.create(new, ts("2023-01-01T00:00:00Z"));
        assert!(matches!(result, Err(EngineError::Recurrence(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn strict_weekdays_rejects_unspecified_sentinel() {
        let config = Config {
            validation: ValidationConfig {
                strict_weekdays: true,
            },
            ..Config::default()
        };
        let mut store = DispatchStore::with_config(config);
        let mut new = new_dispatch("A");
        new.recurrence.frequency = Frequency::Weekly;
        new.recurrence.by_weekday = vec![Weekday::Unspecified];

        let result = store.create(new, ts("2023-01-01T00:00:00Z"));
        assert!(matches!(
            result,
            Err(EngineError::Recurrence(RecurrenceError::UnspecifiedWeekday))
        ));
    }

    #[test]
    fn lenient_store_accepts_unspecified_sentinel() {
        let mut store = DispatchStore::new();
        let mut new = new_dispatch("A");
        new.recurrence.frequency = Frequency::Weekly;
        new.recurrence.by_weekday = vec![Weekday::Unspecified];

        let created = store.create(new, ts("2023-01-01T00:00:00Z")).unwrap();
        // Stored, but the degenerate rule never produces a run.
        assert_eq!(created.next_run_after(ts("2022-01-01T00:00:00Z")), None);
    }

    #[test]
    fn update_bumps_update_time_and_keeps_create_time() {
        let mut store = DispatchStore::new();
        let created_at = ts("2023-01-01T00:00:00Z");
        let created = store.create(new_dispatch("A"), created_at).unwrap();

        let updated_at = ts("2023-01-02T00:00:00Z");
        let update = DispatchUpdate {
            active: Some(false),
            ..DispatchUpdate::default()
        };
        let updated = store.update(created.id, &update, updated_at).unwrap();

        assert!(!updated.active);
        assert_eq!(updated.create_time, created_at);
        assert_eq!(updated.update_time, updated_at);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = DispatchStore::new();
        let result = store.update(42, &DispatchUpdate::default(), ts("2023-01-01T00:00:00Z"));
        assert!(matches!(result, Err(EngineError::NotFound(42))));
    }

    #[test]
    fn delete_removes_and_returns_dispatch() {
        let mut store = DispatchStore::new();
        let created = store
            .create(new_dispatch("A"), ts("2023-01-01T00:00:00Z"))
            .unwrap();

        let removed = store.delete(created.id).unwrap();
        assert_eq!(removed.id, created.id);
        assert!(store.get(created.id).is_none());
        assert!(matches!(
            store.delete(created.id),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn list_applies_filters_and_orders_by_id() {
        let mut store = DispatchStore::new();
        let now = ts("2023-01-01T00:00:00Z");

        store.create(new_dispatch("A"), now).unwrap();
        let mut inactive = new_dispatch("B");
        inactive.active = false;
        store.create(inactive, now).unwrap();
        store.create(new_dispatch("C"), now).unwrap();

        let all = store.list(&DispatchFilter::default());
        assert_eq!(
            all.iter().map(|d| d.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        let active_only = DispatchFilter {
            active: Some(true),
            ..DispatchFilter::default()
        };
        let active = store.list(&active_only);
        assert_eq!(active.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 3]);

        let window = DispatchFilter {
            start_time: Some(TimeInterval {
                from: Some(ts("2023-01-01T12:00:00Z")),
                to: Some(ts("2023-01-01T12:00:01Z")),
            }),
            ..DispatchFilter::default()
        };
        assert_eq!(store.list(&window).len(), 3);
    }

    #[tokio::test]
    async fn subscribers_receive_lifecycle_events() {
        let mut store = DispatchStore::new();
        let mut events = store.subscribe();
        let now = ts("2023-01-01T00:00:00Z");

        let created = store.create(new_dispatch("A"), now).unwrap();
        let update = DispatchUpdate {
            active: Some(false),
            ..DispatchUpdate::default()
        };
        store.update(created.id, &update, now).unwrap();
        store.delete(created.id).unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::Created);
        assert_eq!(event.dispatch.id, created.id);

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::Updated);
        assert!(!event.dispatch.active);

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::Deleted);
    }
}
