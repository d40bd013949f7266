//! The authoritative event collection.
//!
//! Sole owner of event lifetime. Every mutation clamps ranges, mirrors the
//! full collection to the blob store under [`EVENTS_KEY`], and synchronously
//! invokes subscribed observers with the fresh listing. Persistence is
//! best-effort: a failed write is logged and the in-memory mutation stands.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::storage::BlobStore;
use crate::types::{seed_events, Event, EventPatch};
use crate::urgency;

/// Blob-store key for the event collection.
pub const EVENTS_KEY: &str = "schedule_events";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an event with id {0} already exists")]
    DuplicateId(String),
}

type Observer = Box<dyn Fn(&[Event]) + Send>;

pub struct EventStore {
    events: Vec<Event>,
    storage: Box<dyn BlobStore>,
    observers: Vec<Observer>,
}

impl EventStore {
    /// Rehydrate from the blob store, falling back to the seed schedule when
    /// the blob is empty or absent (the seed is persisted immediately so the
    /// next construction sees it).
    pub fn new(storage: Box<dyn BlobStore>) -> Self {
        let events = match storage.get(EVENTS_KEY) {
            Some(blob) => match serde_json::from_value::<Vec<Event>>(blob) {
                Ok(events) => events,
                Err(e) => {
                    log::warn!("stored events unreadable, starting from seed: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let mut store = Self {
            events,
            storage,
            observers: Vec::new(),
        };
        if store.events.is_empty() {
            store.events = seed_events();
            store.persist();
        }
        store
    }

    /// Register an observer invoked synchronously after each mutation.
    pub fn subscribe(&mut self, observer: impl Fn(&[Event]) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Append an event. The store assigns an id when the caller left it
    /// empty; a caller-supplied id that already exists is rejected.
    pub fn add(&mut self, mut event: Event) -> Result<(), StoreError> {
        if event.id.is_empty() {
            event.id = generate_id();
        } else if self.events.iter().any(|e| e.id == event.id) {
            return Err(StoreError::DuplicateId(event.id));
        }
        clamp(&mut event);
        self.events.push(event);
        self.persist();
        self.notify();
        Ok(())
    }

    /// Merge partial fields into the matching event. A missing id is the
    /// identity, not an error; the caller can detect non-mutation by count
    /// or value comparison. The patch's own `id` never reassigns the target.
    pub fn update(&mut self, id: &str, patch: &EventPatch) -> bool {
        let mut matched = false;
        if let Some(event) = self.events.iter_mut().find(|e| e.id == id) {
            merge(event, patch);
            clamp(event);
            matched = true;
        }
        self.persist();
        self.notify();
        matched
    }

    /// Remove the matching event; no-op if absent.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        let removed = self.events.len() != before;
        self.persist();
        self.notify();
        removed
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Defensive copy in stable insertion order.
    pub fn list_all(&self) -> Vec<Event> {
        self.events.clone()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Recompute urgency and color for every event against `now`. The only
    /// place wall-clock time enters the store; callers decide when to tick.
    ///
    /// Events without a parsable end time or an effort estimate keep their
    /// stored urgency (there is nothing to derive it from).
    pub fn refresh_urgencies(&mut self, now: NaiveDateTime) {
        for event in &mut self.events {
            let (Some(end), Some(estimate)) =
                (parse_time(&event.end_time), event.details.estimated_hours)
            else {
                continue;
            };
            let remaining_hours = (end - now).num_minutes() as f64 / 60.0;
            event.urgency = urgency::urgency(event.importance, event.size, remaining_hours, estimate);
            event.color = urgency::color(event.urgency);
        }
        self.persist();
        self.notify();
    }

    fn persist(&self) {
        match serde_json::to_value(&self.events) {
            Ok(blob) => {
                if let Err(e) = self.storage.set(EVENTS_KEY, &blob) {
                    log::error!("failed to persist events: {e}");
                }
            }
            Err(e) => log::error!("failed to serialize events: {e}"),
        }
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer(&self.events);
        }
    }
}

/// Fresh date-anchored id, e.g. `evt_20260830_1f3a9c2d`.
pub fn generate_id() -> String {
    let date = chrono::Local::now().format("%Y%m%d");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("evt_{date}_{}", &suffix[..8])
}

fn merge(event: &mut Event, patch: &EventPatch) {
    if let Some(name) = &patch.name {
        event.name = name.clone();
    }
    if let Some(size) = patch.size {
        event.size = size;
    }
    if let Some(importance) = patch.importance {
        event.importance = importance;
    }
    if let Some(urgency_value) = patch.urgency {
        event.urgency = urgency_value;
        event.color = urgency::color(urgency_value.clamp(0.0, 1.0));
    }
    if let Some(color) = &patch.color {
        event.color = color.clone();
    }
    if let Some(start) = &patch.start_time {
        event.start_time = start.clone();
    }
    if let Some(end) = &patch.end_time {
        event.end_time = end.clone();
    }
    if let Some(details) = &patch.details {
        if details.location.is_some() {
            event.details.location = details.location.clone();
        }
        if details.notes.is_some() {
            event.details.notes = details.notes.clone();
        }
        if details.estimated_hours.is_some() {
            event.details.estimated_hours = details.estimated_hours;
        }
    }
}

fn clamp(event: &mut Event) {
    event.importance = event.importance.clamp(0.0, 1.0);
    event.urgency = event.urgency.clamp(0.0, 1.0);
    event.size = event.size.clamp(0.0, 100.0);
}

/// Parse the serialized textual timestamps events carry. Accepts ISO-8601
/// variants and the original app's `YYYY-MM-DD HH:MM` form.
pub fn parse_time(value: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::EventDetails;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn event(id: &str, name: &str) -> Event {
        Event {
            id: id.to_string(),
            name: name.to_string(),
            size: 50.0,
            color: "#4caf50".to_string(),
            importance: 0.5,
            urgency: 0.5,
            start_time: "2026-09-01 10:00".to_string(),
            end_time: "2026-09-01 12:00".to_string(),
            details: EventDetails::default(),
        }
    }

    fn empty_store() -> EventStore {
        // Pre-seed the blob with an empty-but-present marker event list so
        // construction doesn't fall back to the seed schedule.
        let storage = MemoryStore::new();
        storage
            .set(EVENTS_KEY, &serde_json::json!([{
                "id": "evt_base", "name": "base",
                "startTime": "", "endTime": ""
            }]))
            .unwrap();
        let mut store = EventStore::new(Box::new(storage));
        store.delete("evt_base");
        store
    }

    #[test]
    fn seeds_when_blob_absent() {
        let store = EventStore::new(Box::new(MemoryStore::new()));
        assert!(!store.is_empty());
        assert!(store.get("evt_001").is_some());
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut store = empty_store();
        store.add(event("evt_a", "one")).unwrap();
        let err = store.add(event("evt_a", "two")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == "evt_a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_assigns_id_when_absent() {
        let mut store = empty_store();
        store.add(event("", "unnamed id")).unwrap();
        let listing = store.list_all();
        assert!(listing[0].id.starts_with("evt_"));
    }

    #[test]
    fn empty_patch_update_is_identity() {
        let mut store = empty_store();
        store.add(event("evt_a", "one")).unwrap();
        let before = store.list_all();
        assert!(store.update("evt_a", &EventPatch::default()));
        assert_eq!(store.list_all(), before);
    }

    #[test]
    fn update_missing_id_is_noop_not_error() {
        let mut store = empty_store();
        store.add(event("evt_a", "one")).unwrap();
        let before = store.list_all();
        assert!(!store.update("evt_zzz", &EventPatch {
            name: Some("ghost".to_string()),
            ..Default::default()
        }));
        assert_eq!(store.list_all(), before);
    }

    #[test]
    fn update_clamps_and_recolors() {
        let mut store = empty_store();
        store.add(event("evt_a", "one")).unwrap();
        store.update("evt_a", &EventPatch {
            importance: Some(3.0),
            urgency: Some(1.5),
            size: Some(-20.0),
            ..Default::default()
        });
        let updated = store.get("evt_a").unwrap();
        assert_eq!(updated.importance, 1.0);
        assert_eq!(updated.urgency, 1.0);
        assert_eq!(updated.size, 0.0);
        assert_eq!(updated.color, urgency::color(1.0));
    }

    #[test]
    fn double_delete_is_noop() {
        let mut store = empty_store();
        store.add(event("evt_a", "one")).unwrap();
        assert!(store.delete("evt_a"));
        assert!(!store.delete("evt_a"));
        assert!(store.get("evt_a").is_none());
    }

    #[test]
    fn persisted_listing_survives_reload() {
        let storage = Arc::new(MemoryStore::new());

        struct Shared(Arc<MemoryStore>);
        impl BlobStore for Shared {
            fn get(&self, key: &str) -> Option<serde_json::Value> {
                self.0.get(key)
            }
            fn set(
                &self,
                key: &str,
                value: &serde_json::Value,
            ) -> Result<(), crate::storage::StorageError> {
                self.0.set(key, value)
            }
        }

        let mut store = EventStore::new(Box::new(Shared(storage.clone())));
        store.add(event("evt_new", "added later")).unwrap();
        let before = store.list_all();

        let reloaded = EventStore::new(Box::new(Shared(storage)));
        assert_eq!(reloaded.list_all(), before);
    }

    #[test]
    fn observers_fire_on_each_mutation() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let mut store = empty_store();
        store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        store.add(event("evt_a", "one")).unwrap();
        store.update("evt_a", &EventPatch::default());
        store.delete("evt_a");
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn refresh_urgencies_derives_from_deadline() {
        let mut store = empty_store();
        let mut e = event("evt_a", "due soon");
        e.importance = 1.0;
        e.size = 100.0;
        e.end_time = "2026-09-01 12:00".to_string();
        e.details.estimated_hours = Some(4.0);
        store.add(e).unwrap();

        // Two hours before a four-hour task's deadline: maximally urgent.
        let now = parse_time("2026-09-01 10:00").unwrap();
        store.refresh_urgencies(now);
        let refreshed = store.get("evt_a").unwrap();
        assert_eq!(refreshed.urgency, 1.0);
        assert_eq!(refreshed.color, urgency::color(1.0));

        // Past the deadline stays pinned at 1.
        let later = parse_time("2026-09-01 13:00").unwrap();
        store.refresh_urgencies(later);
        assert_eq!(store.get("evt_a").unwrap().urgency, 1.0);
    }

    #[test]
    fn parse_time_accepts_iso_variants() {
        assert!(parse_time("2026-09-01 10:00").is_some());
        assert!(parse_time("2026-09-01T10:00:00").is_some());
        assert!(parse_time("2026-09-01T10:00:00+08:00").is_some());
        assert!(parse_time("next tuesday").is_none());
    }
}
