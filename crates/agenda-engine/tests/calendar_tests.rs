//! Tests for the calendar session: validation, conflict gating and persistence.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use agenda_engine::error::Result;
use agenda_engine::persistence::{decode_snapshot, encode_snapshot};
use agenda_engine::{
    AgendaError, BlobStore, Calendar, EventDraft, FileBlobStore, MemoryBlobStore, Repeat,
    EVENTS_KEY,
};
use common::{date, event, time, window};

fn today() -> chrono::NaiveDate {
    date(2025, 2, 1)
}

fn draft(
    name: &str,
    on: chrono::NaiveDate,
    start: (u32, u32),
    end: (u32, u32),
    repeat: Repeat,
) -> EventDraft {
    EventDraft::new(name, on, window(start, end), repeat)
}

#[test]
fn open_without_blob_starts_empty() {
    let calendar = Calendar::open(MemoryBlobStore::new()).unwrap();
    assert!(calendar.store().is_empty());
}

#[test]
fn open_hydrates_from_events_blob() {
    let mut seed = agenda_engine::EventStore::new();
    seed.add(event("a", date(2025, 2, 18), (9, 0), (10, 0), Repeat::Weekly))
        .unwrap();
    let blob = encode_snapshot(&seed.snapshot()).unwrap();

    let calendar = Calendar::open(MemoryBlobStore::with_blob(EVENTS_KEY, blob)).unwrap();

    assert_eq!(calendar.store().snapshot(), seed.snapshot());
}

#[test]
fn open_recovers_from_corrupt_blob() {
    let calendar = Calendar::open(MemoryBlobStore::with_blob(EVENTS_KEY, "not json")).unwrap();
    assert!(calendar.store().is_empty());
}

#[test]
fn schedule_persists_new_event() {
    let mut calendar = Calendar::open(MemoryBlobStore::new()).unwrap();

    let event = calendar
        .schedule(draft("Standup", date(2025, 2, 18), (9, 0), (9, 15), Repeat::Weekly), today())
        .unwrap();

    assert!(event.id.starts_with("event-"));
    let saved = calendar.blobs().load_blob(EVENTS_KEY).unwrap().unwrap();
    let snapshot = decode_snapshot(&saved).unwrap();
    assert_eq!(snapshot[&date(2025, 2, 18)], vec![event]);
}

#[test]
fn schedule_rejects_recurring_conflict_from_another_day() {
    let mut calendar = Calendar::open(MemoryBlobStore::new()).unwrap();
    let weekly = calendar
        .schedule(draft("Gym", date(2025, 2, 18), (18, 0), (19, 0), Repeat::Weekly), today())
        .unwrap();

    let err = calendar
        .schedule(draft("Dinner", date(2025, 3, 4), (18, 30), (20, 0), Repeat::None), today())
        .unwrap_err();

    match err {
        AgendaError::Conflict {
            existing_id,
            date: on,
            overlap_minutes,
        } => {
            assert_eq!(existing_id, weekly.id);
            assert_eq!(on, date(2025, 3, 4));
            assert_eq!(overlap_minutes, 30);
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
    assert_eq!(calendar.store().len(), 1);
}

#[test]
fn schedule_accepts_touching_windows() {
    let mut calendar = Calendar::open(MemoryBlobStore::new()).unwrap();
    calendar
        .schedule(draft("A", date(2025, 2, 18), (9, 0), (10, 0), Repeat::None), today())
        .unwrap();

    assert!(calendar
        .schedule(draft("B", date(2025, 2, 18), (10, 0), (11, 0), Repeat::None), today())
        .is_ok());
}

#[test]
fn schedule_rejects_past_dates() {
    let mut calendar = Calendar::open(MemoryBlobStore::new()).unwrap();

    let err = calendar
        .schedule(draft("Late", date(2025, 1, 31), (9, 0), (10, 0), Repeat::None), today())
        .unwrap_err();

    assert!(matches!(err, AgendaError::PastDate { .. }));
    assert!(calendar.store().is_empty());
}

#[test]
fn schedule_allows_today() {
    let mut calendar = Calendar::open(MemoryBlobStore::new()).unwrap();
    assert!(calendar
        .schedule(draft("Now", today(), (9, 0), (10, 0), Repeat::None), today())
        .is_ok());
}

#[test]
fn schedule_rejects_blank_names() {
    let mut calendar = Calendar::open(MemoryBlobStore::new()).unwrap();

    let err = calendar
        .schedule(draft("   ", date(2025, 2, 18), (9, 0), (10, 0), Repeat::None), today())
        .unwrap_err();

    assert!(matches!(err, AgendaError::EmptyName));
}

#[test]
fn reschedule_unmoved_event_does_not_self_conflict() {
    let mut calendar = Calendar::open(MemoryBlobStore::new()).unwrap();
    let mut event = calendar
        .schedule(draft("Review", date(2025, 2, 18), (10, 0), (11, 0), Repeat::Weekly), today())
        .unwrap();

    event.name = "Design review".into();
    calendar.reschedule(event.clone(), today()).unwrap();

    assert_eq!(calendar.store().find(&event.id), Some(&event));
}

#[test]
fn reschedule_into_another_occurrence_conflicts() {
    let mut calendar = Calendar::open(MemoryBlobStore::new()).unwrap();
    calendar
        .schedule(draft("Lunch", date(2025, 2, 4), (12, 0), (13, 0), Repeat::Weekly), today())
        .unwrap();
    let mut event = calendar
        .schedule(draft("Call", date(2025, 2, 18), (9, 0), (10, 0), Repeat::None), today())
        .unwrap();

    event.start_time = time(12, 30);
    event.end_time = time(13, 30);
    let err = calendar.reschedule(event.clone(), today()).unwrap_err();

    assert!(matches!(err, AgendaError::Conflict { .. }));
    assert_eq!(
        calendar.store().find(&event.id).map(|e| e.start_time),
        Some(time(9, 0))
    );
}

#[test]
fn reschedule_rejects_inverted_window() {
    let mut calendar = Calendar::open(MemoryBlobStore::new()).unwrap();
    let mut event = calendar
        .schedule(draft("Call", date(2025, 2, 18), (9, 0), (10, 0), Repeat::None), today())
        .unwrap();

    event.end_time = time(8, 0);

    assert!(matches!(
        calendar.reschedule(event, today()),
        Err(AgendaError::InvalidWindow { .. })
    ));
}

#[test]
fn reschedule_unknown_event_is_not_found() {
    let mut calendar = Calendar::open(MemoryBlobStore::new()).unwrap();

    let err = calendar
        .reschedule(event("ghost", date(2025, 2, 18), (9, 0), (10, 0), Repeat::None), today())
        .unwrap_err();

    assert!(matches!(err, AgendaError::NotFound { id } if id == "ghost"));
}

#[test]
fn remove_persists_and_reports() {
    let mut calendar = Calendar::open(MemoryBlobStore::new()).unwrap();
    let event = calendar
        .schedule(draft("Call", date(2025, 2, 18), (9, 0), (10, 0), Repeat::None), today())
        .unwrap();

    assert!(calendar.remove(&event.id, event.date).unwrap());
    assert!(!calendar.remove(&event.id, event.date).unwrap());

    let saved = calendar.blobs().load_blob(EVENTS_KEY).unwrap().unwrap();
    assert_eq!(saved, "{}");
}

#[test]
fn file_backed_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let mut calendar = Calendar::open(FileBlobStore::new(dir.path())).unwrap();
    let event = calendar
        .schedule(draft("Sync", date(2025, 2, 18), (9, 0), (10, 0), Repeat::BiWeekly), today())
        .unwrap();
    drop(calendar);

    let reopened = Calendar::open(FileBlobStore::new(dir.path())).unwrap();
    assert_eq!(reopened.store().find(&event.id), Some(&event));
}

/// Blob store whose writes fail while the shared flag is set.
#[derive(Default)]
struct UnreliableBlobs {
    inner: MemoryBlobStore,
    fail_saves: Rc<Cell<bool>>,
}

impl BlobStore for UnreliableBlobs {
    fn load_blob(&self, key: &str) -> Result<Option<String>> {
        self.inner.load_blob(key)
    }

    fn save_blob(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_saves.get() {
            return Err(AgendaError::Storage {
                path: "events.json".into(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.inner.save_blob(key, value)
    }
}

/// A calendar over `UnreliableBlobs` plus the switch that makes its saves fail.
fn unreliable_calendar() -> (Calendar<UnreliableBlobs>, Rc<Cell<bool>>) {
    let blobs = UnreliableBlobs::default();
    let switch = Rc::clone(&blobs.fail_saves);
    (Calendar::open(blobs).unwrap(), switch)
}

#[test]
fn failed_save_leaves_schedule_unapplied_and_retry_succeeds() {
    let (mut calendar, fail_saves) = unreliable_calendar();
    let slot = || draft("A", date(2030, 1, 1), (9, 0), (10, 0), Repeat::None);

    fail_saves.set(true);
    let err = calendar.schedule(slot(), today()).unwrap_err();
    assert!(matches!(err, AgendaError::Storage { .. }));
    assert!(calendar.store().is_empty());
    assert_eq!(calendar.blobs().load_blob(EVENTS_KEY).unwrap(), None);

    fail_saves.set(false);
    let event = calendar.schedule(slot(), today()).unwrap();
    assert_eq!(calendar.store().find(&event.id), Some(&event));
}

#[test]
fn failed_save_leaves_reschedule_unapplied() {
    let (mut calendar, fail_saves) = unreliable_calendar();
    let original = calendar
        .schedule(draft("Call", date(2025, 2, 18), (9, 0), (10, 0), Repeat::None), today())
        .unwrap();
    let before = calendar.store().snapshot();

    let mut moved = original.clone();
    moved.start_time = time(14, 0);
    moved.end_time = time(15, 0);
    fail_saves.set(true);

    assert!(matches!(
        calendar.reschedule(moved.clone(), today()),
        Err(AgendaError::Storage { .. })
    ));
    assert_eq!(calendar.store().snapshot(), before);

    fail_saves.set(false);
    calendar.reschedule(moved.clone(), today()).unwrap();
    assert_eq!(calendar.store().find(&original.id), Some(&moved));
}

#[test]
fn failed_save_leaves_remove_unapplied() {
    let (mut calendar, fail_saves) = unreliable_calendar();
    let event = calendar
        .schedule(draft("Call", date(2025, 2, 18), (9, 0), (10, 0), Repeat::None), today())
        .unwrap();

    fail_saves.set(true);
    assert!(calendar.remove(&event.id, event.date).is_err());
    assert_eq!(calendar.store().find(&event.id), Some(&event));

    fail_saves.set(false);
    assert!(calendar.remove(&event.id, event.date).unwrap());
    assert!(calendar.store().is_empty());
}
