//! Calendar session: one store, one injected blob store, and the
//! check-then-mutate-then-save flow a caller performs for every change.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::conflict::find_conflicts;
use crate::error::{AgendaError, Result};
use crate::event::{Event, EventDraft, TimeWindow};
use crate::persistence::{decode_snapshot, encode_snapshot, BlobStore, EVENTS_KEY};
use crate::store::EventStore;

/// A single-user calendar session over a persistence backend `B`.
#[derive(Debug)]
pub struct Calendar<B: BlobStore> {
    store: EventStore,
    blobs: B,
}

impl<B: BlobStore> Calendar<B> {
    /// Hydrate a session from the blob stored under `"events"`.
    ///
    /// A blob that fails to decode is discarded and the session starts empty.
    ///
    /// # Errors
    /// Propagates storage errors from `load_blob`.
    pub fn open(blobs: B) -> Result<Self> {
        let mut store = EventStore::new();
        match blobs.load_blob(EVENTS_KEY)? {
            Some(blob) => match decode_snapshot(&blob) {
                Ok(snapshot) => store.load(snapshot),
                Err(e) => warn!(error = %e, "persisted events are unreadable, starting empty"),
            },
            None => info!("no persisted events, starting empty"),
        }
        Ok(Self { store, blobs })
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Validate, conflict-check and insert a new event, then persist.
    ///
    /// `today` is the first day on which scheduling is allowed.
    ///
    /// # Errors
    /// - `AgendaError::EmptyName` for a blank name.
    /// - `AgendaError::PastDate` when `draft.date < today`.
    /// - `AgendaError::Conflict` when any occurrence on that day overlaps.
    pub fn schedule(&mut self, draft: EventDraft, today: NaiveDate) -> Result<Event> {
        validate(&draft.name, draft.date, today)?;
        self.ensure_free(draft.date, &draft.window, None)?;

        let event = draft.into_event();
        let mut staged = self.store.clone();
        staged.add(event.clone())?;
        self.commit(staged)?;
        info!(id = %event.id, date = %event.date, "event scheduled");
        Ok(event)
    }

    /// Replace an existing event after re-checking it against every other occurrence.
    ///
    /// # Errors
    /// - `AgendaError::NotFound` when no event with `event.id` exists on `event.date`.
    /// - `AgendaError::InvalidWindow`, `EmptyName`, `PastDate`, `Conflict` as for
    ///   [`Calendar::schedule`].
    pub fn reschedule(&mut self, event: Event, today: NaiveDate) -> Result<()> {
        if !self.store.events_on(event.date).iter().any(|e| e.id == event.id) {
            return Err(AgendaError::NotFound { id: event.id });
        }
        validate(&event.name, event.date, today)?;
        let window = TimeWindow::new(event.start_time, event.end_time)?;
        self.ensure_free(event.date, &window, Some(&event.id))?;

        let id = event.id.clone();
        let mut staged = self.store.clone();
        staged.edit(event);
        self.commit(staged)?;
        info!(%id, "event rescheduled");
        Ok(())
    }

    /// Delete an event and persist. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str, date: NaiveDate) -> Result<bool> {
        let mut staged = self.store.clone();
        let removed = staged.delete(id, date);
        if removed {
            self.commit(staged)?;
        }
        Ok(removed)
    }

    /// Save `staged` under `"events"` and only then make it the live store, so a failed save leaves
    /// the session exactly as it was before the mutation.
    fn commit(&mut self, staged: EventStore) -> Result<()> {
        let blob = encode_snapshot(&staged.snapshot())?;
        self.blobs.save_blob(EVENTS_KEY, &blob)?;
        self.store = staged;
        Ok(())
    }

    fn ensure_free(
        &self,
        date: NaiveDate,
        window: &TimeWindow,
        exclude_id: Option<&str>,
    ) -> Result<()> {
        match find_conflicts(&self.store, date, window, exclude_id).first() {
            Some(conflict) => Err(AgendaError::Conflict {
                existing_id: conflict.occurrence.id.clone(),
                date,
                overlap_minutes: conflict.overlap_minutes,
            }),
            None => Ok(()),
        }
    }
}

fn validate(name: &str, date: NaiveDate, today: NaiveDate) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AgendaError::EmptyName);
    }
    if date < today {
        return Err(AgendaError::PastDate { date, today });
    }
    Ok(())
}
