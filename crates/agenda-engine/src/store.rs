//! In-memory event store keyed by anchor day.
//!
//! The store owns every `Event`. It enforces only the direct same-day overlap rule on
//! `add`; recurrence-aware checks belong to [`crate::conflict`], which the caller runs
//! before mutating.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{AgendaError, Result};
use crate::event::Event;

/// Full mapping from anchor day to the events placed on it, in insertion order.
///
/// Keys serialize as `YYYY-MM-DD` day-keys.
pub type Snapshot = BTreeMap<NaiveDate, Vec<Event>>;

/// Authoritative mapping from calendar day to the events anchored there.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    days: Snapshot,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { days: snapshot }
    }

    /// Replace the entire mapping. Persisted data is trusted as-is.
    pub fn load(&mut self, snapshot: Snapshot) {
        debug!(days = snapshot.len(), "loading event snapshot");
        self.days = snapshot;
    }

    /// Insert `event` into the bucket for its anchor date.
    ///
    /// Only events stored directly on that day are checked; recurring events anchored
    /// elsewhere are not expanded here.
    ///
    /// # Errors
    /// Returns `AgendaError::Conflict` if a direct event on the same day overlaps
    /// `event`. The store is left unchanged.
    pub fn add(&mut self, event: Event) -> Result<()> {
        let window = event.window();
        if let Some(existing) = self
            .events_on(event.date)
            .iter()
            .find(|e| e.window().overlaps(&window))
        {
            warn!(
                id = %event.id,
                existing = %existing.id,
                date = %event.date,
                "rejected overlapping insert"
            );
            return Err(AgendaError::Conflict {
                existing_id: existing.id.clone(),
                date: event.date,
                overlap_minutes: existing.window().overlap_minutes(&window),
            });
        }

        debug!(id = %event.id, date = %event.date, "event added");
        self.days.entry(event.date).or_default().push(event);
        Ok(())
    }

    /// Replace the event with the same `id` in the bucket for `event.date`.
    ///
    /// Does not re-check conflicts. A no-op when no such event exists; returns whether
    /// a replacement happened.
    pub fn edit(&mut self, event: Event) -> bool {
        let Some(slot) = self
            .days
            .get_mut(&event.date)
            .and_then(|bucket| bucket.iter_mut().find(|e| e.id == event.id))
        else {
            debug!(id = %event.id, date = %event.date, "edit target not found");
            return false;
        };
        debug!(id = %event.id, date = %event.date, "event edited");
        *slot = event;
        true
    }

    /// Remove the event `id` from the bucket for `date`. A no-op when absent; returns
    /// whether anything was removed. A bucket left empty is dropped.
    pub fn delete(&mut self, id: &str, date: NaiveDate) -> bool {
        let Some(bucket) = self.days.get_mut(&date) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|e| e.id != id);
        let removed = bucket.len() != before;
        if bucket.is_empty() {
            self.days.remove(&date);
        }
        if removed {
            debug!(id, %date, "event deleted");
        }
        removed
    }

    /// Clone of the full mapping, suitable for persistence.
    pub fn snapshot(&self) -> Snapshot {
        self.days.clone()
    }

    /// Events anchored directly on `date`, without recurrence expansion.
    pub fn events_on(&self, date: NaiveDate) -> &[Event] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All events with their anchor days, ordered by day then insertion.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.days.values().flatten()
    }

    pub fn find(&self, id: &str) -> Option<&Event> {
        self.iter().find(|e| e.id == id)
    }

    /// Days carrying at least one directly anchored event.
    pub fn marked_dates(&self) -> Vec<NaiveDate> {
        self.days
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(date, _)| *date)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
