//! Event model: the stored record, its recurrence rule, and its time window.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AgendaError, Result};

/// Recurrence rule, phase-locked to the event's anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Repeat {
    /// Occurs only on its anchor date.
    #[default]
    None,
    /// Same weekday, every week from the anchor on.
    Weekly,
    /// Every 14 days from the anchor on.
    BiWeekly,
    /// Same day of month, every month from the anchor on.
    Monthly,
}

impl Repeat {
    pub fn is_recurring(self) -> bool {
        self != Repeat::None
    }

    pub fn label(self) -> &'static str {
        match self {
            Repeat::None => "Does not repeat",
            Repeat::Weekly => "Weekly",
            Repeat::BiWeekly => "Every 2 weeks",
            Repeat::Monthly => "Monthly",
        }
    }
}

/// A half-open wall-clock interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    /// Build a window, rejecting zero-length and inverted ranges.
    ///
    /// # Errors
    /// Returns `AgendaError::InvalidWindow` when `end <= start`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if end <= start {
            return Err(AgendaError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Two windows overlap iff `a.start < b.end && b.start < a.end`.
    ///
    /// Touching windows (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Minutes shared by both windows, or 0 when they do not overlap.
    pub fn overlap_minutes(&self, other: &TimeWindow) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end - start).num_minutes()
    }
}

/// A scheduled activity anchored on a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub repeat: Repeat,
}

impl Event {
    /// The event's wall-clock window. Stored events are trusted to satisfy
    /// `start_time < end_time`.
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// Caller-supplied fields for a new event, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub date: NaiveDate,
    pub window: TimeWindow,
    pub repeat: Repeat,
}

impl EventDraft {
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        window: TimeWindow,
        repeat: Repeat,
    ) -> Self {
        Self {
            name: name.into(),
            date,
            window,
            repeat,
        }
    }

    /// Materialize the draft with a fresh `event-<uuid>` identifier.
    pub fn into_event(self) -> Event {
        self.into_event_with_id(new_event_id())
    }

    pub fn into_event_with_id(self, id: impl Into<String>) -> Event {
        Event {
            id: id.into(),
            name: self.name,
            date: self.date,
            start_time: self.window.start,
            end_time: self.window.end,
            repeat: self.repeat,
        }
    }
}

pub fn new_event_id() -> String {
    format!("event-{}", Uuid::new_v4())
}
