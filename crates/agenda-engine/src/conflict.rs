//! Detect collisions between a candidate window and the occurrences on a target day.
//!
//! Relevance and overlap are separate steps. [`find_relevant_occurrences`] collects
//! every occurrence that exists on the day, regardless of time. [`find_conflicts`]
//! then keeps those whose window overlaps the candidate. Adjacent windows (where one
//! ends exactly when another starts) are NOT conflicts.

use chrono::NaiveDate;

use crate::event::{Event, TimeWindow};
use crate::recurrence::projects_onto;
use crate::store::EventStore;

/// An existing occurrence that collides with a candidate window.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict<'a> {
    pub occurrence: &'a Event,
    pub date: NaiveDate,
    pub overlap_minutes: i64,
}

/// Collect the events that have an occurrence on `target`.
///
/// Events anchored on `target` are always included. Recurring events anchored on
/// other days are included when their rule projects onto `target`. The event whose id
/// equals `exclude_id` is skipped, so an edit is checked only against the others.
///
/// Results are ordered by anchor date, then insertion order within a day. The
/// candidate time window plays no part here; pass it to [`find_conflicts`] for the
/// overlap gate used before a mutation.
pub fn find_relevant_occurrences<'a>(
    store: &'a EventStore,
    target: NaiveDate,
    exclude_id: Option<&str>,
) -> Vec<&'a Event> {
    store
        .iter()
        .filter(|e| exclude_id != Some(e.id.as_str()))
        .filter(|e| e.date == target || (e.repeat.is_recurring() && projects_onto(e, target)))
        .collect()
}

/// Find every occurrence on `target` whose window overlaps `window`.
///
/// Two windows overlap iff `a.start < b.end && b.start < a.end`.
pub fn find_conflicts<'a>(
    store: &'a EventStore,
    target: NaiveDate,
    window: &TimeWindow,
    exclude_id: Option<&str>,
) -> Vec<Conflict<'a>> {
    find_relevant_occurrences(store, target, exclude_id)
        .into_iter()
        .filter_map(|occurrence| {
            let existing = occurrence.window();
            existing.overlaps(window).then(|| Conflict {
                occurrence,
                date: target,
                overlap_minutes: existing.overlap_minutes(window),
            })
        })
        .collect()
}

/// `true` when `window` on `target` collides with any occurrence.
pub fn has_conflict(
    store: &EventStore,
    target: NaiveDate,
    window: &TimeWindow,
    exclude_id: Option<&str>,
) -> bool {
    !find_conflicts(store, target, window, exclude_id).is_empty()
}
