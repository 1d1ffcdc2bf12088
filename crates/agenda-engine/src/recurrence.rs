//! Recurrence projection -- decides whether an event has an occurrence on a given day.
//!
//! Every rule is phase-locked to the event's anchor date and compared at calendar-day
//! granularity. There is no end date: a recurring event projects forever forward and
//! never backward.

use chrono::{Datelike, NaiveDate};

use crate::event::{Event, Repeat};

const BI_WEEKLY_PERIOD_DAYS: i64 = 14;

/// Returns `true` when `event` has an occurrence on `target`.
///
/// Monthly recurrence compares the day of month naively: an event anchored on the
/// 31st never lands in a month without a 31st.
pub fn projects_onto(event: &Event, target: NaiveDate) -> bool {
    let anchor = event.date;
    match event.repeat {
        Repeat::None => target == anchor,
        Repeat::Weekly => target >= anchor && target.weekday() == anchor.weekday(),
        Repeat::BiWeekly => {
            target >= anchor && (target - anchor).num_days() % BI_WEEKLY_PERIOD_DAYS == 0
        }
        Repeat::Monthly => target >= anchor && target.day() == anchor.day(),
    }
}
