//! Shared builders for agenda-engine integration tests.

#![allow(dead_code)]

use agenda_engine::{Event, Repeat, TimeWindow};
use chrono::{NaiveDate, NaiveTime};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn time(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap()
}

pub fn window(start: (u32, u32), end: (u32, u32)) -> TimeWindow {
    TimeWindow::new(time(start.0, start.1), time(end.0, end.1)).unwrap()
}

/// Helper to create an Event from an anchor date and hour ranges.
pub fn event(
    id: &str,
    anchor: NaiveDate,
    start: (u32, u32),
    end: (u32, u32),
    repeat: Repeat,
) -> Event {
    Event {
        id: id.to_string(),
        name: format!("Event {id}"),
        date: anchor,
        start_time: time(start.0, start.1),
        end_time: time(end.0, end.1),
        repeat,
    }
}
