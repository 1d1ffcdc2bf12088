//! Error types for agenda-engine operations.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgendaError {
    /// The candidate window overlaps an occurrence already on the calendar.
    #[error("conflicts with event '{existing_id}' on {date} ({overlap_minutes} min overlap)")]
    Conflict {
        existing_id: String,
        date: NaiveDate,
        overlap_minutes: i64,
    },

    #[error("invalid time window: end {end} is not after start {start}")]
    InvalidWindow { start: NaiveTime, end: NaiveTime },

    #[error("cannot schedule on {date}: it is before {today}")]
    PastDate { date: NaiveDate, today: NaiveDate },

    #[error("event name must not be empty")]
    EmptyName,

    #[error("no event with id '{id}'")]
    NotFound { id: String },

    #[error("invalid clock time: {0}")]
    InvalidClockTime(String),

    #[error("snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AgendaError>;
