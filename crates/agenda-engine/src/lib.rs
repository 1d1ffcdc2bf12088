//! # agenda-engine
//!
//! Event store and recurring-event conflict detection for a single-user local
//! calendar.
//!
//! Events are anchored on a calendar day and may repeat weekly, every two weeks, or
//! monthly. Before a caller adds or edits an event it asks the engine which
//! occurrences exist on the target day (including ones projected there by recurrence
//! rules anchored elsewhere) and whether the candidate window overlaps any of them.
//!
//! ## Modules
//!
//! - [`event`] — `Event`, `Repeat`, `TimeWindow`, `EventDraft`
//! - [`recurrence`] — Does an event project an occurrence onto a given day?
//! - [`conflict`] — Relevant occurrences and half-open overlap checks
//! - [`store`] — Day-keyed `EventStore` with direct overlap rejection
//! - [`persistence`] — `BlobStore` port, file and memory backends, snapshot codec
//! - [`calendar`] — Session facade: validate, check, mutate, persist
//! - [`clock`] — 12/24-hour wall-clock parsing
//! - [`error`] — Error types

pub mod calendar;
pub mod clock;
pub mod conflict;
pub mod error;
pub mod event;
pub mod persistence;
pub mod recurrence;
pub mod store;

pub use calendar::Calendar;
pub use conflict::{find_conflicts, find_relevant_occurrences, has_conflict, Conflict};
pub use error::AgendaError;
pub use event::{Event, EventDraft, Repeat, TimeWindow};
pub use persistence::{BlobStore, FileBlobStore, MemoryBlobStore, EVENTS_KEY};
pub use recurrence::projects_onto;
pub use store::{EventStore, Snapshot};
