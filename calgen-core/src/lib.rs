//! Core of calgen: weekly meeting descriptors and the logic that
//! reconciles them with a remote calendar.
//!
//! - `descriptor` loads the events file
//! - `occurrence` works out when the next meeting falls
//! - `existence`, `upsert`, `clear` and `preview` are the calendar operations
//! - `remote` is the seam to the calendar service

pub mod clear;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod existence;
pub mod occurrence;
pub mod preview;
pub mod remote;
pub mod upsert;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use descriptor::EventDescriptor;
pub use error::{CalgenError, CalgenResult};
pub use occurrence::Schedule;
pub use remote::{CalendarApi, EventQuery, NewEvent, RemoteEvent, TokenSource};
