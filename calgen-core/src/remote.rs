//! The calendar service as seen by calgen.
//!
//! `CalendarApi` and `TokenSource` are implemented by the Google provider
//! crate for real runs and by in-memory fakes in tests.

#![allow(async_fn_in_trait)]

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Recurrence rule attached to every generated meeting (weekly, never ending).
pub const WEEKLY_RRULE: &str = "RRULE:FREQ=WEEKLY";

/// An event as returned by the calendar service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEvent {
    pub id: String,
    pub title: String,
    /// Id of the recurring series this occurrence belongs to, if any.
    pub series_id: Option<String>,
}

/// Filters for a list call.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
    /// Expand recurring series into their concrete occurrences.
    pub expand_recurring: bool,
}

impl EventQuery {
    /// Everything on the calendar, series left unexpanded.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Self {
        EventQuery {
            time_min: Some(time_min),
            time_max: Some(time_max),
            expand_recurring: true,
        }
    }
}

/// Payload for creating a weekly meeting.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// IANA name stamped on both start and end.
    pub time_zone: String,
    pub recurrence: Vec<String>,
}

/// Calendar v3 `EventDateTime` shape.
struct ZonedTime<'a> {
    at: &'a DateTime<Tz>,
    time_zone: &'a str,
}

impl Serialize for ZonedTime<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("EventDateTime", 2)?;
        s.serialize_field(
            "dateTime",
            &self.at.to_rfc3339_opts(SecondsFormat::Secs, false),
        )?;
        s.serialize_field("timeZone", self.time_zone)?;
        s.end()
    }
}

impl Serialize for NewEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Event", 5)?;
        s.serialize_field("summary", &self.summary)?;
        s.serialize_field("description", &self.description)?;
        s.serialize_field(
            "start",
            &ZonedTime {
                at: &self.start,
                time_zone: &self.time_zone,
            },
        )?;
        s.serialize_field(
            "end",
            &ZonedTime {
                at: &self.end,
                time_zone: &self.time_zone,
            },
        )?;
        s.serialize_field("recurrence", &self.recurrence)?;
        s.end()
    }
}

/// The operations calgen needs from a calendar service.
pub trait CalendarApi {
    async fn list_events(&self, calendar_id: &str, query: &EventQuery) -> Result<Vec<RemoteEvent>>;

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> Result<RemoteEvent>;

    /// Deletes a single event, or a whole series when given a series id.
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()>;
}

/// Something that can hand out a bearer token for the calendar service.
pub trait TokenSource {
    async fn access_token(&self) -> Result<String>;
}
