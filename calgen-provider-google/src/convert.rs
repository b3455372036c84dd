//! Conversions between calgen's event types and the Calendar v3 types.

use calgen_core::{NewEvent, RemoteEvent};
use chrono::Utc;
use google_calendar::types::{Event, EventDateTime};

pub trait ToGoogle {
    fn to_google(&self) -> Event;
}

pub trait FromGoogle {
    fn from_google(event: Event) -> Self;
}

impl ToGoogle for NewEvent {
    fn to_google(&self) -> Event {
        let stamp = |at: &chrono::DateTime<chrono_tz::Tz>| EventDateTime {
            date: None,
            date_time: Some(at.with_timezone(&Utc)),
            time_zone: self.time_zone.clone(),
        };

        Event {
            summary: self.summary.clone(),
            description: self.description.clone(),
            start: Some(stamp(&self.start)),
            end: Some(stamp(&self.end)),
            recurrence: self.recurrence.clone(),
            ..Default::default()
        }
    }
}

impl FromGoogle for RemoteEvent {
    fn from_google(event: Event) -> Self {
        let series_id = if event.recurring_event_id.is_empty() {
            None
        } else {
            Some(event.recurring_event_id)
        };

        RemoteEvent {
            id: event.id,
            title: event.summary,
            series_id,
        }
    }
}
