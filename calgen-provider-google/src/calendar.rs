//! Google Calendar v3 implementation of [`CalendarApi`].

use anyhow::{Context, Result};
use calgen_core::{CalendarApi, EventQuery, NewEvent, RemoteEvent};
use chrono::{DateTime, SecondsFormat, Utc};
use google_calendar::types::{OrderBy, SendUpdates};
use google_calendar::{Client, ClientError, StatusCode};
use tracing::debug;

use crate::convert::{FromGoogle, ToGoogle};

/// An authenticated handle on the Calendar API.
pub struct GoogleCalendar {
    client: Client,
}

impl GoogleCalendar {
    pub fn new(client: Client) -> Self {
        GoogleCalendar { client }
    }
}

fn rfc3339(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Deleting something that is already gone counts as deleted.
fn is_gone(e: &ClientError) -> bool {
    matches!(e, ClientError::HttpError { status, .. } if *status == StatusCode::GONE)
}

impl CalendarApi for GoogleCalendar {
    async fn list_events(&self, calendar_id: &str, query: &EventQuery) -> Result<Vec<RemoteEvent>> {
        let time_min = rfc3339(query.time_min);
        let time_max = rfc3339(query.time_max);
        debug!(
            "Listing events on {} (time_min={:?}, time_max={:?}, single_events={})",
            calendar_id, time_min, time_max, query.expand_recurring
        );

        let response = self
            .client
            .events()
            .list_all(
                calendar_id,
                "",
                0,
                OrderBy::default(),
                &[],
                "", // search query
                &[],
                false,
                false,
                query.expand_recurring,
                &time_max,
                &time_min,
                "",
                "",
            )
            .await
            .context("Failed to fetch events")?;

        Ok(response
            .body
            .into_iter()
            .map(RemoteEvent::from_google)
            .collect())
    }

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> Result<RemoteEvent> {
        let google_event = event.to_google();

        let response = self
            .client
            .events()
            .insert(
                calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
            .with_context(|| format!("Failed to create event: {}", event.summary))?;

        Ok(RemoteEvent::from_google(response.body))
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()> {
        let result = self
            .client
            .events()
            .delete(calendar_id, event_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_gone(&e) => {
                debug!("Event {} was already deleted", event_id);
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to delete event: {}", event_id)),
        }
    }
}
