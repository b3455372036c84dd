//! Is a descriptor's next occurrence already on the calendar?

use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::debug;

use crate::descriptor::EventDescriptor;
use crate::occurrence::Schedule;
use crate::remote::{CalendarApi, EventQuery, RemoteEvent};

/// Slack added to both ends of the lookup window.
const WINDOW_SLACK_MINUTES: i64 = 5;

/// Build the list query for a descriptor's next occurrence.
pub fn lookup_query(schedule: &Schedule, descriptor: &EventDescriptor) -> Result<EventQuery> {
    let (start, end) = schedule.lookup_window(descriptor)?;
    let slack = Duration::minutes(WINDOW_SLACK_MINUTES);

    Ok(EventQuery::between(
        (start - slack).with_timezone(&Utc),
        (end + slack).with_timezone(&Utc),
    ))
}

/// Whether any event is titled like the descriptor, ignoring case.
pub fn has_matching_title(events: &[RemoteEvent], description: &str) -> bool {
    let wanted = description.to_lowercase();
    events.iter().any(|e| e.title.to_lowercase() == wanted)
}

/// Query the calendar around the next occurrence and look for a title match.
pub async fn event_exists<C: CalendarApi>(
    api: &C,
    calendar_id: &str,
    schedule: &Schedule,
    descriptor: &EventDescriptor,
) -> Result<bool> {
    let query = lookup_query(schedule, descriptor)?;
    debug!(
        "Looking for '{}' between {:?} and {:?}",
        descriptor.description, query.time_min, query.time_max
    );

    let events = api.list_events(calendar_id, &query).await?;

    Ok(has_matching_title(&events, &descriptor.description))
}
