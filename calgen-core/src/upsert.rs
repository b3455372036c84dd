//! Creating the weekly meeting for a descriptor.

use anyhow::Result;

use crate::descriptor::EventDescriptor;
use crate::occurrence::Schedule;
use crate::remote::{CalendarApi, NewEvent, RemoteEvent, WEEKLY_RRULE};

/// Body text of a generated meeting: the link, a blank line, then the description.
pub fn event_body(descriptor: &EventDescriptor) -> String {
    format!(
        "Zoom link: {}\n\n{}",
        descriptor.link_url, descriptor.description
    )
}

/// Build the create payload for the descriptor's next occurrence.
pub fn weekly_event(schedule: &Schedule, descriptor: &EventDescriptor) -> Result<NewEvent> {
    let (start, end) = schedule.meeting_slot(descriptor)?;

    Ok(NewEvent {
        summary: descriptor.description.clone(),
        description: event_body(descriptor),
        start,
        end,
        time_zone: schedule.tz.name().to_string(),
        recurrence: vec![WEEKLY_RRULE.to_string()],
    })
}

/// Create the weekly meeting. Does not check for an existing copy first.
pub async fn insert_weekly_event<C: CalendarApi>(
    api: &C,
    calendar_id: &str,
    schedule: &Schedule,
    descriptor: &EventDescriptor,
) -> Result<RemoteEvent> {
    let event = weekly_event(schedule, descriptor)?;
    api.insert_event(calendar_id, &event).await
}
