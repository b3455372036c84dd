use anyhow::Result;
use calgen_core::existence::event_exists;
use calgen_core::{CalendarApi, EventDescriptor, Schedule};
use tracing::info;

/// Report, per meeting, whether a run would create it. Never writes.
pub async fn run<C: CalendarApi>(
    api: &C,
    calendar_id: &str,
    schedule: &Schedule,
    events: &[EventDescriptor],
) -> Result<()> {
    for ev in events {
        info!("Processing: {}", ev);
        let verdict = if event_exists(api, calendar_id, schedule, ev).await? {
            "Already exists"
        } else {
            "Would create"
        };
        info!("🧪 DRY RUN: {} {}", verdict, ev);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{descriptor, schedule};
    use calgen_core::RemoteEvent;
    use calgen_core::testing::FakeCalendar;

    #[tokio::test]
    async fn checks_every_meeting_without_writing() {
        let api = FakeCalendar::with_events(vec![RemoteEvent {
            id: "e1".to_string(),
            title: "standup".to_string(),
            series_id: None,
        }]);
        let events = [descriptor("Standup"), descriptor("Retro")];

        run(&api, "cal", &schedule(), &events).await.unwrap();

        assert_eq!(api.list_calls(), 2);
        assert!(api.inserted().is_empty());
        assert!(api.delete_attempts().is_empty());
    }
}
