use anyhow::Result;
use calgen_core::upsert::insert_weekly_event;
use calgen_core::{CalendarApi, EventDescriptor, Schedule};
use tracing::info;

/// Create every meeting, stopping at the first failure.
pub async fn run<C: CalendarApi>(
    api: &C,
    calendar_id: &str,
    schedule: &Schedule,
    events: &[EventDescriptor],
) -> Result<()> {
    for ev in events {
        info!("Processing: {}", ev);
        let created = insert_weekly_event(api, calendar_id, schedule, ev).await?;
        info!("✅ Created event id = {}", created.id);
    }

    Ok(())
}
