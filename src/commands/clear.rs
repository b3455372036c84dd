use anyhow::Result;
use calgen_core::CalendarApi;
use calgen_core::clear::clear_calendar;
use tracing::info;

/// Delete every event on the calendar.
pub async fn run<C: CalendarApi>(api: &C, calendar_id: &str) -> Result<()> {
    info!("🧪 Clearing all events from test calendar...");
    clear_calendar(api, calendar_id).await?;
    info!("✅ All events cleared from test calendar.");

    Ok(())
}
