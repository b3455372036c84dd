use anyhow::Result;
use calgen_core::preview::build_preview;
use calgen_core::{EventDescriptor, Schedule, TokenSource};
use tracing::info;

/// Print a curl command equivalent to creating `event`.
pub async fn run<T: TokenSource>(
    tokens: &T,
    calendar_id: &str,
    schedule: &Schedule,
    event: &EventDescriptor,
) -> Result<()> {
    let preview = build_preview(tokens, calendar_id, schedule, event).await?;

    info!("🧪 SINGLE DRY RUN — Paste this into your shell to simulate:");
    println!("{}", preview.to_curl());

    Ok(())
}
