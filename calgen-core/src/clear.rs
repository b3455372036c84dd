//! Emptying a calendar, one delete per series or standalone event.
//!
//! The "Found N event(s)" line reports the raw listed count, while the
//! deletes go out once per deletion target. The two differ whenever the
//! calendar holds several members of one series.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{error, info};

use crate::error::CalgenError;
use crate::remote::{CalendarApi, EventQuery, RemoteEvent};

/// One delete call: a series id, or a standalone event's own id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionTarget {
    pub key: String,
    /// Title of the first event seen under this key, for logging.
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted,
    Failed(String),
}

/// What a clear run did.
#[derive(Debug, Default)]
pub struct ClearReport {
    /// Events listed before grouping.
    pub found: usize,
    pub outcomes: Vec<(DeletionTarget, DeletionOutcome)>,
}

impl ClearReport {
    pub fn deleted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == DeletionOutcome::Deleted)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.deleted()
    }

    /// Succeeds only if every target was deleted.
    pub fn into_result(self) -> Result<Self, CalgenError> {
        match self.failed() {
            0 => Ok(self),
            failed => Err(CalgenError::DeleteFailed { failed }),
        }
    }
}

/// Collapse events into unique deletion targets, keeping first-seen order.
pub fn deletion_targets(events: &[RemoteEvent]) -> Vec<DeletionTarget> {
    let mut seen = HashSet::new();

    events
        .iter()
        .filter_map(|event| {
            let key = event.series_id.as_deref().unwrap_or(&event.id);
            seen.insert(key.to_string()).then(|| DeletionTarget {
                key: key.to_string(),
                title: event.title.clone(),
            })
        })
        .collect()
}

/// Delete every event on the calendar.
///
/// A failed list aborts before anything is deleted. Failed deletes are
/// logged and skipped; if any failed, the run ends in
/// [`CalgenError::DeleteFailed`] with the completed deletes left in place.
pub async fn clear_calendar<C: CalendarApi>(api: &C, calendar_id: &str) -> Result<ClearReport> {
    info!("Fetching all events from calendar: {}", calendar_id);
    let events = api.list_events(calendar_id, &EventQuery::all()).await?;

    if events.is_empty() {
        info!("No events found to delete.");
        return Ok(ClearReport::default());
    }

    info!("Found {} event(s) to delete.", events.len());

    let targets = deletion_targets(&events);
    let total = targets.len();
    let mut report = ClearReport {
        found: events.len(),
        outcomes: Vec::with_capacity(total),
    };

    let mut deleted = 0;
    for target in targets {
        info!("Deleting event: {} (ID: {})", target.title, target.key);

        let outcome = match api.delete_event(calendar_id, &target.key).await {
            Ok(()) => {
                deleted += 1;
                info!("✅ Deleted event {}/{}", deleted, total);
                DeletionOutcome::Deleted
            }
            Err(e) => {
                error!("Failed to delete event: {} - {:#}", target.title, e);
                DeletionOutcome::Failed(format!("{:#}", e))
            }
        };

        report.outcomes.push((target, outcome));
    }

    info!(
        "Deletion complete: {} deleted, {} failed.",
        report.deleted(),
        report.failed()
    );

    Ok(report.into_result()?)
}
