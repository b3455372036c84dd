//! Selecting what this run does.

use anyhow::Result;
use calgen_core::config::AppConfig;
use calgen_core::descriptor::load_descriptors;
use calgen_core::{CalgenError, EventDescriptor};

/// Which command-line mode was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Run,
    DryRun,
    SingleDryRun,
    ClearTestCalendar,
}

/// A fully resolved command, carrying just the inputs it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create every event in the events file.
    Run {
        calendar_id: String,
        events: Vec<EventDescriptor>,
    },
    /// Report which events already exist and which would be created.
    DryRun {
        calendar_id: String,
        events: Vec<EventDescriptor>,
    },
    /// Print a curl command for the first event.
    SingleDryRun {
        calendar_id: String,
        event: EventDescriptor,
    },
    /// Delete everything on the calendar.
    ClearTestCalendar { calendar_id: String },
}

impl Command {
    pub fn build(mode: Mode, config: &AppConfig) -> Result<Self> {
        let calendar_id = config.calendar_id.clone();

        Ok(match mode {
            Mode::Run => Command::Run {
                calendar_id,
                events: load_events(config)?,
            },
            Mode::DryRun => Command::DryRun {
                calendar_id,
                events: load_events(config)?,
            },
            Mode::SingleDryRun => {
                let path = config.events_path()?;
                let event = load_events(config)?.into_iter().next().ok_or_else(|| {
                    CalgenError::EventsFile(format!("No events found in {}", path.display()))
                })?;
                Command::SingleDryRun { calendar_id, event }
            }
            Mode::ClearTestCalendar => Command::ClearTestCalendar { calendar_id },
        })
    }
}

fn load_events(config: &AppConfig) -> Result<Vec<EventDescriptor>> {
    Ok(load_descriptors(config.events_path()?)?)
}
