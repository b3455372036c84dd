pub mod clear;
pub mod dry_run;
pub mod run;
pub mod single_dry_run;


use anyhow::Result;
use calgen_core::Schedule;
use calgen_core::config::AppConfig;
use calgen_provider_google::OAuthFlow;

use crate::command::Command;

/// Sign in as the command requires, then run it.
pub async fn execute(command: Command, config: &AppConfig) -> Result<()> {
    let flow = OAuthFlow::from_config(config)?;
    let schedule = Schedule::now(config.timezone);

    match command {
        Command::Run {
            calendar_id,
            events,
        } => {
            let calendar = flow.authorize().await?.calendar();
            run::run(&calendar, &calendar_id, &schedule, &events).await
        }
        Command::DryRun {
            calendar_id,
            events,
        } => {
            let calendar = flow.authorize().await?.calendar();
            dry_run::run(&calendar, &calendar_id, &schedule, &events).await
        }
        // The flow itself hands out the one token the preview needs
        Command::SingleDryRun { calendar_id, event } => {
            single_dry_run::run(&flow, &calendar_id, &schedule, &event).await
        }
        Command::ClearTestCalendar { calendar_id } => {
            let calendar = flow.authorize().await?.calendar();
            clear::run(&calendar, &calendar_id).await
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use calgen_core::{EventDescriptor, Schedule};
    use chrono::{NaiveDate, NaiveTime, Weekday};

    pub fn schedule() -> Schedule {
        Schedule::on(chrono_tz::UTC, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap())
    }

    pub fn descriptor(description: &str) -> EventDescriptor {
        EventDescriptor::new(
            Weekday::Thu,
            NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            "https://zoom.us/j/1",
            description,
        )
    }
}
