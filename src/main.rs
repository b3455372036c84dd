mod command;
mod commands;

use std::path::PathBuf;

use anyhow::Result;
use calgen_core::config::{AppConfig, ENVIRONMENT_HELP};
use clap::{ArgGroup, CommandFactory, FromArgMatches, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use command::{Command, Mode};

#[derive(Parser, Debug)]
#[command(name = "calgen", version)]
#[command(about = "Create weekly recurring meetings on Google Calendar from a JSON list")]
#[command(group(ArgGroup::new("mode").args(["dry_run", "single_dry_run", "clear_test_calendar"])))]
struct Cli {
    /// Show which events would be created without modifying the calendar
    #[arg(long)]
    dry_run: bool,

    /// Print a single example cURL command you can run manually
    #[arg(long)]
    single_dry_run: bool,

    /// Clear all events in the (test) calendar
    #[arg(long)]
    clear_test_calendar: bool,

    /// Config file consulted after environment variables
    #[arg(long, value_name = "PATH", default_value = "calgen.toml")]
    config: PathBuf,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.dry_run {
            Mode::DryRun
        } else if self.single_dry_run {
            Mode::SingleDryRun
        } else if self.clear_test_calendar {
            Mode::ClearTestCalendar
        } else {
            Mode::Run
        }
    }
}

fn environment_help() -> String {
    let mut help = String::from("Environment Variables:\n");
    for (var, what) in ENVIRONMENT_HELP {
        help.push_str(&format!("  {:<30} {}\n", var, what));
    }
    help
}

fn parse_cli() -> Result<Cli> {
    let matches = Cli::command().after_help(environment_help()).get_matches();
    Ok(Cli::from_arg_matches(&matches)?)
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // --help exits here, before any configuration is needed
    let cli = parse_cli()?;

    init_logging();

    let config = AppConfig::load(&cli.config)?;
    info!(
        "{} v{} (calendar: {}, time zone: {})",
        config.application_name,
        env!("CARGO_PKG_VERSION"),
        config.calendar_id,
        config.timezone
    );

    let command = Command::build(cli.mode(), &config)?;
    commands::execute(command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_is_a_normal_run() {
        let cli = Cli::try_parse_from(["calgen"]).unwrap();
        assert_eq!(cli.mode(), Mode::Run);
        assert_eq!(cli.config, PathBuf::from("calgen.toml"));
    }

    #[test]
    fn flags_select_modes() {
        let mode = |flag: &str| Cli::try_parse_from(["calgen", flag]).unwrap().mode();

        assert_eq!(mode("--dry-run"), Mode::DryRun);
        assert_eq!(mode("--single-dry-run"), Mode::SingleDryRun);
        assert_eq!(mode("--clear-test-calendar"), Mode::ClearTestCalendar);
    }

    #[test]
    fn modes_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["calgen", "--dry-run", "--clear-test-calendar"]).is_err());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["calgen", "--frobnicate"]).is_err());
    }

    #[test]
    fn help_lists_environment_variables() {
        let help = environment_help();
        assert!(help.contains("GOOGLE_CALENDAR_ID"));
        assert!(help.contains("EVENTS_FILE_PATH"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
