//! Application configuration.
//!
//! Each setting is read from its environment variable first (blank values
//! are ignored), then from a TOML file using dotted keys:
//!
//! ```toml
//! google.calendar.id = "team@group.calendar.google.com"
//! credentials.file.path = "~/.config/calgen/credentials.json"
//! events.file.path = "events.json"
//! default.timezone = "America/New_York"
//! ```

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, ConfigError, File, FileFormat};
use tracing::warn;

use crate::error::{CalgenError, CalgenResult};

pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
pub const DEFAULT_OAUTH_PORT: u16 = 8888;
pub const DEFAULT_APPLICATION_NAME: &str = "calgen";

const CALENDAR_ID: Setting = Setting::new("google.calendar.id", "GOOGLE_CALENDAR_ID");
const CREDENTIALS_PATH: Setting =
    Setting::new("credentials.file.path", "GOOGLE_CREDENTIALS_FILE_PATH");
const EVENTS_PATH: Setting = Setting::new("events.file.path", "EVENTS_FILE_PATH");
const TIMEZONE: Setting = Setting::new("default.timezone", "DEFAULT_TIMEZONE");
const SCOPES: Setting = Setting::new("google.scopes", "GOOGLE_API_SCOPES");
const OAUTH_PORT: Setting = Setting::new("oauth.port", "OAUTH_PORT");
const APPLICATION_NAME: Setting = Setting::new("application.name", "APPLICATION_NAME");

const ALL_SETTINGS: [Setting; 7] = [
    CALENDAR_ID,
    CREDENTIALS_PATH,
    EVENTS_PATH,
    TIMEZONE,
    SCOPES,
    OAUTH_PORT,
    APPLICATION_NAME,
];

/// A file key and the environment variable that overrides it.
#[derive(Clone, Copy)]
struct Setting {
    key: &'static str,
    env: &'static str,
}

impl Setting {
    const fn new(key: &'static str, env: &'static str) -> Self {
        Setting { key, env }
    }

    fn missing(&self) -> CalgenError {
        CalgenError::Config(format!(
            "Missing setting: set {} or {} in the config file",
            self.env, self.key
        ))
    }
}

/// Environment variables consulted, with what they hold. Used by `--help`.
pub const ENVIRONMENT_HELP: &[(&str, &str)] = &[
    ("GOOGLE_CALENDAR_ID", "Google Calendar ID where events are created"),
    ("GOOGLE_CREDENTIALS_FILE_PATH", "Path to the Google OAuth2 client secrets file"),
    ("EVENTS_FILE_PATH", "Path to the JSON file containing event data"),
    ("DEFAULT_TIMEZONE", "IANA time zone for event times (default: system zone)"),
    ("GOOGLE_API_SCOPES", "OAuth scope(s) to request"),
    ("OAUTH_PORT", "Local port for the OAuth callback (default: 8888)"),
    ("APPLICATION_NAME", "Name shown during sign-in (default: calgen)"),
];

/// Settings for one run, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub calendar_id: String,
    pub timezone: Tz,
    pub scopes: Vec<String>,
    pub oauth_port: u16,
    pub application_name: String,
    credentials_path: Option<PathBuf>,
    events_path: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve from the process environment and `path`. The file may be absent.
    pub fn load(path: &Path) -> CalgenResult<Self> {
        Self::from_sources(path, |var| std::env::var(var).ok())
    }

    pub fn from_sources(path: &Path, env: impl Fn(&str) -> Option<String>) -> CalgenResult<Self> {
        let mut builder = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false));

        for setting in ALL_SETTINGS {
            let value = env(setting.env).filter(|v| !v.trim().is_empty());
            builder = builder
                .set_override_option(setting.key, value)
                .map_err(config_error)?;
        }

        let settings = builder.build().map_err(config_error)?;

        let calendar_id = lookup(&settings, CALENDAR_ID)?.ok_or_else(|| CALENDAR_ID.missing())?;

        let timezone = match lookup(&settings, TIMEZONE)? {
            Some(name) => parse_timezone(&name)?,
            None => system_timezone(),
        };

        let scopes = lookup(&settings, SCOPES)?
            .map(|s| split_scopes(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_SCOPE.to_string()]);

        let oauth_port = match lookup(&settings, OAUTH_PORT)? {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(
                    "Ignoring invalid {} '{}', using {}",
                    OAUTH_PORT.env, raw, DEFAULT_OAUTH_PORT
                );
                DEFAULT_OAUTH_PORT
            }),
            None => DEFAULT_OAUTH_PORT,
        };

        let application_name = lookup(&settings, APPLICATION_NAME)?
            .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.to_string());

        Ok(AppConfig {
            calendar_id,
            timezone,
            scopes,
            oauth_port,
            application_name,
            credentials_path: lookup(&settings, CREDENTIALS_PATH)?.map(|p| expand_path(&p)),
            events_path: lookup(&settings, EVENTS_PATH)?.map(|p| expand_path(&p)),
        })
    }

    /// Client secrets file; required before authenticating.
    pub fn credentials_path(&self) -> CalgenResult<&Path> {
        self.credentials_path
            .as_deref()
            .ok_or_else(|| CREDENTIALS_PATH.missing())
    }

    /// Events file; required by commands that create or check events.
    pub fn events_path(&self) -> CalgenResult<&Path> {
        self.events_path
            .as_deref()
            .ok_or_else(|| EVENTS_PATH.missing())
    }
}

fn lookup(settings: &Config, setting: Setting) -> CalgenResult<Option<String>> {
    match settings.get_string(setting.key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_error(e)),
    }
}

fn config_error(e: ConfigError) -> CalgenError {
    CalgenError::Config(e.to_string())
}

fn parse_timezone(name: &str) -> CalgenResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CalgenError::Config(format!("Unknown time zone: {}", name)))
}

fn system_timezone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => name.parse().unwrap_or_else(|_| {
            warn!("System time zone '{}' not recognised, using UTC", name);
            Tz::UTC
        }),
        Err(e) => {
            warn!("Could not determine system time zone ({}), using UTC", e);
            Tz::UTC
        }
    }
}

fn split_scopes(raw: &str) -> Vec<String> {
    raw.split([',', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw.trim()).into_owned())
}
