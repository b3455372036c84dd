//! Copy-pasteable `curl` rendering of a create request.

use std::fmt;

use anyhow::{Context, Result};
use url::Url;

use crate::descriptor::EventDescriptor;
use crate::error::CalgenError;
use crate::occurrence::Schedule;
use crate::remote::TokenSource;
use crate::upsert::weekly_event;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3/calendars/";

/// A create request described instead of sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPreview {
    pub method: &'static str,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    /// Single-line JSON body.
    pub body: String,
}

impl RequestPreview {
    pub fn to_curl(&self) -> String {
        let mut lines = vec![
            format!("curl -X {}", self.method),
            format!("  '{}'", self.url),
        ];
        for (name, value) in &self.headers {
            lines.push(format!("  -H '{}: {}'", name, value));
        }
        lines.push(format!("  -d '{}'", shell_escape_body(&self.body)));

        lines.join(" \\\n")
    }
}

impl fmt::Display for RequestPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_curl())
    }
}

/// Events endpoint for a calendar, with the id encoded as one path segment.
pub fn events_url(calendar_id: &str) -> Result<Url> {
    let mut url = Url::parse(CALENDAR_API_BASE)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Calendar API base URL cannot take path segments"))?
        .pop_if_empty()
        .push(calendar_id)
        .push("events");
    Ok(url)
}

/// Make the JSON body safe inside a single-quoted, single-line shell argument.
fn shell_escape_body(body: &str) -> String {
    body.replace('\n', "")
        .replace('"', "\\\"")
        .replace('\'', "'\\''")
}

/// Build the preview for the descriptor's create request.
///
/// Asks `tokens` for exactly one access token; never touches the calendar.
pub async fn build_preview<T: TokenSource>(
    tokens: &T,
    calendar_id: &str,
    schedule: &Schedule,
    descriptor: &EventDescriptor,
) -> Result<RequestPreview> {
    let token = tokens.access_token().await?;
    if token.is_empty() {
        return Err(CalgenError::Auth("Could not retrieve OAuth access token.".into()).into());
    }

    let event = weekly_event(schedule, descriptor)?;
    let body = serde_json::to_string(&event).context("Failed to serialize event body")?;

    Ok(RequestPreview {
        method: "POST",
        url: events_url(calendar_id)?,
        headers: vec![
            ("Authorization".to_string(), format!("Bearer {}", token)),
            ("Content-Type".to_string(), "application/json".to_string()),
        ],
        body,
    })
}
