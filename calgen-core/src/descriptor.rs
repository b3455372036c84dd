//! Weekly meeting descriptors loaded from the events file.
//!
//! The file is a JSON array:
//!
//! ```json
//! [
//!   { "dayOfWeek": "TUESDAY", "time": "18:30", "zoomUrl": "https://zoom.us/j/1", "description": "Weekly Standup" }
//! ]
//! ```

use std::fmt;
use std::path::Path;

use chrono::{NaiveTime, Weekday};
use serde::Deserialize;

use crate::error::{CalgenError, CalgenResult};

/// A weekly recurring meeting: which day, what local time, where, and what it's called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    pub day_of_week: Weekday,
    pub time: NaiveTime,
    pub link_url: String,
    /// Used both as the event title and as the body text.
    pub description: String,
}

/// On-disk shape, kept as plain strings so parse errors can name the record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    day_of_week: String,
    time: String,
    zoom_url: String,
    description: String,
}

impl EventDescriptor {
    pub fn new(
        day_of_week: Weekday,
        time: NaiveTime,
        link_url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        EventDescriptor {
            day_of_week,
            time,
            link_url: link_url.into(),
            description: description.into(),
        }
    }

    fn from_raw(index: usize, raw: RawDescriptor) -> CalgenResult<Self> {
        let day_of_week = parse_weekday(&raw.day_of_week).ok_or_else(|| {
            CalgenError::InvalidDescriptor {
                index,
                reason: format!("unknown day of week '{}'", raw.day_of_week),
            }
        })?;

        let time = parse_time(&raw.time).ok_or_else(|| CalgenError::InvalidDescriptor {
            index,
            reason: format!("invalid time '{}', expected HH:MM or HH:MM:SS", raw.time),
        })?;

        Ok(EventDescriptor {
            day_of_week,
            time,
            link_url: raw.zoom_url,
            description: raw.description,
        })
    }
}

impl fmt::Display for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            weekday_name(self.day_of_week),
            self.time.format("%H:%M"),
            self.description
        )
    }
}

/// Full English day name, any case. Abbreviations are rejected.
fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.trim().to_uppercase().as_str() {
        "MONDAY" => Some(Weekday::Mon),
        "TUESDAY" => Some(Weekday::Tue),
        "WEDNESDAY" => Some(Weekday::Wed),
        "THURSDAY" => Some(Weekday::Thu),
        "FRIDAY" => Some(Weekday::Fri),
        "SATURDAY" => Some(Weekday::Sat),
        "SUNDAY" => Some(Weekday::Sun),
        _ => None,
    }
}

/// `HH:MM`, `HH:MM:SS` or `HH:MM:SS.fff`, each field two digits.
fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    let (clock, fraction) = match s.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (s, None),
    };

    let fields: Vec<&str> = clock.split(':').collect();
    let two_digits = |f: &&str| f.len() == 2 && f.bytes().all(|b| b.is_ascii_digit());
    let valid = match (fields.len(), fraction) {
        (2, None) => true,
        (3, None) => true,
        (3, Some(frac)) => (1..=9).contains(&frac.len()) && frac.bytes().all(|b| b.is_ascii_digit()),
        _ => false,
    };
    if !valid || !fields.iter().all(two_digits) {
        return None;
    }

    let format = if fields.len() == 2 { "%H:%M" } else { "%H:%M:%S%.f" };
    NaiveTime::parse_from_str(s, format).ok()
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse descriptors from JSON text. One bad record fails the whole load.
pub fn parse_descriptors(json: &str) -> CalgenResult<Vec<EventDescriptor>> {
    let raw: Vec<RawDescriptor> = serde_json::from_str(json)
        .map_err(|e| CalgenError::EventsFile(format!("Failed to parse events JSON: {e}")))?;

    raw.into_iter()
        .enumerate()
        .map(|(index, raw)| EventDescriptor::from_raw(index, raw))
        .collect()
}

/// Read and parse the events file.
pub fn load_descriptors(path: &Path) -> CalgenResult<Vec<EventDescriptor>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CalgenError::EventsFile(format!("Failed to read {}: {e}", path.display()))
    })?;

    parse_descriptors(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_in_order() {
        let json = r#"[
            {"dayOfWeek": "TUESDAY", "time": "18:30", "zoomUrl": "https://zoom.us/j/1", "description": "Standup"},
            {"dayOfWeek": "friday", "time": "07:05:30", "zoomUrl": "https://zoom.us/j/2", "description": "Retro"}
        ]"#;

        let events = parse_descriptors(json).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].day_of_week, Weekday::Tue);
        assert_eq!(events[0].time, NaiveTime::from_hms_opt(18, 30, 0).unwrap());
        assert_eq!(events[0].link_url, "https://zoom.us/j/1");
        assert_eq!(events[0].description, "Standup");
        assert_eq!(events[1].day_of_week, Weekday::Fri);
        assert_eq!(events[1].time, NaiveTime::from_hms_opt(7, 5, 30).unwrap());
    }

    #[test]
    fn weekday_is_case_insensitive() {
        assert_eq!(parse_weekday("Wednesday"), Some(Weekday::Wed));
        assert_eq!(parse_weekday("SUNDAY"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("someday"), None);
    }

    #[test]
    fn weekday_abbreviations_are_rejected() {
        assert_eq!(parse_weekday("Mon"), None);
        assert_eq!(parse_weekday("tue"), None);
        assert_eq!(parse_weekday("THURS"), None);
    }

    #[test]
    fn time_fields_must_be_two_digits() {
        assert_eq!(parse_time("9:00"), None);
        assert_eq!(parse_time("09:0"), None);
        assert_eq!(parse_time("09:00:5"), None);
        assert_eq!(parse_time("09"), None);
        assert_eq!(parse_time("09:00:00:00"), None);
        assert_eq!(parse_time("09:00."), None);
        assert_eq!(parse_time("+9:00"), None);
        assert_eq!(parse_time("09:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_time("23:59:59"), NaiveTime::from_hms_opt(23, 59, 59));
        assert_eq!(
            parse_time("07:05:30.250"),
            NaiveTime::from_hms_milli_opt(7, 5, 30, 250)
        );
    }

    #[test]
    fn loose_records_fail_the_load() {
        for (day, time) in [
            ("Mon", "09:00"),
            ("tue", "09:00"),
            ("MONDAY", "9:00"),
            ("MONDAY", "09:0"),
        ] {
            let json = format!(
                r#"[{{"dayOfWeek": "{day}", "time": "{time}", "zoomUrl": "u", "description": "x"}}]"#
            );

            assert!(
                matches!(
                    parse_descriptors(&json),
                    Err(CalgenError::InvalidDescriptor { index: 0, .. })
                ),
                "{day} {time} should have been rejected"
            );
        }
    }

    #[test]
    fn bad_weekday_fails_whole_load() {
        let json = r#"[
            {"dayOfWeek": "MONDAY", "time": "09:00", "zoomUrl": "u", "description": "ok"},
            {"dayOfWeek": "FUNDAY", "time": "09:00", "zoomUrl": "u", "description": "bad"}
        ]"#;

        let err = parse_descriptors(json).unwrap_err();
        match err {
            CalgenError::InvalidDescriptor { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("FUNDAY"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_time_fails_whole_load() {
        let json = r#"[{"dayOfWeek": "MONDAY", "time": "25:61", "zoomUrl": "u", "description": "x"}]"#;

        assert!(matches!(
            parse_descriptors(json),
            Err(CalgenError::InvalidDescriptor { index: 0, .. })
        ));
    }

    #[test]
    fn missing_field_is_an_events_file_error() {
        let json = r#"[{"dayOfWeek": "MONDAY", "time": "09:00", "description": "x"}]"#;

        assert!(matches!(
            parse_descriptors(json),
            Err(CalgenError::EventsFile(_))
        ));
    }

    #[test]
    fn empty_array_loads_nothing() {
        assert!(parse_descriptors("[]").unwrap().is_empty());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"[{"dayOfWeek": "thursday", "time": "12:00", "zoomUrl": "u", "description": "Lunch"}]"#,
        )
        .unwrap();

        let events = load_descriptors(&path).unwrap();
        assert_eq!(events[0].to_string(), "Thursday 12:00 Lunch");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_descriptors(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CalgenError::EventsFile(_)));
    }
}
