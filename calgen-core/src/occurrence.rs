//! Next-occurrence resolution for weekly descriptors.

use chrono::offset::LocalResult;
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::descriptor::EventDescriptor;
use crate::error::{CalgenError, CalgenResult};

/// A configured time zone plus the date it currently is there.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub tz: Tz,
    pub today: NaiveDate,
}

impl Schedule {
    pub fn now(tz: Tz) -> Self {
        Schedule {
            tz,
            today: Utc::now().with_timezone(&tz).date_naive(),
        }
    }

    pub fn on(tz: Tz, today: NaiveDate) -> Self {
        Schedule { tz, today }
    }

    /// Zoned start of the descriptor's next (or same-day) occurrence.
    pub fn next_start(&self, descriptor: &EventDescriptor) -> CalgenResult<DateTime<Tz>> {
        let date = next_or_same(self.today, descriptor.day_of_week);
        localize(self.tz, date.and_time(descriptor.time))
    }

    /// Window used when looking for an existing copy: start through start + 1 day.
    pub fn lookup_window(
        &self,
        descriptor: &EventDescriptor,
    ) -> CalgenResult<(DateTime<Tz>, DateTime<Tz>)> {
        let start = self.next_start(descriptor)?;
        let end = start
            .checked_add_days(Days::new(1))
            .ok_or_else(|| CalgenError::Time(format!("{start} + 1 day is out of range")))?;
        Ok((start, end))
    }

    /// Slot a new meeting occupies: start through start + 1 hour.
    pub fn meeting_slot(
        &self,
        descriptor: &EventDescriptor,
    ) -> CalgenResult<(DateTime<Tz>, DateTime<Tz>)> {
        let start = self.next_start(descriptor)?;
        Ok((start, start + Duration::hours(1)))
    }
}

/// `today` if it already falls on `target`, otherwise the first matching day after it.
pub fn next_or_same(today: NaiveDate, target: Weekday) -> NaiveDate {
    let ahead = (7 + target.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    today + Days::new(u64::from(ahead))
}

/// Attach a zone to a wall-clock time. Overlaps take the earlier offset;
/// times inside a spring-forward gap move one hour later.
fn localize(tz: Tz, local: NaiveDateTime) -> CalgenResult<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .ok_or_else(|| CalgenError::Time(format!("{local} does not exist in {tz}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn standup(day: Weekday, h: u32, m: u32) -> EventDescriptor {
        EventDescriptor::new(
            day,
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            "https://zoom.us/j/1",
            "Standup",
        )
    }

    #[test]
    fn same_weekday_resolves_to_today() {
        // 2025-01-07 is a Tuesday
        let today = date(2025, 1, 7);
        assert_eq!(next_or_same(today, Weekday::Tue), today);
    }

    #[test]
    fn other_weekdays_resolve_within_six_days() {
        let today = date(2025, 1, 7);
        for target in [
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
            Weekday::Mon,
        ] {
            let next = next_or_same(today, target);
            let ahead = (next - today).num_days();
            assert!((1..=6).contains(&ahead), "{target:?} was {ahead} days ahead");
            assert_eq!(next.weekday(), target);
        }
        assert_eq!(next_or_same(today, Weekday::Mon), date(2025, 1, 13));
        assert_eq!(next_or_same(today, Weekday::Wed), date(2025, 1, 8));
    }

    #[test]
    fn start_is_zoned_wall_clock_time() {
        let schedule = Schedule::on(chrono_tz::America::New_York, date(2025, 1, 7));
        let start = schedule.next_start(&standup(Weekday::Thu, 18, 30)).unwrap();

        assert_eq!(start.to_rfc3339(), "2025-01-09T18:30:00-05:00");
    }

    #[test]
    fn lookup_window_spans_one_day_and_slot_one_hour() {
        let schedule = Schedule::on(chrono_tz::Europe::Berlin, date(2025, 6, 2));
        let ev = standup(Weekday::Mon, 9, 0);

        let (start, end) = schedule.lookup_window(&ev).unwrap();
        assert_eq!(end - start, Duration::days(1));

        let (start, end) = schedule.meeting_slot(&ev).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-06-02T09:00:00+02:00");
        assert_eq!(end - start, Duration::hours(1));
    }

    #[test]
    fn lookup_window_keeps_wall_clock_across_dst_change() {
        // Saturday before US spring-forward on 2025-03-09
        let schedule = Schedule::on(chrono_tz::America::New_York, date(2025, 3, 8));
        let (start, end) = schedule.lookup_window(&standup(Weekday::Sat, 10, 0)).unwrap();

        assert_eq!(start.to_rfc3339(), "2025-03-08T10:00:00-05:00");
        assert_eq!(end.to_rfc3339(), "2025-03-09T10:00:00-04:00");
    }

    #[test]
    fn gap_time_moves_forward() {
        let schedule = Schedule::on(chrono_tz::America::New_York, date(2025, 3, 9));
        let start = schedule.next_start(&standup(Weekday::Sun, 2, 30)).unwrap();

        assert_eq!(start.to_rfc3339(), "2025-03-09T03:30:00-04:00");
    }

    #[test]
    fn overlap_time_takes_earlier_offset() {
        let schedule = Schedule::on(chrono_tz::America::New_York, date(2025, 11, 2));
        let start = schedule.next_start(&standup(Weekday::Sun, 1, 30)).unwrap();

        assert_eq!(start.to_rfc3339(), "2025-11-02T01:30:00-04:00");
    }
}
