//! Calendar-day boundaries in a local timezone
//!
//! A [`DayRange`] turns one or more calendar dates into the absolute instants
//! used to filter appointments: local 00:00:00.000 of the first day through
//! local 23:59:59.999 of the last day, both inclusive.

use crate::domain::slot::SlotTime;
use crate::domain::{AgendaError, Result};
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, SecondsFormat, TimeZone, Utc,
};

/// Inclusive instant bounds covering whole local calendar days
///
/// # Examples
///
/// ```
/// use agenda::core::schedule::DayRange;
/// use chrono::{FixedOffset, NaiveDate};
///
/// let tz = FixedOffset::west_opt(3 * 3600).unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
/// let day = DayRange::for_date(date, &tz);
///
/// assert_eq!(day.start_rfc3339(), "2025-03-14T00:00:00.000-03:00");
/// assert_eq!(day.end_rfc3339(), "2025-03-14T23:59:59.999-03:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRange {
    first: NaiveDate,
    last: NaiveDate,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl DayRange {
    /// Bounds of a single local day
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        Self {
            first: date,
            last: date,
            start: start_of_day(date, tz),
            end: end_of_day(date, tz),
        }
    }

    /// Bounds spanning `first` through `last`, inclusive
    ///
    /// # Errors
    ///
    /// Returns a validation error if `last` is before `first`.
    pub fn for_dates<Tz: TimeZone>(first: NaiveDate, last: NaiveDate, tz: &Tz) -> Result<Self> {
        if last < first {
            return Err(AgendaError::Validation(format!(
                "Range end {last} is before range start {first}"
            )));
        }
        Ok(Self {
            first,
            last,
            start: start_of_day(first, tz),
            end: end_of_day(last, tz),
        })
    }

    /// The Sunday-to-Saturday week containing `date`
    pub fn week_of<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        let (sunday, saturday) = week_bounds(date);
        Self {
            first: sunday,
            last: saturday,
            start: start_of_day(sunday, tz),
            end: end_of_day(saturday, tz),
        }
    }

    /// First calendar date covered
    pub fn first_date(&self) -> NaiveDate {
        self.first
    }

    /// Last calendar date covered
    pub fn last_date(&self) -> NaiveDate {
        self.last
    }

    /// Whether the range covers exactly one day
    pub fn is_single_day(&self) -> bool {
        self.first == self.last
    }

    /// Inclusive lower bound
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// Inclusive upper bound
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// Lower bound as RFC 3339 with millisecond precision
    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, false)
    }

    /// Upper bound as RFC 3339 with millisecond precision
    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Millis, false)
    }

    /// Whether `instant` falls within the bounds
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        let utc = instant.with_timezone(&Utc);
        utc >= self.start && utc <= self.end
    }
}

/// Sunday and Saturday of the week containing `date`
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = date.weekday().num_days_from_sunday() as i64;
    let sunday = date - Duration::days(offset);
    (sunday, sunday + Duration::days(6))
}

/// Today's calendar date in `tz`
pub fn today_in<Tz: TimeZone>(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

/// Combines a calendar date and a wall-clock time into an absolute instant
///
/// Times that fall in a DST gap move forward to the first valid instant;
/// ambiguous times resolve to the earlier one.
pub fn local_instant<Tz: TimeZone>(date: NaiveDate, time: SlotTime, tz: &Tz) -> DateTime<Utc> {
    resolve_forward(date.and_time(time.to_naive()), tz).with_timezone(&Utc)
}

fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<FixedOffset> {
    fixed(resolve_forward(date.and_time(NaiveTime::MIN), tz))
}

fn end_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<FixedOffset> {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    fixed(resolve_backward(date.and_time(last_milli), tz))
}

// DST gaps are searched in 15-minute steps, up to one day.
const GAP_STEP_MINUTES: i64 = 15;
const GAP_MAX_STEPS: i64 = 4 * 24;

fn resolve_forward<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> DateTime<Tz> {
    for step in 0..=GAP_MAX_STEPS {
        let candidate = naive + Duration::minutes(step * GAP_STEP_MINUTES);
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => continue,
        }
    }
    tz.from_utc_datetime(&naive)
}

fn resolve_backward<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> DateTime<Tz> {
    for step in 0..=GAP_MAX_STEPS {
        let candidate = naive - Duration::minutes(step * GAP_STEP_MINUTES);
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(_, latest) => return latest,
            LocalResult::None => continue,
        }
    }
    tz.from_utc_datetime(&naive)
}

fn fixed<Tz: TimeZone>(dt: DateTime<Tz>) -> DateTime<FixedOffset> {
    let offset = dt.offset().fix();
    dt.with_timezone(&offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day_bounds_utc() {
        let day = DayRange::for_date(date(2025, 3, 14), &Utc);
        assert_eq!(day.start_rfc3339(), "2025-03-14T00:00:00.000+00:00");
        assert_eq!(day.end_rfc3339(), "2025-03-14T23:59:59.999+00:00");
        assert!(day.is_single_day());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let day = DayRange::for_date(date(2025, 3, 14), &tz);

        let first = tz.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap();
        let late = tz.with_ymd_and_hms(2025, 3, 14, 23, 59, 59).unwrap();
        let next = tz.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2025, 3, 14, 2, 59, 59).unwrap();

        assert!(day.contains(&first));
        assert!(day.contains(&late));
        assert!(!day.contains(&next));
        assert!(!day.contains(&before));
    }

    #[test]
    fn test_week_of_starts_on_sunday() {
        // 2025-03-14 is a Friday
        let week = DayRange::week_of(date(2025, 3, 14), &Utc);
        assert_eq!(week.first_date(), date(2025, 3, 9));
        assert_eq!(week.last_date(), date(2025, 3, 15));

        let (sunday, _) = week_bounds(date(2025, 3, 9));
        assert_eq!(sunday, date(2025, 3, 9));
    }

    #[test]
    fn test_for_dates_rejects_inverted_range() {
        assert!(DayRange::for_dates(date(2025, 3, 15), date(2025, 3, 14), &Utc).is_err());
        let range = DayRange::for_dates(date(2025, 3, 1), date(2025, 3, 31), &Utc).unwrap();
        assert!(!range.is_single_day());
    }

    #[test]
    fn test_local_instant() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let instant = local_instant(date(2025, 3, 14), SlotTime::new(9, 0), &tz);
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap());
    }
}
