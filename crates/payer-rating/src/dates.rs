use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Length of the calendar-independent month used for history measurements.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Ordered list of `chrono` format strings tried when parsing date text.
///
/// Day-first layouts come before the year-first layout so that ambiguous values such as
/// `03/04/2024` read as 3 April.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateFormats(Vec<String>);

impl DateFormats {
    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(formats.into_iter().map(Into::into).collect())
    }

    pub fn formats(&self) -> &[String] {
        &self.0
    }

    /// Parses date text, returning `None` for blank or unrecognized input.
    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        for format in &self.0 {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Some(date);
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(dt.naive_utc().date());
        }

        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Some(dt.date());
            }
        }

        None
    }
}

impl Default for DateFormats {
    fn default() -> Self {
        Self::new(["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"])
    }
}

/// Converts a spreadsheet serial day number (1900 date system) into a date.
///
/// Only values between 1 and 2958465 (31 Dec 9999) are accepted; fractional parts carry the
/// time of day and are dropped.
pub fn from_serial_day(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Whole days from `start` to `end`; negative when `end` precedes `start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Days remaining until `due`, or zero once the due date has been reached.
pub fn discount_days(due: NaiveDate, today: NaiveDate) -> i64 {
    days_between(today, due).max(0)
}

/// Elapsed 30-day months between `start` and `as_of`, never less than one.
pub fn history_months(start: Option<NaiveDate>, as_of: NaiveDate) -> f64 {
    match start {
        Some(start) => (days_between(start, as_of) as f64 / DAYS_PER_MONTH).max(1.0),
        None => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_day_first_and_iso_layouts() {
        let formats = DateFormats::default();
        assert_eq!(formats.parse("03/04/2024"), Some(date(2024, 4, 3)));
        assert_eq!(formats.parse("03-04-2024"), Some(date(2024, 4, 3)));
        assert_eq!(formats.parse(" 3.4.2024 "), Some(date(2024, 4, 3)));
        assert_eq!(formats.parse("2024-04-03"), Some(date(2024, 4, 3)));
        assert_eq!(formats.parse("2024-04-03T10:15:00Z"), Some(date(2024, 4, 3)));
        assert_eq!(formats.parse("2024-04-03 10:15:00"), Some(date(2024, 4, 3)));
    }

    #[test]
    fn rejects_blank_and_invalid_dates() {
        let formats = DateFormats::default();
        assert!(formats.parse("   ").is_none());
        assert!(formats.parse("not-a-date").is_none());
        assert!(formats.parse("31/02/2024").is_none());
        assert!(formats.parse("13/13/2024").is_none());
    }

    #[test]
    fn custom_formats_replace_defaults() {
        let formats = DateFormats::new(["%m/%d/%Y"]);
        assert_eq!(formats.parse("03/04/2024"), Some(date(2024, 3, 4)));
    }

    #[test]
    fn serial_days_follow_spreadsheet_epoch() {
        assert_eq!(from_serial_day(45292.0), Some(date(2024, 1, 1)));
        assert_eq!(from_serial_day(45292.75), Some(date(2024, 1, 1)));
        assert!(from_serial_day(0.0).is_none());
        assert!(from_serial_day(f64::NAN).is_none());
    }

    #[test]
    fn day_arithmetic() {
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 31)), 30);
        assert_eq!(days_between(date(2024, 1, 31), date(2024, 1, 1)), -30);
        assert_eq!(discount_days(date(2024, 2, 10), date(2024, 2, 1)), 9);
        assert_eq!(discount_days(date(2024, 1, 10), date(2024, 2, 1)), 0);
    }

    #[test]
    fn history_months_has_a_floor_of_one() {
        assert_eq!(history_months(None, date(2024, 1, 1)), 1.0);
        assert_eq!(history_months(Some(date(2024, 1, 1)), date(2024, 1, 11)), 1.0);
        assert_eq!(history_months(Some(date(2024, 1, 1)), date(2024, 3, 31)), 3.0);
    }
}
