use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Local wall-clock time truncated to whole seconds (`HH:mm:ss` on the wire)
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Accepts `yyyy-MM-dd`, optionally followed by a time part (`2024-01-10 00:00:00`)
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
}

/// Inclusive day count: the same start and end date is one day.
/// Zero or negative when `end` precedes `start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Hours between two times of the same day, rounded to 2 decimals
pub fn working_hours(clock_in: NaiveTime, clock_out: NaiveTime) -> f64 {
    let secs = (clock_out - clock_in).num_seconds() as f64;
    round2(secs / 3600.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn inclusive_days_counts_both_ends() {
        assert_eq!(inclusive_days(d(2024, 1, 10), d(2024, 1, 12)), 3);
        assert_eq!(inclusive_days(d(2024, 1, 10), d(2024, 1, 10)), 1);
        assert_eq!(inclusive_days(d(2024, 1, 12), d(2024, 1, 10)), -1);
        // across a leap day
        assert_eq!(inclusive_days(d(2024, 2, 28), d(2024, 3, 1)), 3);
    }

    #[test]
    fn working_hours_rounds_to_two_decimals() {
        assert_eq!(working_hours(t(9, 0, 0), t(17, 30, 0)), 8.5);
        assert_eq!(working_hours(t(9, 0, 0), t(9, 20, 0)), 0.33);
        assert_eq!(working_hours(t(9, 0, 0), t(9, 0, 0)), 0.0);
    }

    #[test]
    fn same_month_ignores_day() {
        assert!(same_month(d(2024, 1, 1), d(2024, 1, 31)));
        assert!(!same_month(d(2024, 1, 31), d(2024, 2, 1)));
        assert!(!same_month(d(2023, 1, 15), d(2024, 1, 15)));
    }

    #[test]
    fn parse_date_requires_iso() {
        assert_eq!(parse_date(" 2024-01-10 "), Some(d(2024, 1, 10)));
        assert_eq!(parse_date("2024-01-10 00:00:00"), Some(d(2024, 1, 10)));
        assert_eq!(parse_date("2024-1-10x"), None);
        assert_eq!(parse_date(""), None);
    }
}
