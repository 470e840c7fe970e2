//! Formatting utilities for dates and other display values.

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const WEEKDAYS: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];

/// Calendar fields of a Unix timestamp (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DateTime {
    year: i64,
    /// 1-based month
    month: usize,
    /// 1-based day of month
    day: i64,
    hour: u64,
    minute: u64,
    second: u64,
    /// 0 = Thursday (1970-01-01)
    weekday: usize,
}

impl DateTime {
    fn from_timestamp(timestamp: u64) -> Self {
        let days = timestamp / 86400;
        let mut year = 1970i64;
        let mut remaining_days = days as i64;

        loop {
            let days_in_year = if is_leap_year(year) { 366 } else { 365 };
            if remaining_days < days_in_year {
                break;
            }
            remaining_days -= days_in_year;
            year += 1;
        }

        let days_in_months: [i64; 12] = if is_leap_year(year) {
            [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
        } else {
            [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
        };

        let mut month = 1;
        for days_in_month in days_in_months.iter() {
            if remaining_days < *days_in_month {
                break;
            }
            remaining_days -= days_in_month;
            month += 1;
        }

        Self {
            year,
            month,
            day: remaining_days + 1,
            hour: (timestamp % 86400) / 3600,
            minute: (timestamp % 3600) / 60,
            second: timestamp % 60,
            weekday: (days % 7) as usize,
        }
    }

    fn month_name(&self) -> &'static str {
        MONTHS[self.month - 1]
    }
}

/// Format Unix timestamp for `ls -l` (e.g., "Jan  5 12:34").
pub fn format_date_short(timestamp: u64) -> String {
    let dt = DateTime::from_timestamp(timestamp);
    format!(
        "{} {:2} {:02}:{:02}",
        dt.month_name(),
        dt.day,
        dt.hour,
        dt.minute
    )
}

/// Format Unix timestamp the way `date` prints it
/// (e.g., "Thu Jan  1 00:00:00 UTC 1970").
pub fn format_date_long(timestamp: u64) -> String {
    let dt = DateTime::from_timestamp(timestamp);
    format!(
        "{} {} {:2} {:02}:{:02}:{:02} UTC {}",
        WEEKDAYS[dt.weekday],
        dt.month_name(),
        dt.day,
        dt.hour,
        dt.minute,
        dt.second,
        dt.year
    )
}

/// Format Unix timestamp as a clock time (HH:MM:SS), used by `top`.
pub fn format_clock(timestamp: u64) -> String {
    let dt = DateTime::from_timestamp(timestamp);
    format!("{:02}:{:02}:{:02}", dt.hour, dt.minute, dt.second)
}

/// Check if a year is a leap year.
fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        assert_eq!(format_date_long(0), "Thu Jan  1 00:00:00 UTC 1970");
        assert_eq!(format_date_short(0), "Jan  1 00:00");
    }

    #[test]
    fn test_leap_day() {
        // 2024-02-29 12:30:15 UTC, a Thursday
        assert_eq!(format_date_long(1709209815), "Thu Feb 29 12:30:15 UTC 2024");
    }

    #[test]
    fn test_short_format() {
        // 2026-10-19 08:05:00 UTC
        assert_eq!(format_date_short(1792397100), "Oct 19 08:05");
    }

    #[test]
    fn test_clock() {
        assert_eq!(format_clock(3661), "01:01:01");
    }

    #[test]
    fn test_is_leap_year() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }
}
