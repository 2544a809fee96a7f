use chrono::format::StrftimeItems;
use chrono::NaiveDateTime;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// current timestamp
pub fn now() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before Unix epoch")
}

/// is_leap_year reports whether year is a leap year in the proleptic
/// Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// days_in_month returns the number of days in the given month (1-12),
/// accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => panic!("month out of range: {}", month),
    }
}

/// absolute_month returns a continuous month index (year*12 + month-1).
/// Month blocks are indexed by the difference of two absolute months, which
/// avoids per-year special casing when a period spans a year boundary.
pub fn absolute_month(year: i32, month: u32) -> i32 {
    year * 12 + (month as i32 - 1)
}

/// month_of is the inverse of absolute_month: it splits a continuous month
/// index back into (year, month).
pub fn month_of(index: i32) -> (i32, u32) {
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// time_format renders a timestamp as "%Y-%m-%d %H:%M:%S".
pub fn time_format(dt: NaiveDateTime) -> String {
    let fmt = StrftimeItems::new("%Y-%m-%d %H:%M:%S");
    format!("{}", dt.format_with_items(fmt))
}

#[cfg(test)]
mod tests {
    use crate::time::{absolute_month, days_in_month, is_leap_year, month_of, time_format};
    use chrono::NaiveDate;

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2000), "2000 is divisible by 400");
        assert!(!is_leap_year(1900), "1900 is divisible by 100 but not 400");
        assert!(is_leap_year(2004));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2004, 2), 29, "leap February");
        assert_eq!(days_in_month(2003, 2), 28, "non-leap February");
        assert_eq!(days_in_month(2000, 1), 31);
        assert_eq!(days_in_month(2000, 4), 30);
        assert_eq!(days_in_month(2000, 12), 31);
    }

    #[test]
    fn test_absolute_month() {
        assert_eq!(
            absolute_month(2000, 1) - absolute_month(1999, 12),
            1,
            "adjacent months across a year boundary differ by one"
        );
        assert_eq!(absolute_month(2001, 6) - absolute_month(2000, 6), 12);
    }

    #[test]
    fn test_month_of_roundtrip() {
        for year in [1899, 1970, 2000, 2004, 2100] {
            for month in 1..=12_u32 {
                let idx = absolute_month(year, month);
                assert_eq!(
                    month_of(idx),
                    (year, month),
                    "roundtrip mismatch at index {}",
                    idx
                );
            }
        }
    }

    #[test]
    fn test_time_format() {
        let dt = NaiveDate::from_ymd_opt(2004, 2, 29)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        assert_eq!(time_format(dt), "2004-02-29 13:45:00");
    }
}
