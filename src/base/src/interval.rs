use std::fmt::{Display, Formatter};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// MAX_MINUTE_MULTIPLIER is the largest supported multiplier for the Minute
/// resolution.
pub const MAX_MINUTE_MULTIPLIER: u32 = 60;

/// MAX_HOUR_MULTIPLIER is the largest supported multiplier for the Hour
/// resolution.
pub const MAX_HOUR_MULTIPLIER: u32 = 24;

/// Resolution is the fixed sampling unit of a regular time series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    Minute,
    Hour,
    Day,
    Month,
}

impl Resolution {
    pub fn name(&self) -> &'static str {
        match self {
            Resolution::Minute => "Minute",
            Resolution::Hour => "Hour",
            Resolution::Day => "Day",
            Resolution::Month => "Month",
        }
    }
}

/// Interval combines a resolution with an integer multiplier, e.g. 15-minute
/// or 6-hour. Day and Month support only multiplier 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    pub resolution: Resolution,
    pub multiplier: u32,
}

impl Interval {
    pub fn new(resolution: Resolution, multiplier: u32) -> Self {
        Self {
            resolution,
            multiplier,
        }
    }

    pub fn minutes(multiplier: u32) -> Self {
        Self::new(Resolution::Minute, multiplier)
    }

    pub fn hours(multiplier: u32) -> Self {
        Self::new(Resolution::Hour, multiplier)
    }

    pub fn daily() -> Self {
        Self::new(Resolution::Day, 1)
    }

    pub fn monthly() -> Self {
        Self::new(Resolution::Month, 1)
    }

    /// supported reports whether the multiplier is in range for the
    /// resolution. The check is surfaced as a configuration error at
    /// allocation time, never as a panic.
    pub fn supported(&self) -> bool {
        match self.resolution {
            Resolution::Minute => self.multiplier >= 1 && self.multiplier <= MAX_MINUTE_MULTIPLIER,
            Resolution::Hour => self.multiplier >= 1 && self.multiplier <= MAX_HOUR_MULTIPLIER,
            Resolution::Day | Resolution::Month => self.multiplier == 1,
        }
    }

    /// truncate clamps t down onto the interval grid so that reads and
    /// writes agree on cell identity. The grid is calendar-anchored: hour
    /// and minute groups count from the start of the month and day
    /// respectively, matching the block position formulas.
    pub fn truncate(&self, t: NaiveDateTime) -> NaiveDateTime {
        let m = self.multiplier;
        match self.resolution {
            Resolution::Minute => {
                let mins = (t.hour() * 60 + t.minute()) / m * m;
                t.date().and_hms_opt(mins / 60, mins % 60, 0).unwrap()
            }
            Resolution::Hour => {
                let hours = ((t.day() - 1) * 24 + t.hour()) / m * m;
                NaiveDate::from_ymd_opt(t.year(), t.month(), hours / 24 + 1)
                    .unwrap()
                    .and_hms_opt(hours % 24, 0, 0)
                    .unwrap()
            }
            Resolution::Day => t.date().and_hms_opt(0, 0, 0).unwrap(),
            Resolution::Month => NaiveDate::from_ymd_opt(t.year(), t.month(), 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    /// step returns the next grid timestamp after t at the native interval.
    pub fn step(&self, t: NaiveDateTime) -> NaiveDateTime {
        match self.resolution {
            Resolution::Minute => t + Duration::minutes(self.multiplier as i64),
            Resolution::Hour => t + Duration::hours(self.multiplier as i64),
            Resolution::Day => t + Duration::days(1),
            Resolution::Month => {
                let (year, month) = if t.month() == 12 {
                    (t.year() + 1, 1)
                } else {
                    (t.year(), t.month() + 1)
                };
                NaiveDate::from_ymd_opt(year, month, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            }
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.multiplier, self.resolution.name())
    }
}

#[cfg(test)]
mod tests {
    use crate::interval::{Interval, Resolution};
    use chrono::NaiveDate;

    fn dt(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    ) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_supported_multipliers() {
        assert!(Interval::minutes(1).supported());
        assert!(Interval::minutes(15).supported());
        assert!(Interval::minutes(60).supported());
        assert!(!Interval::minutes(61).supported());
        assert!(!Interval::minutes(0).supported());

        assert!(Interval::hours(1).supported());
        assert!(Interval::hours(24).supported());
        assert!(!Interval::hours(25).supported());

        assert!(Interval::daily().supported());
        assert!(!Interval::new(Resolution::Day, 2).supported());
        assert!(Interval::monthly().supported());
        assert!(!Interval::new(Resolution::Month, 3).supported());
    }

    #[test]
    fn test_truncate() {
        let t = dt(2004, 2, 29, 13, 47);

        assert_eq!(Interval::minutes(15).truncate(t), dt(2004, 2, 29, 13, 45));
        assert_eq!(Interval::minutes(1).truncate(t), dt(2004, 2, 29, 13, 47));
        assert_eq!(Interval::hours(6).truncate(t), dt(2004, 2, 29, 12, 0));
        assert_eq!(Interval::daily().truncate(t), dt(2004, 2, 29, 0, 0));
        assert_eq!(Interval::monthly().truncate(t), dt(2004, 2, 1, 0, 0));
    }

    #[test]
    fn test_step() {
        assert_eq!(
            Interval::minutes(15).step(dt(2000, 1, 31, 23, 45)),
            dt(2000, 2, 1, 0, 0),
            "minute step crosses the month boundary"
        );
        assert_eq!(
            Interval::hours(6).step(dt(2000, 6, 1, 18, 0)),
            dt(2000, 6, 2, 0, 0)
        );
        assert_eq!(
            Interval::daily().step(dt(2004, 2, 28, 0, 0)),
            dt(2004, 2, 29, 0, 0),
            "daily step lands on the leap day"
        );
        assert_eq!(
            Interval::monthly().step(dt(2000, 12, 1, 0, 0)),
            dt(2001, 1, 1, 0, 0),
            "month step crosses the year boundary"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Interval::minutes(15).to_string(), "15Minute");
        assert_eq!(Interval::hours(1).to_string(), "1Hour");
        assert_eq!(Interval::monthly().to_string(), "1Month");
    }
}
