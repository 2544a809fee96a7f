use hydrots_base::interval::{Interval, Resolution};
use hydrots_utils::time::days_in_month;

use crate::error::{Result, StoreError};

/// MONTHS_PER_YEAR is the length of a Month-resolution block. For that
/// resolution one block covers a calendar year, not a calendar month; the
/// year-block layout drives the Month position formulas and must not be
/// collapsed into the month-block layout of the other resolutions.
pub const MONTHS_PER_YEAR: usize = 12;

/// MINUTES_PER_DAY is the number of minutes in one day sub-array before the
/// multiplier is applied.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Block is one unit of contiguous storage: a calendar month of cells for
/// the Minute/Hour/Day resolutions, a calendar year for Month. Minute
/// months hold one sub-array per day so a day of readings stays contiguous.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Flat(Vec<f64>),
    Daily(Vec<Vec<f64>>),
}

impl Block {
    /// cells returns the number of value cells in this block.
    pub fn cells(&self) -> usize {
        match self {
            Block::Flat(values) => values.len(),
            Block::Daily(days) => days.iter().map(|day| day.len()).sum(),
        }
    }

    /// get reads one cell. `day` addresses the sub-array for Daily blocks
    /// and must be zero for Flat blocks. An offset outside the block is a
    /// position-mapping bug and panics.
    pub fn get(&self, day: usize, offset: usize) -> f64 {
        match self {
            Block::Flat(values) => {
                debug_assert_eq!(day, 0, "flat block addressed with day {}", day);
                values[offset]
            }
            Block::Daily(days) => days[day][offset],
        }
    }

    /// set writes one cell; same addressing contract as get.
    pub fn set(&mut self, day: usize, offset: usize, value: f64) {
        match self {
            Block::Flat(values) => {
                debug_assert_eq!(day, 0, "flat block addressed with day {}", day);
                values[offset] = value;
            }
            Block::Daily(days) => days[day][offset] = value,
        }
    }

    /// fill overwrites every cell in the block with value.
    pub fn fill(&mut self, value: f64) {
        match self {
            Block::Flat(values) => {
                for v in values.iter_mut() {
                    *v = value;
                }
            }
            Block::Daily(days) => {
                for day in days.iter_mut() {
                    for v in day.iter_mut() {
                        *v = value;
                    }
                }
            }
        }
    }
}

/// day_length returns the number of Minute cells in one day sub-array.
pub fn day_length(interval: Interval) -> usize {
    (MINUTES_PER_DAY / interval.multiplier) as usize
}

/// block_length returns the number of value cells that belong in one block:
/// days-in-month for Day, days*24/multiplier for Hour, days*24*60/multiplier
/// for Minute, and a fixed 12 for Month (one block per year). The length is
/// fully determined by the calendar, never inferred from data. An
/// out-of-range multiplier is a configuration error.
pub fn block_length(interval: Interval, year: i32, month: u32) -> Result<usize> {
    if !interval.supported() {
        return Err(StoreError::UnsupportedMultiplier {
            resolution: interval.resolution,
            multiplier: interval.multiplier,
        });
    }

    let days = days_in_month(year, month) as usize;
    let length = match interval.resolution {
        Resolution::Day => days,
        Resolution::Hour => days * 24 / interval.multiplier as usize,
        Resolution::Minute => days * day_length(interval),
        Resolution::Month => MONTHS_PER_YEAR,
    };
    Ok(length)
}

/// build allocates the block for the given calendar month (calendar year
/// for the Month resolution), every cell filled with `fill`.
pub fn build(interval: Interval, year: i32, month: u32, fill: f64) -> Result<Block> {
    if !interval.supported() {
        return Err(StoreError::UnsupportedMultiplier {
            resolution: interval.resolution,
            multiplier: interval.multiplier,
        });
    }

    let days = days_in_month(year, month) as usize;
    let block = match interval.resolution {
        Resolution::Minute => Block::Daily(vec![vec![fill; day_length(interval)]; days]),
        Resolution::Hour => Block::Flat(vec![fill; days * 24 / interval.multiplier as usize]),
        Resolution::Day => Block::Flat(vec![fill; days]),
        Resolution::Month => Block::Flat(vec![fill; MONTHS_PER_YEAR]),
    };
    Ok(block)
}

#[cfg(test)]
mod tests {
    use crate::engine::regular::block::{block_length, build, day_length, Block};
    use crate::error::StoreError;
    use hydrots_base::interval::{Interval, Resolution};

    #[test]
    fn test_day_block_length() {
        assert_eq!(block_length(Interval::daily(), 2004, 1).unwrap(), 31);
        assert_eq!(
            block_length(Interval::daily(), 2004, 2).unwrap(),
            29,
            "leap February"
        );
        assert_eq!(
            block_length(Interval::daily(), 2003, 2).unwrap(),
            28,
            "non-leap February"
        );
    }

    #[test]
    fn test_hour_block_length() {
        assert_eq!(
            block_length(Interval::hours(1), 2004, 2).unwrap(),
            29 * 24,
            "hourly slots scale with the leap day"
        );
        assert_eq!(block_length(Interval::hours(6), 2000, 6).unwrap(), 30 * 4);
        assert_eq!(block_length(Interval::hours(24), 2000, 1).unwrap(), 31);
    }

    #[test]
    fn test_minute_block_length() {
        assert_eq!(
            block_length(Interval::minutes(15), 2000, 4).unwrap(),
            30 * 96
        );
        assert_eq!(day_length(Interval::minutes(1)), 1440);
        assert_eq!(day_length(Interval::minutes(60)), 24);
    }

    #[test]
    fn test_month_block_is_a_year() {
        // For the Month resolution a block covers a calendar year.
        for month in 1..=12 {
            assert_eq!(block_length(Interval::monthly(), 2000, month).unwrap(), 12);
        }
    }

    #[test]
    fn test_unsupported_multiplier() {
        let err = block_length(Interval::minutes(61), 2000, 1).unwrap_err();
        assert!(
            matches!(err, StoreError::UnsupportedMultiplier { multiplier: 61, .. }),
            "got {:?}",
            err
        );
        assert!(block_length(Interval::hours(25), 2000, 1).is_err());
        assert!(build(Interval::new(Resolution::Day, 2), 2000, 1, 0.0).is_err());
    }

    #[test]
    fn test_build_shapes() {
        let day = build(Interval::daily(), 2004, 2, -999.0).unwrap();
        assert_eq!(day.cells(), 29);
        assert_eq!(day.get(0, 28), -999.0);

        let minute = build(Interval::minutes(15), 2004, 2, -999.0).unwrap();
        match &minute {
            Block::Daily(days) => {
                assert_eq!(days.len(), 29);
                assert_eq!(days[0].len(), 96);
            }
            Block::Flat(_) => panic!("minute block should be daily"),
        }
        assert_eq!(minute.cells(), 29 * 96);
    }

    #[test]
    fn test_fill_and_set() {
        let mut b = build(Interval::daily(), 2000, 6, -999.0).unwrap();
        b.fill(1.5);
        assert_eq!(b.get(0, 0), 1.5);
        assert_eq!(b.get(0, 29), 1.5);
        b.set(0, 10, 42.0);
        assert_eq!(b.get(0, 10), 42.0);
        assert_eq!(b.get(0, 11), 1.5);
    }
}
