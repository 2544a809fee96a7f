use chrono::{Datelike, NaiveDateTime, Timelike};
use hydrots_base::interval::{Interval, Resolution};
use hydrots_utils::time::absolute_month;

/// Position locates one cell in block storage: a block index plus the
/// intra-block offsets. The Minute resolution addresses a day sub-array
/// first and then a slot within the day; the other resolutions leave `day`
/// at zero and use `offset` alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub block: usize,
    pub day: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, day: usize, offset: usize) -> Self {
        Self { block, day, offset }
    }

    pub fn flat(block: usize, offset: usize) -> Self {
        Self {
            block,
            day: 0,
            offset,
        }
    }
}

/// position maps a grid timestamp to its storage cell.
///
/// The caller guarantees period_start <= t with both timestamps on the
/// interval grid; under that contract the mapping is a bijection between
/// in-period grid timestamps and in-bounds positions. The function is pure:
/// it returns a fresh Position by value and keeps no scratch state between
/// calls, so it is safe to call reentrantly from both sides of a period
/// migration.
///
/// Block indexing: Minute/Hour/Day blocks are calendar months, indexed by
/// the difference in absolute months from the period start; Month blocks
/// are calendar years, indexed by the difference in years.
pub fn position(period_start: NaiveDateTime, interval: Interval, t: NaiveDateTime) -> Position {
    let m = interval.multiplier;
    match interval.resolution {
        Resolution::Month => {
            let block = t.year() - period_start.year();
            debug_assert!(block >= 0, "timestamp {} before period start", t);
            Position::flat(block as usize, t.month() as usize - 1)
        }
        Resolution::Day => {
            Position::flat(month_block(period_start, t), t.day() as usize - 1)
        }
        Resolution::Hour => {
            let offset = ((t.day() - 1) * 24 + t.hour()) / m;
            Position::flat(month_block(period_start, t), offset as usize)
        }
        Resolution::Minute => {
            let offset = (t.hour() * 60 + t.minute()) / m;
            Position::new(
                month_block(period_start, t),
                t.day() as usize - 1,
                offset as usize,
            )
        }
    }
}

fn month_block(period_start: NaiveDateTime, t: NaiveDateTime) -> usize {
    let block = absolute_month(t.year(), t.month())
        - absolute_month(period_start.year(), period_start.month());
    debug_assert!(block >= 0, "timestamp {} before period start", t);
    block as usize
}
