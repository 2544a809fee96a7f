use chrono::{Datelike, NaiveDateTime};
use tracing::debug;

use hydrots_base::identifier::Identifier;
use hydrots_base::interval::{Interval, Resolution};
use hydrots_base::point::DataPoint;
use hydrots_utils::time::{absolute_month, month_of};

use crate::engine::regular::block::{self, Block};
use crate::engine::regular::flags::{DataFlagStore, FlagSupport};
use crate::engine::regular::iter::Points;
use crate::engine::regular::limits::Limits;
use crate::engine::regular::missing::MissingValuePolicy;
use crate::engine::regular::position::{position, Position};
use crate::engine::regular::resize;
use crate::error::{Result, StoreError};

/// TimeSeriesStore maps every grid timestamp inside its period of record to
/// one numeric cell, plus an optional text flag held in congruent parallel
/// blocks. Storage is calendar-shaped: one block per calendar month spanned
/// by the period (per calendar year for the Month resolution), sized by
/// days-in-month and leap years, never inferred from data.
///
/// Out-of-period access is tolerated silently: reads return the missing
/// sentinel and writes are a counted no-op. Configuration problems surface
/// as typed errors from `allocate` and `change_period`.
///
/// A store is not safe for concurrent mutation; callers that share one
/// across threads must serialize access around the whole store.
#[derive(Debug)]
pub struct TimeSeriesStore {
    interval: Interval,
    period_start: Option<NaiveDateTime>,
    period_end: Option<NaiveDateTime>,
    units: String,
    blocks: Vec<Block>,
    flags: DataFlagStore,
    missing: MissingValuePolicy,
    dirty: bool,
    limits: Limits,
    provenance: Vec<String>,
}

impl TimeSeriesStore {
    /// new creates an empty store for the given interval. The period of
    /// record must be set before allocate is called.
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            period_start: None,
            period_end: None,
            units: String::new(),
            blocks: Vec::new(),
            flags: DataFlagStore::new(),
            missing: MissingValuePolicy::default(),
            dirty: false,
            limits: Limits::default(),
            provenance: Vec::new(),
        }
    }

    /// with_period creates an empty store covering [start, end].
    pub fn with_period(interval: Interval, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let mut store = Self::new(interval);
        store.set_period(start, end);
        store
    }

    /// for_identifier creates an empty store configured from the interval
    /// metadata carried by a series identifier. The identifier is not
    /// consulted for anything else.
    pub fn for_identifier(id: &Identifier) -> Self {
        Self::new(id.interval())
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// period_start returns the inclusive start of the period of record,
    /// truncated to the interval grid once the store is allocated.
    pub fn period_start(&self) -> Option<NaiveDateTime> {
        self.period_start
    }

    /// period_end returns the inclusive end of the period of record.
    pub fn period_end(&self) -> Option<NaiveDateTime> {
        self.period_end
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = units.into();
    }

    pub fn missing_policy(&self) -> MissingValuePolicy {
        self.missing
    }

    /// set_missing_policy replaces the missing-value policy. Cells already
    /// filled with a previous sentinel keep it, so the policy is normally
    /// fixed before allocate.
    pub fn set_missing_policy(&mut self, policy: MissingValuePolicy) {
        self.missing = policy;
    }

    /// set_missing_value makes `value` the sentinel, with the standard
    /// tolerance band around it.
    pub fn set_missing_value(&mut self, value: f64) {
        self.set_missing_policy(MissingValuePolicy::new(value));
    }

    /// set_missing_range marks every value in [low, high] as missing; the
    /// sentinel written into unset cells is the midpoint.
    pub fn set_missing_range(&mut self, low: f64, high: f64) {
        self.set_missing_policy(MissingValuePolicy::from_range(low, high));
    }

    pub fn missing_value(&self) -> f64 {
        self.missing.missing_value()
    }

    /// is_missing reports whether value reads as "no observation" under the
    /// store's policy.
    pub fn is_missing(&self, value: f64) -> bool {
        self.missing.is_missing(value)
    }

    /// set_period replaces the period of record. Any previously allocated
    /// blocks are discarded; use change_period to migrate data into a new
    /// period instead.
    pub fn set_period(&mut self, start: NaiveDateTime, end: NaiveDateTime) {
        self.period_start = Some(start);
        self.period_end = Some(end);
        self.blocks = Vec::new();
        self.flags = DataFlagStore::new();
        self.dirty = false;
        self.limits = Limits::default();
    }

    /// has_data reports whether blocks have been allocated, independent of
    /// whether any cell holds a non-missing value.
    pub fn has_data(&self) -> bool {
        !self.blocks.is_empty()
    }

    /// flag_support reports the lifecycle state of the parallel flag
    /// storage.
    pub fn flag_support(&self) -> FlagSupport {
        self.flags.support()
    }

    /// has_flags reports whether flag blocks are currently allocated.
    pub fn has_flags(&self) -> bool {
        self.flags.enabled()
    }

    /// provenance returns the history notes recorded against this store,
    /// oldest first. Period migration appends to it.
    pub fn provenance(&self) -> &[String] {
        &self.provenance
    }

    pub(crate) fn note(&mut self, note: String) {
        self.provenance.push(note);
    }

    /// allocate validates the configuration and builds every value block in
    /// one pass, filled with the missing sentinel. The period bounds are
    /// truncated onto the interval grid. Allocating again rebuilds the
    /// blocks from scratch and resets flag storage.
    pub fn allocate(&mut self) -> Result<()> {
        if !self.interval.supported() {
            return Err(StoreError::UnsupportedMultiplier {
                resolution: self.interval.resolution,
                multiplier: self.interval.multiplier,
            });
        }

        let (start, end) = match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(StoreError::PeriodNotSet),
        };
        let start = self.interval.truncate(start);
        let end = self.interval.truncate(end);
        if start > end {
            return Err(StoreError::EmptyPeriod { start, end });
        }
        self.period_start = Some(start);
        self.period_end = Some(end);

        let fill = self.missing.missing_value();
        let mut blocks = Vec::new();
        match self.interval.resolution {
            Resolution::Month => {
                // One block per calendar year.
                for year in start.year()..=end.year() {
                    blocks.push(block::build(self.interval, year, 1, fill)?);
                }
            }
            _ => {
                // One block per calendar month.
                let first = absolute_month(start.year(), start.month());
                let last = absolute_month(end.year(), end.month());
                for index in first..=last {
                    let (year, month) = month_of(index);
                    blocks.push(block::build(self.interval, year, month, fill)?);
                }
            }
        }

        let cells: usize = blocks.iter().map(|b| b.cells()).sum();
        debug!(
            "allocated {} blocks ({} cells) for {} period {} - {}",
            blocks.len(),
            cells,
            self.interval,
            start,
            end
        );

        self.blocks = blocks;
        self.flags = DataFlagStore::new();
        self.limits = Limits::default();
        self.dirty = true;
        Ok(())
    }

    /// enable_flags eagerly allocates the parallel flag storage and reports
    /// the resulting support state. Period migration uses this to carry
    /// flags across without waiting for the first flagged write.
    pub fn enable_flags(&mut self) -> FlagSupport {
        if !self.has_data() {
            return self.flags.support();
        }
        self.flags.allocate(&self.blocks)
    }

    /// locate resolves a timestamp to its storage cell, or None when the
    /// store is unallocated or the timestamp falls outside the period.
    fn locate(&self, t: NaiveDateTime) -> Option<Position> {
        if !self.has_data() {
            return None;
        }
        let start = self.period_start?;
        let end = self.period_end?;
        let t = self.interval.truncate(t);
        if t < start || t > end {
            return None;
        }
        Some(position(start, self.interval, t))
    }

    /// get returns the value stored for the timestamp, or the missing
    /// sentinel when the timestamp is outside the period of record. It
    /// never fails.
    pub fn get(&self, t: NaiveDateTime) -> f64 {
        match self.locate(t) {
            Some(pos) => self.blocks[pos.block].get(pos.day, pos.offset),
            None => self.missing.missing_value(),
        }
    }

    /// set writes the value for the timestamp and returns how many cells
    /// were set: 1, or 0 for an out-of-period timestamp (the store is left
    /// unchanged).
    pub fn set(&mut self, t: NaiveDateTime, value: f64) -> usize {
        match self.locate(t) {
            Some(pos) => {
                self.blocks[pos.block].set(pos.day, pos.offset, value);
                self.dirty = true;
                1
            }
            None => 0,
        }
    }

    /// set_with_flag writes a value and its data flag. The first non-empty
    /// flag lazily allocates the flag blocks; if that allocation fails the
    /// store degrades to Disabled flags and the value is still written.
    pub fn set_with_flag(&mut self, t: NaiveDateTime, value: f64, flag: &str) -> usize {
        let pos = match self.locate(t) {
            Some(pos) => pos,
            None => return 0,
        };

        self.blocks[pos.block].set(pos.day, pos.offset, value);
        self.dirty = true;

        if !flag.is_empty() && self.flags.support() == FlagSupport::Unallocated {
            self.flags.allocate(&self.blocks);
        }
        self.flags.set(pos, flag);
        1
    }

    /// get_flag returns the data flag stored for the timestamp, or the
    /// empty string when there is none.
    pub fn get_flag(&self, t: NaiveDateTime) -> &str {
        match self.locate(t) {
            Some(pos) => self.flags.get(pos),
            None => "",
        }
    }

    /// get_point combines get and the flag lookup into one observation,
    /// stamped with the series units. Out-of-period timestamps yield the
    /// sentinel value and an empty flag.
    pub fn get_point(&self, t: NaiveDateTime) -> DataPoint {
        let t = self.interval.truncate(t);
        DataPoint {
            timestamp: t,
            value: self.get(t),
            flag: self.get_flag(t).to_string(),
            units: self.units.clone(),
        }
    }

    /// set_range writes a batch of (timestamp, value) pairs and returns how
    /// many cells were actually set; out-of-period pairs are skipped.
    pub fn set_range(&mut self, points: &[(NaiveDateTime, f64)]) -> usize {
        points.iter().map(|(t, v)| self.set(*t, *v)).sum()
    }

    /// fill writes value into every in-period cell and returns the number
    /// of cells written.
    pub fn fill(&mut self, value: f64) -> usize {
        if !self.has_data() {
            return 0;
        }
        let start = self.period_start.unwrap();
        let end = self.period_end.unwrap();

        let mut count = 0;
        let mut t = start;
        loop {
            let pos = position(start, self.interval, t);
            self.blocks[pos.block].set(pos.day, pos.offset, value);
            count += 1;
            if t >= end {
                break;
            }
            t = self.interval.step(t);
        }
        self.dirty = true;
        count
    }

    /// iter returns a lazy, finite, forward-only iterator over every
    /// in-period point at the native step. Call iter again for a fresh
    /// pass.
    pub fn iter(&self) -> Points<'_> {
        Points::new(self)
    }

    /// refresh recomputes the cached limits by scanning every in-period
    /// cell. A clean store returns immediately, so calling refresh twice in
    /// a row does the scan once.
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }

        let mut limits = Limits::default();
        if self.has_data() {
            let start = self.period_start.unwrap();
            let end = self.period_end.unwrap();
            let mut t = start;
            loop {
                let pos = position(start, self.interval, t);
                let value = self.blocks[pos.block].get(pos.day, pos.offset);
                limits.total += 1;
                if !self.missing.is_missing(value) {
                    limits.observe(t, value);
                }
                if t >= end {
                    break;
                }
                t = self.interval.step(t);
            }
        }

        self.limits = limits;
        self.dirty = false;
    }

    /// limits returns the summary of the store, refreshing it first if a
    /// mutation has happened since the last scan. Stale limits are never
    /// returned.
    pub fn limits(&mut self) -> Limits {
        self.refresh();
        self.limits
    }

    /// coverage returns (non-missing cells, total in-period cells).
    pub fn coverage(&mut self) -> (usize, usize) {
        let limits = self.limits();
        (limits.non_missing, limits.total)
    }

    /// change_period builds a new store over [new_start, new_end] carrying
    /// the overlap of this store's data across. See
    /// `resize::change_period`.
    pub fn change_period(
        &self,
        new_start: NaiveDateTime,
        new_end: NaiveDateTime,
    ) -> Result<TimeSeriesStore> {
        resize::change_period(self, new_start, new_end)
    }
}
