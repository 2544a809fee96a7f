use chrono::NaiveDateTime;
use tracing::debug;

use hydrots_utils::time::time_format;

use crate::engine::regular::store::TimeSeriesStore;
use crate::error::{Result, StoreError};

/// change_period builds a new store over [new_start, new_end] and copies
/// the overlap with the old period across, cell by cell, through the
/// position mapping on both sides. Cells outside the overlap start as
/// missing; data dropped by a shrinking period is gone afterwards, so
/// callers copy it out first if they still need it.
///
/// The new store inherits the old store's interval, units, missing-value
/// policy and provenance, and gets one more provenance note recording the
/// period change. Flag storage is carried across when the old store has it.
pub fn change_period(
    old: &TimeSeriesStore,
    new_start: NaiveDateTime,
    new_end: NaiveDateTime,
) -> Result<TimeSeriesStore> {
    if !old.has_data() {
        return Err(StoreError::NotAllocated);
    }
    let old_start = old.period_start().expect("allocated store has a period");
    let old_end = old.period_end().expect("allocated store has a period");

    let mut store = TimeSeriesStore::with_period(old.interval(), new_start, new_end);
    store.set_units(old.units());
    store.set_missing_policy(old.missing_policy());
    store.allocate()?;
    if old.has_flags() {
        store.enable_flags();
    }

    let start = store.period_start().unwrap();
    let end = store.period_end().unwrap();

    let transfer_start = old_start.max(start);
    let transfer_end = old_end.min(end);

    let mut copied = 0;
    if transfer_start <= transfer_end {
        let interval = old.interval();
        let mut t = transfer_start;
        loop {
            let value = old.get(t);
            let flag = old.get_flag(t);
            if flag.is_empty() {
                copied += store.set(t, value);
            } else {
                copied += store.set_with_flag(t, value, flag);
            }
            if t >= transfer_end {
                break;
            }
            t = interval.step(t);
        }
    }

    for note in old.provenance() {
        store.note(note.clone());
    }
    store.note(format!(
        "changed period from {} - {} to {} - {}",
        time_format(old_start),
        time_format(old_end),
        time_format(start),
        time_format(end)
    ));

    debug!(
        "changed period from {} - {} to {} - {}, copied {} cells",
        old_start, old_end, start, end, copied
    );
    Ok(store)
}
