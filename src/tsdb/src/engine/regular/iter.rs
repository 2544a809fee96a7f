use chrono::NaiveDateTime;

use hydrots_base::point::DataPoint;

use crate::engine::regular::store::TimeSeriesStore;

/// Points walks every in-period cell of a store at the native step, missing
/// cells included. A single instance is forward-only; obtain a fresh one
/// from `TimeSeriesStore::iter` to restart.
pub struct Points<'a> {
    store: &'a TimeSeriesStore,
    next: Option<NaiveDateTime>,
}

impl<'a> Points<'a> {
    pub(crate) fn new(store: &'a TimeSeriesStore) -> Self {
        let next = if store.has_data() {
            store.period_start()
        } else {
            None
        };
        Self { store, next }
    }
}

impl Iterator for Points<'_> {
    type Item = DataPoint;

    fn next(&mut self) -> Option<DataPoint> {
        let t = self.next?;
        let point = self.store.get_point(t);

        let end = self.store.period_end().expect("allocated store has an end");
        self.next = if t >= end {
            None
        } else {
            Some(self.store.interval().step(t))
        };
        Some(point)
    }
}
