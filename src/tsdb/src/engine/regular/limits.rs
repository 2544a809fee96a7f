use chrono::NaiveDateTime;

/// Limits is the cached summary of a store: extreme values, first and last
/// non-missing timestamps, and cell counts. The summary is valid only while
/// the store is clean; any mutation marks the store dirty and the next
/// refresh rescans every block. An all-missing store has `None` in every
/// optional field.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Limits {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub first_time: Option<NaiveDateTime>,
    pub last_time: Option<NaiveDateTime>,
    pub non_missing: usize,
    pub total: usize,
}

impl Limits {
    /// observe folds one non-missing cell into the summary. The refresh
    /// scan visits cells in time order, so first_time sticks at the first
    /// call and last_time follows every call.
    pub(crate) fn observe(&mut self, t: NaiveDateTime, value: f64) {
        self.non_missing += 1;
        if self.first_time.is_none() {
            self.first_time = Some(t);
        }
        self.last_time = Some(t);

        match self.min_value {
            Some(min) if min <= value => {}
            _ => self.min_value = Some(value),
        }
        match self.max_value {
            Some(max) if max >= value => {}
            _ => self.max_value = Some(value),
        }
    }
}
