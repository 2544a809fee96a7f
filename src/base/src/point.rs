use chrono::NaiveDateTime;

/// DataPoint is one observation from a regular series: the grid timestamp,
/// the stored value, its data-quality flag and the series units.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
    pub flag: String,
    pub units: String,
}

impl DataPoint {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self {
            timestamp,
            value,
            flag: String::new(),
            units: String::new(),
        }
    }

    pub fn with_flag(timestamp: NaiveDateTime, value: f64, flag: impl Into<String>) -> Self {
        Self {
            timestamp,
            value,
            flag: flag.into(),
            units: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::point::DataPoint;
    use chrono::NaiveDate;

    #[test]
    fn test_new_has_empty_flag() {
        let t = NaiveDate::from_ymd_opt(2004, 2, 29)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let p = DataPoint::new(t, 12.5);
        assert_eq!(p.value, 12.5);
        assert_eq!(p.flag, "");
        assert_eq!(p.units, "");

        let q = DataPoint::with_flag(t, 12.5, "A");
        assert_eq!(q.flag, "A");
    }
}
