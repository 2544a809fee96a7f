use std::fmt::{Display, Formatter};

use crate::interval::Interval;

/// SEPARATOR joins the parts of a series pathname.
pub const SEPARATOR: &str = "/";

/// Identifier names a stored series: where it was observed, who produced it,
/// what was measured, how often, and under which scenario. The storage
/// engine consumes only the interval metadata; parsing the full pathname
/// format belongs to the naming layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier {
    pub location: String,
    pub source: String,
    pub parameter: String,
    pub interval: Interval,
    pub scenario: String,
}

impl Identifier {
    pub fn new(
        location: impl Into<String>,
        source: impl Into<String>,
        parameter: impl Into<String>,
        interval: Interval,
        scenario: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            source: source.into(),
            parameter: parameter.into(),
            interval,
            scenario: scenario.into(),
        }
    }

    /// interval returns the sampling interval carried by this identifier,
    /// the one piece of metadata the storage engine is configured from.
    pub fn interval(&self) -> Interval {
        self.interval
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            self.location,
            self.source,
            self.parameter,
            self.interval,
            self.scenario,
            sep = SEPARATOR
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::identifier::Identifier;
    use crate::interval::{Interval, Resolution};

    #[test]
    fn test_display() {
        let id = Identifier::new("GAPT", "USGS", "FLOW", Interval::hours(1), "OBS");
        assert_eq!(id.to_string(), "GAPT/USGS/FLOW/1Hour/OBS");
    }

    #[test]
    fn test_interval_metadata() {
        let id = Identifier::new("GAPT", "USGS", "STAGE", Interval::minutes(15), "OBS");
        assert_eq!(id.interval().resolution, Resolution::Minute);
        assert_eq!(id.interval().multiplier, 15);
    }
}
