pub mod regular;

/// DEFAULT_MISSING_VALUE is the numeric sentinel meaning "no observation".
pub const DEFAULT_MISSING_VALUE: f64 = -999.0;

/// MISSING_TOLERANCE is the half-width of the band around the sentinel that
/// absorbs floating point round off introduced by serialization.
pub const MISSING_TOLERANCE: f64 = 0.001;
