use chrono::NaiveDateTime;
use hydrots_base::interval::Resolution;
use thiserror::Error;

/// A convenience `Result` type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// StoreError is the typed configuration failure raised when a store is
/// allocated or its period of record is changed. Per-value reads and writes
/// never fail: out-of-period timestamps read as missing and write as a
/// no-op.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The period of record was never set.
    #[error("period of record not set")]
    PeriodNotSet,

    /// The period of record ends before it starts.
    #[error("empty period of record: {start} > {end}")]
    EmptyPeriod {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// The multiplier is outside the supported range for the resolution.
    #[error("unsupported multiplier {multiplier} for {resolution:?} resolution")]
    UnsupportedMultiplier {
        resolution: Resolution,
        multiplier: u32,
    },

    /// The operation requires allocated blocks.
    #[error("store has no allocated blocks")]
    NotAllocated,
}
