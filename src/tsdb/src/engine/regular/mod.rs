//! Block storage for regular (fixed-interval) time series.
//!
//! A store owns one value block per calendar month spanned by its period of
//! record (per calendar year for the Month resolution). Block lengths are
//! fully determined by the calendar, never inferred from data: a Day block
//! holds days-in-month cells, an Hour block days*24/multiplier, a Minute
//! block one sub-array of 24*60/multiplier cells per day, and a Month block
//! a fixed 12. Every grid timestamp inside the period maps to exactly one
//! (block, offset) position and back.

pub mod block;
pub mod flags;
pub mod iter;
pub mod limits;
pub mod missing;
pub mod position;
pub mod resize;
pub mod store;
