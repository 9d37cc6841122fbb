//! Auto-generation engine and month statistics.
//!
//! `AutoScheduler` rebuilds one month's main-instructor assignments with
//! a two-pass heuristic: a scarcity-first pass guarantees every placeable
//! instructor at least one slot, then a fair-fill pass spreads the
//! remaining load (fewest-in-group first, fewest-total second). It is
//! greedy and never backtracks; randomized tie-breaking comes from an
//! injected `Rng` so tests can seed it.
//!
//! `MonthStats` reports per-instructor load and coverage for a month.

mod generate;
mod stats;

pub use generate::{AutoScheduler, GenerationOutcome};
pub use stats::{InstructorTally, MonthStats};
