//! Scheduling domain models.
//!
//! Core data types for the instructor calendar: the roster entry
//! ([`Instructor`]), the per-day assignment records ([`ScheduleSlot`],
//! [`DaySchedule`]), the closed [`Group`] and [`MergeTag`] enumerations,
//! and the [`Month`] calendar unit. Pure data plus pure query helpers —
//! no side effects, no I/O.

mod group;
mod instructor;
mod merge;
mod month;
mod slot;

pub use group::Group;
pub use instructor::Instructor;
pub use merge::MergeTag;
pub use month::{weekday_index, Month};
pub use slot::{DaySchedule, ScheduleSlot};
