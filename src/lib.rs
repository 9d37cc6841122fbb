//! Instructor scheduling core.
//!
//! The scheduling heart of a monthly class calendar: a roster of
//! instructors with per-date availability and per-group capability, a
//! (date, group)-keyed schedule with assistants and day merges, advisory
//! constraint validation, and a two-pass fair-distribution generator.
//! Persistence and share-link codecs sit at the edges behind narrow
//! interfaces; rendering is the embedding's job and only receives a
//! fire-and-forget redraw signal.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Instructor`, `ScheduleSlot`,
//!   `DaySchedule`, `Group`, `MergeTag`, `Month`
//! - **`state`**: The schedule-plus-roster aggregate and its pure queries
//! - **`validation`**: Ordered advisory warnings for proposed assignments
//!   and swaps
//! - **`mutation`**: Single-slot write operations, the delete cascade,
//!   and drag-drop planning
//! - **`scheduler`**: Two-pass auto-generation and month statistics
//! - **`persist`**: Snapshot save/load with seed-roster reconciliation
//! - **`share`**: Compressed read-only share links
//!
//! # Concurrency
//!
//! Everything is synchronous and single-threaded by design; operations
//! run to completion within one user-triggered event. Wrap [`state::AppState`]
//! in a mutex or actor boundary before sharing it across threads.

pub mod models;
pub mod mutation;
pub mod persist;
pub mod scheduler;
pub mod share;
pub mod state;
pub mod validation;

pub use models::{DaySchedule, Group, Instructor, MergeTag, Month, ScheduleSlot};
pub use mutation::{DropPlan, Mutations, RedrawSink};
pub use scheduler::{AutoScheduler, MonthStats};
pub use state::AppState;
pub use validation::{validate_assignment, validate_swap, Role};
