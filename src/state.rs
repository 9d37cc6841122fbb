//! Application state.
//!
//! One explicit aggregate owns the roster and the schedule; the validator,
//! mutation service, and scheduling engine all borrow it. Nothing here is
//! ambient or global, and every method in this module is a pure query —
//! writes go through [`crate::mutation::Mutations`].
//!
//! The schedule map is keyed by date in a `BTreeMap`, which gives the
//! engine's fill pass and the delete cascade their deterministic date
//! order.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    weekday_index, DaySchedule, Group, Instructor, MergeTag, Month, ScheduleSlot,
};

/// Default weekly class-day pattern: Monday, Thursday, Saturday.
pub const DEFAULT_CLASS_DAYS: [u32; 3] = [1, 4, 6];

/// The seed roster merged in at load time.
///
/// Ids are stable so a deleted seed instructor can be remembered in
/// `deleted_default_ids` and never resurrected by reconciliation.
pub fn default_roster() -> Vec<Instructor> {
    [
        ("default-1", "JonasB"),
        ("default-2", "JonasS"),
        ("default-3", "Björn"),
        ("default-4", "Daniel"),
        ("default-5", "Stoffe"),
        ("default-6", "Ida"),
        ("default-8", "Mike"),
    ]
    .into_iter()
    .map(|(id, name)| Instructor::new(id, name))
    .collect()
}

/// The schedule-plus-roster aggregate.
///
/// Single-writer semantics: all operations run to completion within one
/// user-triggered event. A multi-threaded embedding must wrap this whole
/// aggregate in a mutex or actor boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// The instructor roster.
    pub instructors: Vec<Instructor>,
    /// Seed-roster ids the user deleted; reconciliation skips these.
    #[serde(default, rename = "deletedDefaultIds")]
    pub deleted_default_ids: Vec<String>,
    /// Per-day schedule, keyed by date.
    #[serde(default)]
    pub schedule: BTreeMap<NaiveDate, DaySchedule>,
    /// The month currently displayed and operated on.
    pub current: Month,
    /// Weekly class-day pattern (weekday indices, 0=Sun..6=Sat).
    #[serde(default, rename = "classDays")]
    pub class_days: Vec<u32>,
    /// Cancelled dates (holidays, repairs). Excluded from scheduling.
    #[serde(default, rename = "cancelledDays")]
    pub cancelled_days: BTreeSet<NaiveDate>,
}

impl Default for AppState {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        Self::new(Month::of(today))
    }
}

impl AppState {
    /// Creates a state with the seed roster and default class days.
    pub fn new(current: Month) -> Self {
        Self {
            instructors: default_roster(),
            deleted_default_ids: Vec::new(),
            schedule: BTreeMap::new(),
            current,
            class_days: DEFAULT_CLASS_DAYS.to_vec(),
            cancelled_days: BTreeSet::new(),
        }
    }

    /// Creates a state with an empty roster (for tests and embedding).
    pub fn empty(current: Month) -> Self {
        Self {
            instructors: Vec::new(),
            ..Self::new(current)
        }
    }

    // ---- roster ----

    /// Looks up an instructor by id.
    pub fn instructor(&self, id: &str) -> Option<&Instructor> {
        self.instructors.iter().find(|i| i.id == id)
    }

    /// Mutable lookup by id.
    pub fn instructor_mut(&mut self, id: &str) -> Option<&mut Instructor> {
        self.instructors.iter_mut().find(|i| i.id == id)
    }

    /// Adds an instructor to the roster.
    pub fn add_instructor(&mut self, instructor: Instructor) {
        self.instructors.push(instructor);
    }

    /// Edits an instructor in place. Unknown id is a no-op.
    pub fn update_instructor(
        &mut self,
        id: &str,
        name: impl Into<String>,
        groups: Vec<Group>,
        available_dates: Vec<NaiveDate>,
    ) {
        if let Some(i) = self.instructor_mut(id) {
            i.name = name.into();
            i.groups = groups;
            i.available_dates = available_dates;
        }
    }

    /// Roster members capable of teaching `group`, in roster order.
    pub fn instructors_capable_of(&self, group: Group) -> Vec<&Instructor> {
        self.instructors.iter().filter(|i| i.teaches(group)).collect()
    }

    /// Whether instructor `id` is available on `date`.
    ///
    /// Unknown ids are never available.
    pub fn available_on(&self, id: &str, date: NaiveDate) -> bool {
        self.instructor(id).is_some_and(|i| i.available_on(date))
    }

    // ---- schedule ----

    /// The day record for `date`, if one exists.
    pub fn day(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.schedule.get(&date)
    }

    /// The day record for `date`, created empty on first touch.
    pub fn ensure_day(&mut self, date: NaiveDate) -> &mut DaySchedule {
        self.schedule.entry(date).or_default()
    }

    /// The slot at (`date`, `group`), if the day exists.
    pub fn slot_at(&self, date: NaiveDate, group: Group) -> Option<&ScheduleSlot> {
        self.day(date).map(|d| d.slot(group))
    }

    /// The slot at (`date`, `group`), or an empty slot if absent.
    pub fn slot_data(&self, date: NaiveDate, group: Group) -> ScheduleSlot {
        self.slot_at(date, group).cloned().unwrap_or_default()
    }

    /// The merge tag for `date` (`MergeTag::None` if the day is absent).
    pub fn merges(&self, date: NaiveDate) -> MergeTag {
        self.day(date).map(|d| d.merges).unwrap_or_default()
    }

    /// Whether `date` is cancelled.
    pub fn is_cancelled(&self, date: NaiveDate) -> bool {
        self.cancelled_days.contains(&date)
    }

    /// Whether `date`'s weekday is in the configured class-day pattern.
    pub fn is_class_day(&self, date: NaiveDate) -> bool {
        self.class_days.contains(&weekday_index(date))
    }

    /// Configured, non-cancelled class dates of `month`, ascending.
    pub fn class_dates_in(&self, month: Month) -> Vec<NaiveDate> {
        month
            .class_dates(&self.class_days)
            .into_iter()
            .filter(|d| !self.is_cancelled(*d))
            .collect()
    }

    // ---- surplus ----

    /// Instructors available on `date` but not teaching or assisting any
    /// group that day.
    pub fn surplus_instructors(&self, date: NaiveDate) -> Vec<&Instructor> {
        let day = self.day(date);
        self.instructors
            .iter()
            .filter(|i| i.available_on(date))
            .filter(|i| day.is_none_or(|d| !d.involves(&i.id)))
            .collect()
    }

    /// Number of surplus instructors on `date`.
    pub fn surplus_count(&self, date: NaiveDate) -> usize {
        self.surplus_instructors(date).len()
    }
}
