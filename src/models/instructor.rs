//! Instructor model.
//!
//! An instructor has a stable opaque id, a display name, the set of group
//! categories they can teach, and the calendar dates they are available.
//! Availability is an explicit date list (not a weekday pattern): the
//! roster editor collects individual dates per instructor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Group;

/// An instructor in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    /// Unique, stable identifier. Opaque to the core.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Group categories this instructor can teach.
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Dates this instructor is available, ISO-ordered as entered.
    #[serde(default, rename = "availableDates")]
    pub available_dates: Vec<NaiveDate>,
}

impl Instructor {
    /// Creates an instructor with no capabilities or availability.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            groups: Vec::new(),
            available_dates: Vec::new(),
        }
    }

    /// Adds a teachable group.
    pub fn with_group(mut self, group: Group) -> Self {
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
        self
    }

    /// Sets the teachable groups.
    pub fn with_groups(mut self, groups: impl IntoIterator<Item = Group>) -> Self {
        self.groups = groups.into_iter().collect();
        self
    }

    /// Sets the available dates.
    pub fn with_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.available_dates = dates.into_iter().collect();
        self
    }

    /// Whether this instructor can teach `group`.
    pub fn teaches(&self, group: Group) -> bool {
        self.groups.contains(&group)
    }

    /// Whether this instructor is available on `date`.
    pub fn available_on(&self, date: NaiveDate) -> bool {
        self.available_dates.contains(&date)
    }
}
