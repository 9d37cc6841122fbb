//! Schedule slot and day models.
//!
//! A slot is the (date, group) assignment unit. Slots are fixed-shape
//! records: every optional concern is always present with an empty
//! default, so serialized payloads missing a field still parse and no
//! code path ever sees a conditionally-shaped slot.

use serde::{Deserialize, Serialize};

use super::{Group, MergeTag};

/// One group's teaching slot on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    /// Main instructor, `None` = unassigned.
    #[serde(default, rename = "instructorId")]
    pub instructor_id: Option<String>,
    /// Assistant instructors. Never contains the current main instructor.
    #[serde(default)]
    pub assistants: Vec<String>,
    /// Free-text class description.
    #[serde(default)]
    pub description: String,
    /// Optional feedback annotation for the class.
    #[serde(default, rename = "feedbackPoints")]
    pub feedback: String,
}

impl ScheduleSlot {
    /// Whether a main instructor is assigned.
    pub fn is_assigned(&self) -> bool {
        self.instructor_id.is_some()
    }

    /// Whether `id` is currently an assistant on this slot.
    pub fn has_assistant(&self, id: &str) -> bool {
        self.assistants.iter().any(|a| a == id)
    }

    /// Whether `id` is this slot's main instructor.
    pub fn is_main(&self, id: &str) -> bool {
        self.instructor_id.as_deref() == Some(id)
    }
}

/// A day's three group slots plus its merge state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Beginners slot.
    #[serde(default)]
    pub beginners: ScheduleSlot,
    /// Children slot.
    #[serde(default)]
    pub children: ScheduleSlot,
    /// Adults slot.
    #[serde(default)]
    pub adults: ScheduleSlot,
    /// How this day's slots are combined, stored once per day.
    #[serde(default)]
    pub merges: MergeTag,
}

impl DaySchedule {
    /// The slot for `group`.
    pub fn slot(&self, group: Group) -> &ScheduleSlot {
        match group {
            Group::Beginners => &self.beginners,
            Group::Children => &self.children,
            Group::Adults => &self.adults,
        }
    }

    /// Mutable slot for `group`.
    pub fn slot_mut(&mut self, group: Group) -> &mut ScheduleSlot {
        match group {
            Group::Beginners => &mut self.beginners,
            Group::Children => &mut self.children,
            Group::Adults => &mut self.adults,
        }
    }

    /// Whether `id` appears anywhere on this day, as main or assistant.
    pub fn involves(&self, id: &str) -> bool {
        Group::ALL
            .iter()
            .any(|&g| self.slot(g).is_main(id) || self.slot(g).has_assistant(id))
    }
}
