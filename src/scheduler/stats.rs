//! Month statistics.
//!
//! Computes per-instructor load and coverage counts for one month's
//! configured class days. Groups merged into another group's block are
//! skipped entirely — a merged day teaches fewer sessions, and neither
//! the absorbed slot's assignment nor its vacancy is counted.

use std::collections::HashMap;

use crate::models::{Group, Month};
use crate::state::AppState;

/// Per-instructor session counts for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructorTally {
    /// Display name at calculation time.
    pub name: String,
    /// Sessions taught per group, indexed like [`Group::ALL`].
    pub beginners: usize,
    /// Children sessions.
    pub children: usize,
    /// Adults sessions.
    pub adults: usize,
    /// All sessions this month.
    pub total: usize,
}

impl InstructorTally {
    /// Count for `group`.
    pub fn group(&self, group: Group) -> usize {
        match group {
            Group::Beginners => self.beginners,
            Group::Children => self.children,
            Group::Adults => self.adults,
        }
    }

    fn bump(&mut self, group: Group) {
        match group {
            Group::Beginners => self.beginners += 1,
            Group::Children => self.children += 1,
            Group::Adults => self.adults += 1,
        }
        self.total += 1;
    }
}

/// Coverage statistics for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthStats {
    /// Counts keyed by instructor id (every roster member present).
    pub per_instructor: HashMap<String, InstructorTally>,
    /// Assigned, non-merged slots on class days.
    pub total_assignments: usize,
    /// Unassigned, non-merged slots on class days.
    pub unassigned_slots: usize,
    /// Class days carrying any merge.
    pub merged_days: usize,
    /// Configured, non-cancelled class days in the month.
    pub class_day_count: usize,
}

impl MonthStats {
    /// Computes statistics for `month` over the configured class days.
    pub fn calculate(state: &AppState, month: Month) -> Self {
        let mut stats = Self {
            per_instructor: state
                .instructors
                .iter()
                .map(|i| {
                    (
                        i.id.clone(),
                        InstructorTally {
                            name: i.name.clone(),
                            ..InstructorTally::default()
                        },
                    )
                })
                .collect(),
            ..Self::default()
        };

        let class_dates = state.class_dates_in(month);
        stats.class_day_count = class_dates.len();

        for date in class_dates {
            let merges = state.merges(date);
            if merges != crate::models::MergeTag::None {
                stats.merged_days += 1;
            }

            for group in Group::ALL {
                if merges.is_merged(group) {
                    continue;
                }
                let slot = state.slot_data(date, group);
                match slot.instructor_id.as_deref() {
                    Some(id) => {
                        // Ids no longer in the roster count nowhere.
                        if let Some(tally) = stats.per_instructor.get_mut(id) {
                            tally.bump(group);
                            stats.total_assignments += 1;
                        }
                    }
                    None => stats.unassigned_slots += 1,
                }
            }
        }

        stats
    }
}
