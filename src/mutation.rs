//! Schedule mutation service.
//!
//! Idempotent, single-slot write operations over [`AppState`]. Each
//! notifying operation ends with exactly one redraw request; the
//! `_silent` variants omit it so compound operations (move, swap) can
//! redraw once at the end. Operations referencing unknown instructors or
//! empty slots resolve to safe no-ops.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{Group, MergeTag, Month};
use crate::state::AppState;

/// Fire-and-forget redraw signal to the presentation layer.
///
/// The core never waits on the sink and never calls anything else on the
/// presentation side.
pub trait RedrawSink {
    /// Request a redraw. Must not call back into the core.
    fn request_redraw(&mut self);
}

/// Counts redraw requests. Useful in tests and headless embeddings.
#[derive(Debug, Default)]
pub struct CountingSink {
    /// Number of redraws requested so far.
    pub redraws: usize,
}

impl RedrawSink for CountingSink {
    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}

/// What a drag-drop onto a slot should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPlan {
    /// Assign the dragged instructor to the (empty or same-held) target.
    Assign,
    /// Calendar-origin drag: vacate the source slot, fill the target.
    Move,
    /// Calendar-origin drag onto an occupied slot: trade main instructors.
    Swap,
    /// Sidebar drag onto an occupied slot: the caller must ask the user
    /// whether to replace the incumbent or add the newcomer as assistant.
    ChoiceRequired {
        /// The instructor currently holding the target slot.
        incumbent: String,
    },
}

/// Write access to the schedule, bundled with the redraw signal.
pub struct Mutations<'a> {
    state: &'a mut AppState,
    sink: Option<&'a mut dyn RedrawSink>,
}

impl<'a> Mutations<'a> {
    /// Creates a mutation service that notifies `sink` after each operation.
    pub fn new(state: &'a mut AppState, sink: &'a mut dyn RedrawSink) -> Self {
        Self {
            state,
            sink: Some(sink),
        }
    }

    /// Creates a mutation service with no redraw notifications.
    pub fn headless(state: &'a mut AppState) -> Self {
        Self { state, sink: None }
    }

    fn redraw(&mut self) {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.request_redraw();
        }
    }

    // ---- main instructor ----

    /// Sets the slot's main instructor (`None` unassigns).
    ///
    /// Prior assistants and description are preserved; if the incoming
    /// instructor was an assistant on this slot, they are promoted out of
    /// the assistant list so it never contains the main instructor.
    pub fn assign(&mut self, date: NaiveDate, group: Group, instructor_id: Option<&str>) {
        self.assign_silent(date, group, instructor_id);
        self.redraw();
    }

    /// [`Self::assign`] without the redraw.
    pub fn assign_silent(&mut self, date: NaiveDate, group: Group, instructor_id: Option<&str>) {
        let slot = self.state.ensure_day(date).slot_mut(group);
        slot.instructor_id = instructor_id.map(str::to_owned);
        if let Some(id) = instructor_id {
            slot.assistants.retain(|a| a != id);
        }
    }

    /// Clears the slot's main instructor. Assistants are kept: an
    /// unassigned slot may still carry assistant coverage.
    pub fn unassign(&mut self, date: NaiveDate, group: Group) {
        self.unassign_silent(date, group);
        self.redraw();
    }

    /// [`Self::unassign`] without the redraw.
    pub fn unassign_silent(&mut self, date: NaiveDate, group: Group) {
        if let Some(day) = self.state.schedule.get_mut(&date) {
            day.slot_mut(group).instructor_id = None;
        }
    }

    /// Trades the main instructors of two occupied slots.
    ///
    /// Each slot keeps its own assistants and description. Expressed as
    /// two silent assigns followed by a single redraw; no intermediate
    /// state is observable from the single-threaded caller.
    pub fn swap(&mut self, source: (NaiveDate, Group), target: (NaiveDate, Group)) {
        let moving = self
            .state
            .slot_at(source.0, source.1)
            .and_then(|s| s.instructor_id.clone());
        let displaced = self
            .state
            .slot_at(target.0, target.1)
            .and_then(|s| s.instructor_id.clone());

        let (Some(moving), Some(displaced)) = (moving, displaced) else {
            return;
        };

        self.assign_silent(source.0, source.1, Some(&displaced));
        self.assign_silent(target.0, target.1, Some(&moving));
        self.redraw();
    }

    // ---- assistants ----

    /// Adds an assistant to the slot.
    ///
    /// No-op (not an error) when the id is already present, equals the
    /// slot's main instructor, or is not in the roster.
    pub fn add_assistant(&mut self, date: NaiveDate, group: Group, instructor_id: &str) {
        if self.state.instructor(instructor_id).is_none() {
            return;
        }
        let slot = self.state.ensure_day(date).slot_mut(group);
        if slot.is_main(instructor_id) || slot.has_assistant(instructor_id) {
            return;
        }
        slot.assistants.push(instructor_id.to_owned());
        self.redraw();
    }

    /// Removes an assistant from the slot. Absent id is a no-op.
    pub fn remove_assistant(&mut self, date: NaiveDate, group: Group, instructor_id: &str) {
        if let Some(day) = self.state.schedule.get_mut(&date) {
            day.slot_mut(group).assistants.retain(|a| a != instructor_id);
        }
        self.redraw();
    }

    // ---- slot annotations ----

    /// Sets the slot's description, and its feedback when given.
    pub fn set_description(
        &mut self,
        date: NaiveDate,
        group: Group,
        description: impl Into<String>,
        feedback: Option<&str>,
    ) {
        let slot = self.state.ensure_day(date).slot_mut(group);
        slot.description = description.into();
        if let Some(feedback) = feedback {
            slot.feedback = feedback.to_owned();
        }
        self.redraw();
    }

    /// Sets the day's merge tag. Independent of slot instructor data.
    pub fn set_merges(&mut self, date: NaiveDate, merges: MergeTag) {
        self.state.ensure_day(date).merges = merges;
        self.redraw();
    }

    // ---- days ----

    /// Flags a date as cancelled.
    pub fn cancel_day(&mut self, date: NaiveDate) {
        self.state.cancelled_days.insert(date);
        self.redraw();
    }

    /// Clears a date's cancelled flag.
    pub fn restore_day(&mut self, date: NaiveDate) {
        self.state.cancelled_days.remove(&date);
        self.redraw();
    }

    /// Deletes `month`'s schedule entries and cancelled-day flags.
    /// Other months are untouched.
    pub fn clear_month(&mut self, month: Month) {
        self.state.schedule.retain(|date, _| !month.contains(*date));
        self.state.cancelled_days.retain(|date| !month.contains(*date));
        debug!(year = month.year, month = month.month, "cleared month");
        self.redraw();
    }

    // ---- roster cascade ----

    /// Removes an instructor from the roster and from every slot that
    /// references them, as main or assistant. Seed-roster ids are
    /// remembered so load-time reconciliation never resurrects them.
    pub fn delete_instructor_cascade(&mut self, instructor_id: &str) {
        if instructor_id.starts_with("default-")
            && !self.state.deleted_default_ids.iter().any(|d| d == instructor_id)
        {
            self.state.deleted_default_ids.push(instructor_id.to_owned());
        }

        self.state.instructors.retain(|i| i.id != instructor_id);

        for day in self.state.schedule.values_mut() {
            for group in Group::ALL {
                let slot = day.slot_mut(group);
                if slot.is_main(instructor_id) {
                    slot.instructor_id = None;
                }
                slot.assistants.retain(|a| a != instructor_id);
            }
        }

        debug!(instructor_id, "deleted instructor and cascaded");
        self.redraw();
    }

    // ---- drag-drop ----

    /// Decides what dropping `instructor_id` onto `target` should do.
    ///
    /// `source` is the slot the drag started from, or `None` for a
    /// sidebar drag. Returns `None` for an unknown instructor. A sidebar
    /// drop onto an occupied slot is never a silent overwrite: it yields
    /// [`DropPlan::ChoiceRequired`] and the caller resolves the choice
    /// with [`Self::assign`] or [`Self::add_assistant`].
    pub fn plan_drop(
        state: &AppState,
        source: Option<(NaiveDate, Group)>,
        target: (NaiveDate, Group),
        instructor_id: &str,
    ) -> Option<DropPlan> {
        state.instructor(instructor_id)?;

        let incumbent = state
            .slot_at(target.0, target.1)
            .and_then(|s| s.instructor_id.clone());
        let same_slot = source == Some(target);

        if let Some(incumbent) = incumbent {
            if incumbent != instructor_id && !same_slot {
                return Some(match source {
                    Some(_) => DropPlan::Swap,
                    None => DropPlan::ChoiceRequired { incumbent },
                });
            }
        }

        Some(match source {
            Some(_) => DropPlan::Move,
            None => DropPlan::Assign,
        })
    }

    /// Executes a drop plan. [`DropPlan::ChoiceRequired`] is a no-op here;
    /// the caller resolves the user's choice explicitly.
    pub fn apply_drop(
        &mut self,
        plan: &DropPlan,
        source: Option<(NaiveDate, Group)>,
        target: (NaiveDate, Group),
        instructor_id: &str,
    ) {
        match plan {
            DropPlan::Assign => self.assign(target.0, target.1, Some(instructor_id)),
            DropPlan::Move => {
                if let Some(source) = source {
                    self.unassign_silent(source.0, source.1);
                }
                self.assign(target.0, target.1, Some(instructor_id));
            }
            DropPlan::Swap => {
                if let Some(source) = source {
                    self.swap(source, target);
                }
            }
            DropPlan::ChoiceRequired { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Instructor;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn state() -> AppState {
        let mut s = AppState::empty(Month::new(2025, 1));
        for (id, name) in [("i1", "Alice"), ("i2", "Bob"), ("i3", "Cara")] {
            s.add_instructor(
                Instructor::new(id, name)
                    .with_groups(Group::ALL)
                    .with_dates([date("2025-01-06"), date("2025-01-09")]),
            );
        }
        s
    }

    #[test]
    fn test_assign_preserves_assistants_and_description() {
        let mut s = state();
        let d = date("2025-01-06");
        {
            let slot = s.ensure_day(d).slot_mut(Group::Beginners);
            slot.instructor_id = Some("i1".into());
            slot.assistants.push("i3".into());
            slot.description = "Footwork".into();
        }

        Mutations::headless(&mut s).assign(d, Group::Beginners, Some("i2"));

        let slot = s.slot_at(d, Group::Beginners).unwrap();
        assert_eq!(slot.instructor_id.as_deref(), Some("i2"));
        assert_eq!(slot.assistants, vec!["i3"]);
        assert_eq!(slot.description, "Footwork");
    }

    #[test]
    fn test_assign_promotes_assistant_out_of_list() {
        let mut s = state();
        let d = date("2025-01-06");
        s.ensure_day(d).slot_mut(Group::Beginners).assistants.push("i2".into());

        Mutations::headless(&mut s).assign(d, Group::Beginners, Some("i2"));

        let slot = s.slot_at(d, Group::Beginners).unwrap();
        assert!(slot.is_main("i2"));
        assert!(slot.assistants.is_empty());
    }

    #[test]
    fn test_unassign_keeps_assistants() {
        let mut s = state();
        let d = date("2025-01-06");
        {
            let mut m = Mutations::headless(&mut s);
            m.assign(d, Group::Adults, Some("i1"));
            m.add_assistant(d, Group::Adults, "i2");
            m.assign(d, Group::Adults, None);
        }

        let slot = s.slot_at(d, Group::Adults).unwrap();
        assert_eq!(slot.instructor_id, None);
        assert_eq!(slot.assistants, vec!["i2"]);
    }

    #[test]
    fn test_add_assistant_rules() {
        let mut s = state();
        let d = date("2025-01-06");
        let mut m = Mutations::headless(&mut s);
        m.assign(d, Group::Beginners, Some("i1"));

        m.add_assistant(d, Group::Beginners, "i2");
        m.add_assistant(d, Group::Beginners, "i2"); // duplicate: no-op
        m.add_assistant(d, Group::Beginners, "i1"); // main: no-op
        m.add_assistant(d, Group::Beginners, "ghost"); // unknown: no-op

        let slot = s.slot_at(d, Group::Beginners).unwrap();
        assert_eq!(slot.assistants, vec!["i2"]);
    }

    #[test]
    fn test_remove_assistant_absent_is_noop() {
        let mut s = state();
        let d = date("2025-01-06");
        let mut m = Mutations::headless(&mut s);
        m.add_assistant(d, Group::Children, "i2");
        m.remove_assistant(d, Group::Children, "i3"); // not present
        m.remove_assistant(date("2025-01-09"), Group::Children, "i2"); // day absent

        assert_eq!(s.slot_at(d, Group::Children).unwrap().assistants, vec!["i2"]);
    }

    #[test]
    fn test_swap_trades_mains_keeps_assistants() {
        let mut s = state();
        let a = (date("2025-01-06"), Group::Beginners);
        let b = (date("2025-01-09"), Group::Children);
        {
            let mut m = Mutations::headless(&mut s);
            m.assign(a.0, a.1, Some("i1"));
            m.add_assistant(a.0, a.1, "i3");
            m.assign(b.0, b.1, Some("i2"));
        }

        let mut sink = CountingSink::default();
        Mutations::new(&mut s, &mut sink).swap(a, b);

        assert!(s.slot_at(a.0, a.1).unwrap().is_main("i2"));
        assert!(s.slot_at(b.0, b.1).unwrap().is_main("i1"));
        // A's assistants stay with A.
        assert_eq!(s.slot_at(a.0, a.1).unwrap().assistants, vec!["i3"]);
        assert!(s.slot_at(b.0, b.1).unwrap().assistants.is_empty());
        // Compound operation: exactly one redraw.
        assert_eq!(sink.redraws, 1);
    }

    #[test]
    fn test_swap_requires_both_occupied() {
        let mut s = state();
        let a = (date("2025-01-06"), Group::Beginners);
        let b = (date("2025-01-09"), Group::Children);
        Mutations::headless(&mut s).assign(a.0, a.1, Some("i1"));

        Mutations::headless(&mut s).swap(a, b);

        assert!(s.slot_at(a.0, a.1).unwrap().is_main("i1"));
        assert!(s.slot_at(b.0, b.1).is_none());
    }

    #[test]
    fn test_clear_month_scoped() {
        let mut s = state();
        let jan = date("2025-01-06");
        let feb = date("2025-02-03");
        {
            let mut m = Mutations::headless(&mut s);
            m.assign(jan, Group::Beginners, Some("i1"));
            m.assign(feb, Group::Beginners, Some("i2"));
            m.cancel_day(date("2025-01-11"));
            m.cancel_day(date("2025-02-05"));
            m.clear_month(Month::new(2025, 1));
        }

        assert!(s.day(jan).is_none());
        assert!(s.day(feb).is_some());
        assert!(!s.is_cancelled(date("2025-01-11")));
        assert!(s.is_cancelled(date("2025-02-05")));
    }

    #[test]
    fn test_cancel_and_restore_day() {
        let mut s = state();
        let d = date("2025-01-06");
        Mutations::headless(&mut s).cancel_day(d);
        assert!(s.is_cancelled(d));
        Mutations::headless(&mut s).restore_day(d);
        assert!(!s.is_cancelled(d));
    }

    #[test]
    fn test_delete_instructor_cascade_no_dangling() {
        let mut s = state();
        let d1 = date("2025-01-06");
        let d2 = date("2025-01-09");
        {
            let mut m = Mutations::headless(&mut s);
            m.assign(d1, Group::Beginners, Some("i1"));
            m.assign(d2, Group::Adults, Some("i1"));
            m.assign(d1, Group::Children, Some("i2"));
            m.add_assistant(d1, Group::Children, "i1");
            m.delete_instructor_cascade("i1");
        }

        assert!(s.instructor("i1").is_none());
        for (date, day) in &s.schedule {
            for group in Group::ALL {
                let slot = day.slot(group);
                assert!(!slot.is_main("i1"), "dangling main on {date} {group:?}");
                assert!(!slot.has_assistant("i1"), "dangling assistant on {date} {group:?}");
            }
        }
        // Non-default id: not tracked as a deleted default.
        assert!(s.deleted_default_ids.is_empty());
    }

    #[test]
    fn test_delete_default_instructor_tracked_once() {
        let mut s = AppState::new(Month::new(2025, 1));
        {
            let mut m = Mutations::headless(&mut s);
            m.delete_instructor_cascade("default-3");
            m.delete_instructor_cascade("default-3");
        }
        assert_eq!(s.deleted_default_ids, vec!["default-3"]);
        assert!(s.instructor("default-3").is_none());
    }

    #[test]
    fn test_plan_drop_sidebar_onto_occupied_requires_choice() {
        let mut s = state();
        let d = date("2025-01-06");
        Mutations::headless(&mut s).assign(d, Group::Beginners, Some("i1"));

        let plan = Mutations::plan_drop(&s, None, (d, Group::Beginners), "i2");
        assert_eq!(
            plan,
            Some(DropPlan::ChoiceRequired { incumbent: "i1".into() })
        );
    }

    #[test]
    fn test_plan_drop_calendar_onto_occupied_swaps() {
        let mut s = state();
        let d = date("2025-01-06");
        {
            let mut m = Mutations::headless(&mut s);
            m.assign(d, Group::Beginners, Some("i1"));
            m.assign(d, Group::Children, Some("i2"));
        }

        let plan = Mutations::plan_drop(&s, Some((d, Group::Beginners)), (d, Group::Children), "i1");
        assert_eq!(plan, Some(DropPlan::Swap));
    }

    #[test]
    fn test_plan_drop_empty_target() {
        let mut s = state();
        let d = date("2025-01-06");
        assert_eq!(
            Mutations::plan_drop(&s, None, (d, Group::Beginners), "i1"),
            Some(DropPlan::Assign)
        );
        Mutations::headless(&mut s).assign(d, Group::Beginners, Some("i1"));
        assert_eq!(
            Mutations::plan_drop(&s, Some((d, Group::Beginners)), (d, Group::Children), "i1"),
            Some(DropPlan::Move)
        );
        // Dropping back onto the held slot is a plain re-assign path.
        assert_eq!(
            Mutations::plan_drop(&s, Some((d, Group::Beginners)), (d, Group::Beginners), "i1"),
            Some(DropPlan::Move)
        );
        assert_eq!(Mutations::plan_drop(&s, None, (d, Group::Beginners), "ghost"), None);
    }

    #[test]
    fn test_apply_drop_move_vacates_source() {
        let mut s = state();
        let d = date("2025-01-06");
        Mutations::headless(&mut s).assign(d, Group::Beginners, Some("i1"));

        let source = Some((d, Group::Beginners));
        let target = (d, Group::Children);
        let plan = Mutations::plan_drop(&s, source, target, "i1").unwrap();
        let mut sink = CountingSink::default();
        Mutations::new(&mut s, &mut sink).apply_drop(&plan, source, target, "i1");

        assert!(s.slot_at(d, Group::Beginners).unwrap().instructor_id.is_none());
        assert!(s.slot_at(d, Group::Children).unwrap().is_main("i1"));
        assert_eq!(sink.redraws, 1);
    }
}
