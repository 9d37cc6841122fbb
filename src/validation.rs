//! Assignment constraint validation.
//!
//! Produces ordered, human-readable warning lists for a proposed
//! assignment. Warnings are advisory: the caller (typically a confirm
//! dialog) decides whether to proceed. Nothing here mutates state —
//! validation is a pure function of the candidate and a schedule
//! snapshot.
//!
//! Check order is fixed and observable:
//! 1. date availability
//! 2. group capability
//! 3. same-day double-booking as main instructor (other groups, canonical order)
//! 4. same-day double-booking as assistant (other groups, canonical order)
//! 5. assistant role only: candidate already mains the target slot

use chrono::NaiveDate;

use crate::models::Group;
use crate::state::AppState;

/// The role a candidate would take in the target slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Main instructor of the slot.
    Main,
    /// Assistant on the slot.
    Assistant,
}

/// Validates assigning `instructor_id` to (`date`, `group`) as `role`.
///
/// Returns warnings in check order; empty means no issues. An unknown
/// instructor id yields no warnings (resolving it is the caller's
/// not-found concern, and not-found resolves to a no-op).
pub fn validate_assignment(
    state: &AppState,
    instructor_id: &str,
    date: NaiveDate,
    group: Group,
    role: Role,
) -> Vec<String> {
    let Some(instructor) = state.instructor(instructor_id) else {
        return Vec::new();
    };
    let mut warnings = Vec::new();

    if !instructor.available_on(date) {
        warnings.push(format!("{} is not available on this date", instructor.name));
    }

    if !instructor.teaches(group) {
        warnings.push(format!("{} cannot teach {}", instructor.name, group.label()));
    }

    let day = state.day(date);

    for other in Group::ALL.into_iter().filter(|g| *g != group) {
        if day.is_some_and(|d| d.slot(other).is_main(instructor_id)) {
            warnings.push(format!(
                "{} is already assigned to {} on this day",
                instructor.name,
                other.label()
            ));
        }
    }

    for other in Group::ALL.into_iter().filter(|g| *g != group) {
        if day.is_some_and(|d| d.slot(other).has_assistant(instructor_id)) {
            warnings.push(format!(
                "{} is already an assistant for {} on this day",
                instructor.name,
                other.label()
            ));
        }
    }

    if role == Role::Assistant && day.is_some_and(|d| d.slot(group).is_main(instructor_id)) {
        warnings.push(format!(
            "{} is already the main instructor for this slot",
            instructor.name
        ));
    }

    warnings
}

/// Validates a swap of the main instructors of two occupied slots.
///
/// The instructor moving from source to target is validated against the
/// target context first; then the displaced instructor is validated
/// against the source context (availability, capability, and same-day
/// double-booking on the source day — except against the slot they are
/// leaving, which would be a false positive). Both directions'
/// warnings are concatenated.
pub fn validate_swap(
    state: &AppState,
    source: (NaiveDate, Group),
    target: (NaiveDate, Group),
) -> Vec<String> {
    let (source_date, source_group) = source;
    let (target_date, target_group) = target;

    let moving = state
        .slot_at(source_date, source_group)
        .and_then(|s| s.instructor_id.clone());
    let displaced = state
        .slot_at(target_date, target_group)
        .and_then(|s| s.instructor_id.clone());

    let mut warnings = Vec::new();

    if let Some(id) = moving {
        warnings.extend(validate_assignment(state, &id, target_date, target_group, Role::Main));
    }

    let Some(id) = displaced else {
        return warnings;
    };
    let Some(instructor) = state.instructor(&id) else {
        return warnings;
    };

    if !instructor.available_on(source_date) {
        warnings.push(format!(
            "{} is not available on {}",
            instructor.name, source_date
        ));
    }

    if !instructor.teaches(source_group) {
        warnings.push(format!(
            "{} cannot teach {}",
            instructor.name,
            source_group.label()
        ));
    }

    for other in Group::ALL.into_iter().filter(|g| *g != source_group) {
        // The slot the displaced instructor is vacating is not a conflict.
        if target_date == source_date && target_group == other {
            continue;
        }
        if state
            .slot_at(source_date, other)
            .is_some_and(|s| s.is_main(&id))
        {
            warnings.push(format!(
                "{} is already assigned to {} on {}",
                instructor.name,
                other.label(),
                source_date
            ));
        }
    }

    warnings
}
