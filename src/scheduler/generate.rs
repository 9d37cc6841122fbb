//! Two-pass auto-generation.
//!
//! # Algorithm
//!
//! 1. Rebuild the target month's assignment layer: every day gets fresh
//!    slots (descriptions preserved, assistants and merges reset).
//! 2. Enumerate the slot universe: (date, group) for every configured,
//!    non-cancelled class date.
//! 3. Pass 1, scarcity-first: instructors ranked ascending by how many
//!    universe slots they are eligible for; each unplaced instructor
//!    claims one open eligible slot, chosen uniformly at random.
//!    Instructors with the narrowest availability are the hardest to
//!    place later, so they are serviced while the most options remain.
//! 4. Pass 2, fair fill: per day (date order), groups visited in random
//!    order; each open slot goes to the candidate with the fewest
//!    assignments in that group this run, then the fewest total.
//! 5. No backtracking: a slot with no candidates stays unfilled.
//!
//! Randomness is injected (`&mut impl Rng`), so re-running on identical
//! input may produce a different valid assignment; only the constraints
//! are guaranteed. Tests seed a `SmallRng` for reproducibility.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rand::prelude::IndexedRandom;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::models::{DaySchedule, Group, Instructor, Month};
use crate::state::AppState;

/// Per-instructor assignment counters for one generation run.
#[derive(Debug, Default, Clone)]
struct Tally {
    beginners: usize,
    children: usize,
    adults: usize,
    total: usize,
}

impl Tally {
    fn group(&self, group: Group) -> usize {
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

/// Result summary of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// Slots that received a main instructor.
    pub filled: usize,
    /// Universe slots left without a candidate.
    pub unfilled: usize,
}

/// The auto-generation engine.
///
/// Assigns main instructors only; assistants and merges on class days are
/// reset as part of the month rebuild, and descriptions survive.
#[derive(Debug, Clone, Default)]
pub struct AutoScheduler;

impl AutoScheduler {
    /// Creates the engine.
    pub fn new() -> Self {
        Self
    }

    /// Generates assignments for `month`, mutating `state` in place.
    pub fn generate<R: Rng>(
        &self,
        state: &mut AppState,
        month: Month,
        rng: &mut R,
    ) -> GenerationOutcome {
        // Rebuild the whole month's assignment layer from scratch,
        // keeping only the free-text descriptions. Cancelled days are
        // rebuilt too, which leaves them without assignments.
        for date in month.dates() {
            let mut fresh = DaySchedule::default();
            if let Some(existing) = state.schedule.get(&date) {
                for group in Group::ALL {
                    fresh.slot_mut(group).description =
                        existing.slot(group).description.clone();
                }
            }
            state.schedule.insert(date, fresh);
        }

        let class_dates = state.class_dates_in(month);
        let universe: Vec<(NaiveDate, Group)> = class_dates
            .iter()
            .flat_map(|d| Group::ALL.map(|g| (*d, g)))
            .collect();

        let roster = state.instructors.clone();
        let mut tally: HashMap<String, Tally> = roster
            .iter()
            .map(|i| (i.id.clone(), Tally::default()))
            .collect();
        let mut claimed: HashSet<(NaiveDate, Group)> = HashSet::new();
        let mut used_per_day: HashMap<NaiveDate, HashSet<String>> = HashMap::new();

        self.scarcity_pass(
            state,
            &roster,
            &universe,
            &mut tally,
            &mut claimed,
            &mut used_per_day,
            rng,
        );
        self.fill_pass(
            state,
            &roster,
            &class_dates,
            &mut tally,
            &mut claimed,
            &mut used_per_day,
            rng,
        );

        let outcome = GenerationOutcome {
            filled: claimed.len(),
            unfilled: universe.len() - claimed.len(),
        };
        debug!(
            filled = outcome.filled,
            unfilled = outcome.unfilled,
            "generated schedule"
        );
        outcome
    }

    /// Pass 1: every placeable instructor gets one slot before general
    /// fill begins. Ranked by static eligibility count (ascending), ties
    /// broken by id so the ranking is roster-order independent.
    #[allow(clippy::too_many_arguments)]
    fn scarcity_pass<R: Rng>(
        &self,
        state: &mut AppState,
        roster: &[Instructor],
        universe: &[(NaiveDate, Group)],
        tally: &mut HashMap<String, Tally>,
        claimed: &mut HashSet<(NaiveDate, Group)>,
        used_per_day: &mut HashMap<NaiveDate, HashSet<String>>,
        rng: &mut R,
    ) {
        let eligible_count = |i: &Instructor| {
            universe
                .iter()
                .filter(|(d, g)| i.teaches(*g) && i.available_on(*d))
                .count()
        };

        let mut ranked: Vec<(usize, &Instructor)> =
            roster.iter().map(|i| (eligible_count(i), i)).collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));

        for (_, instructor) in ranked {
            if tally.get(&instructor.id).is_some_and(|t| t.total > 0) {
                continue;
            }

            let open: Vec<(NaiveDate, Group)> = universe
                .iter()
                .copied()
                .filter(|(d, g)| {
                    instructor.teaches(*g)
                        && instructor.available_on(*d)
                        && !claimed.contains(&(*d, *g))
                        && !used_per_day
                            .get(d)
                            .is_some_and(|used| used.contains(&instructor.id))
                })
                .collect();

            // No eligible slot at all: skipped, never forced.
            if let Some(&(date, group)) = open.choose(rng) {
                state.ensure_day(date).slot_mut(group).instructor_id =
                    Some(instructor.id.clone());
                claimed.insert((date, group));
                used_per_day.entry(date).or_default().insert(instructor.id.clone());
                if let Some(t) = tally.get_mut(&instructor.id) {
                    t.bump(group);
                }
            }
        }
    }

    /// Pass 2: remaining slots, day by day, groups in random order so no
    /// group systematically drains the candidate pool first. Candidates
    /// ranked by this-group count, then total count; the stable sort
    /// leaves roster order as the final tie-break.
    #[allow(clippy::too_many_arguments)]
    fn fill_pass<R: Rng>(
        &self,
        state: &mut AppState,
        roster: &[Instructor],
        class_dates: &[NaiveDate],
        tally: &mut HashMap<String, Tally>,
        claimed: &mut HashSet<(NaiveDate, Group)>,
        used_per_day: &mut HashMap<NaiveDate, HashSet<String>>,
        rng: &mut R,
    ) {
        for &date in class_dates {
            let mut groups = Group::ALL;
            groups.shuffle(rng);

            for group in groups {
                if claimed.contains(&(date, group)) {
                    continue;
                }

                let mut candidates: Vec<&Instructor> = roster
                    .iter()
                    .filter(|i| {
                        i.teaches(group)
                            && i.available_on(date)
                            && !used_per_day
                                .get(&date)
                                .is_some_and(|used| used.contains(&i.id))
                    })
                    .collect();
                if candidates.is_empty() {
                    continue;
                }

                candidates.sort_by_key(|i| {
                    let t = tally.get(&i.id).cloned().unwrap_or_default();
                    (t.group(group), t.total)
                });

                let selected = candidates[0];
                state.ensure_day(date).slot_mut(group).instructor_id =
                    Some(selected.id.clone());
                claimed.insert((date, group));
                used_per_day.entry(date).or_default().insert(selected.id.clone());
                if let Some(t) = tally.get_mut(&selected.id) {
                    t.bump(group);
                }
            }
        }
    }
}
