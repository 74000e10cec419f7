//! Two-phase greedy schedule construction.
//!
//! # Algorithm
//!
//! 1. Start from a copy of the blank grid.
//! 2. **Priority phase**: for each subject in list order, for each slot in
//!    definition order whose flag is set, book it if all its cells are free;
//!    otherwise skip it.
//! 3. **Completion phase**: for each AllBestEffort subject, for each slot in
//!    definition order (flagged or not), book it if not yet booked and still
//!    free. ExclusiveOne subjects are final after the priority phase.
//! 4. Classify: `failed` if some subject got nothing; `incomplete` if not
//!    failed and some subject is not fully satisfied.
//!
//! Splitting the phases lets an ExclusiveOne choice take precedence over
//! any AllBestEffort subject competing for the same cells, while
//! AllBestEffort subjects still pick up every slot left free.
//!
//! # Complexity
//! O(s · c) per build where s = total slots, c = cells per slot.

use crate::models::{
    AllocationChoice, AllocationPhase, Schedule, Subject, SubjectAllocation, SubjectKind,
    TimeGrid,
};

/// Builds schedules for a fixed subject list and blank grid.
///
/// Building is a pure function of the choice tuple; the subject list is
/// never mutated.
///
/// # Example
///
/// ```
/// use chrono::Weekday;
/// use u_timetable::models::{AllocationChoice, Subject, TimeGrid, TimeSlot, WeekLayout};
/// use u_timetable::search::ScheduleBuilder;
///
/// let subjects = vec![
///     Subject::exclusive("Algebra")
///         .with_slot(TimeSlot::on(Weekday::Mon, (8, 0), (9, 30)))
///         .with_slot(TimeSlot::on(Weekday::Tue, (10, 0), (11, 30))),
/// ];
/// let blank = TimeGrid::new(WeekLayout::default());
/// let builder = ScheduleBuilder::new(&subjects, &blank);
///
/// let schedule = builder.build(&[AllocationChoice::single(1, 2)]);
/// assert!(schedule.is_complete());
/// assert_eq!(schedule.allocations[0].slot_indices(), vec![1]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScheduleBuilder<'a> {
    subjects: &'a [Subject],
    blank: &'a TimeGrid,
}

impl<'a> ScheduleBuilder<'a> {
    /// Creates a builder.
    pub fn new(subjects: &'a [Subject], blank: &'a TimeGrid) -> Self {
        Self { subjects, blank }
    }

    /// Builds and classifies the schedule for one choice per subject.
    ///
    /// `choices` is parallel to the subject list. A missing choice counts as
    /// no slot flagged.
    pub fn build(&self, choices: &[AllocationChoice]) -> Schedule {
        let mut grid = self.blank.clone();
        let mut allocations = vec![SubjectAllocation::default(); self.subjects.len()];

        // Priority phase
        for (idx, subject) in self.subjects.iter().enumerate() {
            let Some(choice) = choices.get(idx) else {
                continue;
            };
            for (slot_idx, slot) in subject.slots.iter().enumerate() {
                if choice.is_set(slot_idx) && grid.try_book(slot, idx) {
                    allocations[idx].push(slot_idx, AllocationPhase::Priority);
                }
            }
        }

        // Completion phase
        for (idx, subject) in self.subjects.iter().enumerate() {
            if subject.kind != SubjectKind::AllBestEffort {
                continue;
            }
            for (slot_idx, slot) in subject.slots.iter().enumerate() {
                if !allocations[idx].contains(slot_idx) && grid.try_book(slot, idx) {
                    allocations[idx].push(slot_idx, AllocationPhase::Completion);
                }
            }
        }

        let failed = allocations.iter().any(|a| a.count() == 0);
        let incomplete = !failed
            && self
                .subjects
                .iter()
                .zip(&allocations)
                .any(|(subject, alloc)| !subject.is_satisfied_by(alloc.count()));

        Schedule {
            grid,
            allocations,
            choices: choices.to_vec(),
            failed,
            incomplete,
            version: None,
        }
    }
}
