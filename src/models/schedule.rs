//! Schedule (build result) model.
//!
//! A schedule is one resolved grid for a particular tuple of allocation
//! choices, together with what each subject actually received and the
//! completeness classification.
//!
//! Allocation bookkeeping lives here rather than on [`Subject`], so the
//! subject list stays read-only for the whole search.

use serde::{Deserialize, Serialize};

use super::{AllocationChoice, Subject, TimeGrid};

/// Build phase that placed a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationPhase {
    /// Placed because its priority flag was set.
    Priority,
    /// Placed during best-effort completion.
    Completion,
}

/// A slot booked for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAllocation {
    /// Index into the subject's slot list.
    pub slot: usize,
    /// Phase that booked it.
    pub phase: AllocationPhase,
}

/// Slots booked for one subject, in booking order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectAllocation {
    pub slots: Vec<SlotAllocation>,
}

impl SubjectAllocation {
    /// Records a booking.
    pub fn push(&mut self, slot: usize, phase: AllocationPhase) {
        self.slots.push(SlotAllocation { slot, phase });
    }

    /// Whether the slot was booked.
    pub fn contains(&self, slot: usize) -> bool {
        self.slots.iter().any(|a| a.slot == slot)
    }

    /// Number of booked slots.
    #[inline]
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Booked slot indices in ascending order.
    pub fn slot_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.slots.iter().map(|a| a.slot).collect();
        indices.sort_unstable();
        indices
    }
}

/// One resolved weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Filled grid.
    pub grid: TimeGrid,
    /// Per-subject bookings, parallel to the subject list.
    pub allocations: Vec<SubjectAllocation>,
    /// Choice tuple this schedule was built from (the search signature).
    pub choices: Vec<AllocationChoice>,
    /// Some subject received no slot at all.
    pub failed: bool,
    /// Not failed, but some subject is not fully satisfied.
    pub incomplete: bool,
    /// 1-based acceptance number. `None` until accepted by a sink.
    pub version: Option<usize>,
}

impl Schedule {
    /// Whether every subject is fully satisfied.
    pub fn is_complete(&self) -> bool {
        !self.failed && !self.incomplete
    }

    /// Name of the subject occupying a cell.
    pub fn occupant_name<'a>(&self, cell: usize, subjects: &'a [Subject]) -> Option<&'a str> {
        self.grid
            .occupant(cell)
            .and_then(|s| subjects.get(s))
            .map(|s| s.name.as_str())
    }

    /// Subjects short of what their kind requires, including subjects that
    /// got no slot at all.
    pub fn unsatisfied<'a>(&self, subjects: &'a [Subject]) -> Vec<&'a Subject> {
        subjects
            .iter()
            .zip(&self.allocations)
            .filter(|(subject, alloc)| !subject.is_satisfied_by(alloc.count()))
            .map(|(subject, _)| subject)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TimeSlot, WeekLayout};
    use chrono::Weekday;

    #[test]
    fn test_subject_allocation() {
        let mut alloc = SubjectAllocation::default();
        alloc.push(2, AllocationPhase::Priority);
        alloc.push(0, AllocationPhase::Completion);
        assert_eq!(alloc.count(), 2);
        assert!(alloc.contains(0));
        assert!(!alloc.contains(1));
        assert_eq!(alloc.slot_indices(), vec![0, 2]);
    }

    #[test]
    fn test_occupant_name_and_unsatisfied() {
        let subjects = vec![Subject::best_effort("Physics")
            .with_slot(TimeSlot::on(Weekday::Mon, (8, 0), (9, 0)))
            .with_slot(TimeSlot::on(Weekday::Tue, (8, 0), (9, 0)))];
        let mut grid = TimeGrid::new(WeekLayout::default());
        grid.try_book(&subjects[0].slots[0], 0);

        let mut alloc = SubjectAllocation::default();
        alloc.push(0, AllocationPhase::Priority);
        let schedule = Schedule {
            grid,
            allocations: vec![alloc],
            choices: vec![AllocationChoice::from_flags(&[true, false])],
            failed: false,
            incomplete: true,
            version: None,
        };

        assert_eq!(schedule.occupant_name(0, &subjects), Some("Physics"));
        assert_eq!(schedule.occupant_name(200, &subjects), None);
        assert_eq!(schedule.unsatisfied(&subjects).len(), 1);
        assert!(!schedule.is_complete());
    }

    #[test]
    fn test_unsatisfied_includes_subjects_without_slots() {
        let subjects = vec![
            Subject::exclusive("Lab").with_slot(TimeSlot::on(Weekday::Mon, (8, 0), (9, 0))),
            Subject::exclusive("Seminar").with_slot(TimeSlot::on(Weekday::Mon, (8, 0), (9, 0))),
        ];
        let mut grid = TimeGrid::new(WeekLayout::default());
        grid.try_book(&subjects[0].slots[0], 0);

        let mut lab = SubjectAllocation::default();
        lab.push(0, AllocationPhase::Priority);
        let schedule = Schedule {
            grid,
            allocations: vec![lab, SubjectAllocation::default()],
            choices: vec![AllocationChoice::single(0, 1); 2],
            failed: true,
            incomplete: false,
            version: None,
        };

        let names: Vec<_> = schedule.unsatisfied(&subjects).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Seminar"]);
    }
}
