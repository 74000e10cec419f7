//! Schedule acceptance: deduplication, versioning and forwarding.
//!
//! # Acceptance Rule
//! A submitted schedule is accepted iff it is not failed and its grid is not
//! cell-for-cell equal to any previously accepted grid. Accepted schedules
//! get `version = 1 + previously accepted`.
//!
//! Grids are bucketed by content hash; a hash hit is confirmed with full
//! structural equality, so hash collisions never cause false duplicates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::io::ScheduleWriter;
use crate::models::{Schedule, Subject};

/// Receiver of built schedules.
pub trait ScheduleSink {
    /// Offers a schedule. Returns whether it was accepted.
    fn submit(&mut self, schedule: Schedule) -> bool;
}

/// Aggregate outcome of a search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Schedules built and submitted.
    pub visited: usize,
    /// Distinct accepted schedules.
    pub accepted: usize,
    /// Accepted schedules marked incomplete.
    pub incomplete: usize,
    /// Rejections because of an identical accepted grid.
    pub duplicates: usize,
    /// Rejections because some subject got no slot.
    pub failed: usize,
    /// Writer errors on accepted schedules.
    pub write_failures: usize,
}

impl RunSummary {
    /// One-line human summary.
    pub fn describe(&self) -> String {
        let schedules = if self.accepted == 1 { "schedule" } else { "schedules" };
        let duplicates = if self.duplicates == 1 { "duplicate" } else { "duplicates" };
        format!(
            "created {} {schedules}, of which {} incomplete (plus {} {duplicates})",
            self.accepted, self.incomplete, self.duplicates
        )
    }
}

/// The reference sink: keeps every accepted schedule and rejects duplicates.
///
/// Accepted schedules are forwarded to the registered writers in
/// registration order. Writer errors are logged and counted; they do not
/// undo the acceptance.
pub struct DedupRegistry<'a> {
    subjects: &'a [Subject],
    accepted: Vec<Schedule>,
    buckets: HashMap<u64, Vec<usize>>,
    writers: Vec<Box<dyn ScheduleWriter + 'a>>,
    summary: RunSummary,
}

impl<'a> DedupRegistry<'a> {
    /// Creates an empty registry for the given subject list.
    pub fn new(subjects: &'a [Subject]) -> Self {
        Self {
            subjects,
            accepted: Vec::new(),
            buckets: HashMap::new(),
            writers: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    /// Registers a writer for accepted schedules.
    pub fn with_writer(mut self, writer: impl ScheduleWriter + 'a) -> Self {
        self.writers.push(Box::new(writer));
        self
    }

    /// Accepted schedules in version order.
    pub fn accepted(&self) -> &[Schedule] {
        &self.accepted
    }

    /// Consumes the registry, returning accepted schedules.
    pub fn into_accepted(self) -> Vec<Schedule> {
        self.accepted
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Index into `accepted` of the schedule with an identical grid.
    fn find_duplicate(&self, hash: u64, schedule: &Schedule) -> Option<usize> {
        self.buckets.get(&hash).and_then(|bucket| {
            bucket
                .iter()
                .copied()
                .find(|&i| self.accepted[i].grid == schedule.grid)
        })
    }
}

impl ScheduleSink for DedupRegistry<'_> {
    fn submit(&mut self, mut schedule: Schedule) -> bool {
        self.summary.visited += 1;

        if schedule.failed {
            self.summary.failed += 1;
            debug!("abandoning: failed to include all subjects");
            return false;
        }

        let hash = schedule.grid.content_hash();
        if let Some(existing) = self.find_duplicate(hash, &schedule) {
            self.summary.duplicates += 1;
            debug!(duplicate_of = existing + 1, "abandoning: duplicate of existing schedule");
            return false;
        }

        let version = self.accepted.len() + 1;
        schedule.version = Some(version);
        if schedule.incomplete {
            self.summary.incomplete += 1;
            let unsatisfied: Vec<&str> = schedule
                .unsatisfied(self.subjects)
                .iter()
                .map(|s| s.name.as_str())
                .collect();
            debug!(version, ?unsatisfied, "schedule created with at least one subject incomplete");
        } else {
            debug!(version, "schedule successfully completed");
        }

        for writer in &mut self.writers {
            if let Err(e) = writer.write(&schedule, self.subjects) {
                self.summary.write_failures += 1;
                warn!(version, error = %e, "failed to write schedule");
            }
        }

        self.buckets.entry(hash).or_default().push(self.accepted.len());
        self.accepted.push(schedule);
        self.summary.accepted += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::WriteError;
    use crate::models::{AllocationChoice, TimeGrid, TimeSlot, WeekLayout};
    use chrono::Weekday;

    fn schedule_with(slot: &TimeSlot, subject: usize, failed: bool, incomplete: bool) -> Schedule {
        let mut grid = TimeGrid::new(WeekLayout::default());
        grid.try_book(slot, subject);
        Schedule {
            grid,
            allocations: Vec::new(),
            choices: vec![AllocationChoice::single(0, 1)],
            failed,
            incomplete,
            version: None,
        }
    }

    struct CountingWriter<'c> {
        versions: &'c mut Vec<usize>,
    }

    impl ScheduleWriter for CountingWriter<'_> {
        fn write(&mut self, schedule: &Schedule, _subjects: &[Subject]) -> Result<(), WriteError> {
            self.versions.push(schedule.version.unwrap_or(0));
            Ok(())
        }
    }

    struct FailingWriter;

    impl ScheduleWriter for FailingWriter {
        fn write(&mut self, _schedule: &Schedule, _subjects: &[Subject]) -> Result<(), WriteError> {
            Err(WriteError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_duplicate_rejected_either_order() {
        let mon = TimeSlot::on(Weekday::Mon, (8, 0), (9, 0));
        let tue = TimeSlot::on(Weekday::Tue, (8, 0), (9, 0));

        for first_incomplete in [false, true] {
            let mut registry = DedupRegistry::new(&[]);
            assert!(registry.submit(schedule_with(&mon, 0, false, first_incomplete)));
            assert!(!registry.submit(schedule_with(&mon, 0, false, !first_incomplete)));
            assert!(registry.submit(schedule_with(&tue, 0, false, false)));

            let summary = registry.summary();
            assert_eq!(summary.accepted, 2);
            assert_eq!(summary.duplicates, 1);
            assert_eq!(summary.visited, 3);
        }
    }

    #[test]
    fn test_failed_rejected_without_duplicate_count() {
        let mon = TimeSlot::on(Weekday::Mon, (8, 0), (9, 0));
        let mut registry = DedupRegistry::new(&[]);
        assert!(!registry.submit(schedule_with(&mon, 0, true, false)));
        assert!(registry.accepted().is_empty());

        let summary = registry.summary();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.duplicates, 0);

        // A failed submission does not block a later valid identical grid
        assert!(registry.submit(schedule_with(&mon, 0, false, false)));
    }

    #[test]
    fn test_versions_and_incomplete_count() {
        let slots = [
            TimeSlot::on(Weekday::Mon, (8, 0), (9, 0)),
            TimeSlot::on(Weekday::Tue, (8, 0), (9, 0)),
            TimeSlot::on(Weekday::Wed, (8, 0), (9, 0)),
        ];
        let mut registry = DedupRegistry::new(&[]);
        for (i, slot) in slots.iter().enumerate() {
            registry.submit(schedule_with(slot, 0, false, i == 1));
        }
        let versions: Vec<_> = registry.accepted().iter().map(|s| s.version).collect();
        assert_eq!(versions, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(registry.summary().incomplete, 1);
    }

    #[test]
    fn test_writers_receive_accepted_only() {
        let mon = TimeSlot::on(Weekday::Mon, (8, 0), (9, 0));
        let tue = TimeSlot::on(Weekday::Tue, (8, 0), (9, 0));
        let mut versions = Vec::new();
        {
            let mut registry =
                DedupRegistry::new(&[]).with_writer(CountingWriter { versions: &mut versions });
            registry.submit(schedule_with(&mon, 0, false, false));
            registry.submit(schedule_with(&mon, 0, false, false));
            registry.submit(schedule_with(&tue, 0, true, false));
            registry.submit(schedule_with(&tue, 0, false, false));
        }
        assert_eq!(versions, vec![1, 2]);
    }

    #[test]
    fn test_write_failure_counted() {
        let mon = TimeSlot::on(Weekday::Mon, (8, 0), (9, 0));
        let mut registry = DedupRegistry::new(&[]).with_writer(FailingWriter);
        assert!(registry.submit(schedule_with(&mon, 0, false, false)));
        assert_eq!(registry.summary().write_failures, 1);
        assert_eq!(registry.summary().accepted, 1);
    }

    #[test]
    fn test_describe() {
        let summary = RunSummary {
            accepted: 1,
            incomplete: 0,
            duplicates: 3,
            ..Default::default()
        };
        assert_eq!(
            summary.describe(),
            "created 1 schedule, of which 0 incomplete (plus 3 duplicates)"
        );
    }
}
