//! The weekly cell grid used for conflict detection.
//!
//! A [`WeekLayout`] fixes which part of the week is schedulable: the first
//! `days` days starting Monday, between `start_hour` and `end_hour`. A
//! [`TimeGrid`] maps every [`CELL_MINUTES`]-minute cell of that range to at
//! most one subject.
//!
//! Cells hold subject indices into the fixed subject list of a run. Names are
//! unique, so index equality is name equality.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::time::{TimeSlot, WeekTime, CELL_MINUTES, MINUTES_PER_DAY};

/// Schedulable part of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekLayout {
    /// Number of days, starting Monday (1..=7).
    pub days: u32,
    /// First schedulable hour (inclusive).
    pub start_hour: u32,
    /// Last schedulable hour (exclusive).
    pub end_hour: u32,
}

impl Default for WeekLayout {
    fn default() -> Self {
        Self {
            days: 5,
            start_hour: 8,
            end_hour: 19,
        }
    }
}

impl WeekLayout {
    /// Creates a layout.
    pub fn new(days: u32, start_hour: u32, end_hour: u32) -> Self {
        Self {
            days,
            start_hour,
            end_hour,
        }
    }

    /// Cells per day.
    #[inline]
    pub fn cells_per_day(&self) -> usize {
        (self.end_hour.saturating_sub(self.start_hour) * 60 / CELL_MINUTES) as usize
    }

    /// Total cell count.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.days as usize * self.cells_per_day()
    }

    /// Cell holding the given instant, if inside the layout and aligned.
    pub fn cell_index(&self, t: WeekTime) -> Option<usize> {
        if !t.is_aligned() || t.day_index() >= self.days {
            return None;
        }
        let minute = t.minute_of_day();
        let first = self.start_hour * 60;
        if minute < first || minute >= self.end_hour * 60 {
            return None;
        }
        let within_day = ((minute - first) / CELL_MINUTES) as usize;
        Some(t.day_index() as usize * self.cells_per_day() + within_day)
    }

    /// Start instant of a cell.
    pub fn cell_time(&self, index: usize) -> WeekTime {
        let per_day = self.cells_per_day().max(1);
        let day = (index / per_day) as u32;
        let within_day = (index % per_day) as u32;
        WeekTime::from_minutes(
            day * MINUTES_PER_DAY + self.start_hour * 60 + within_day * CELL_MINUTES,
        )
    }

    /// Cells covered by a slot, or `None` if any part of it lies outside
    /// the layout (or the slot is empty, misaligned, or spans days).
    pub fn cell_range(&self, slot: &TimeSlot) -> Option<Range<usize>> {
        if !slot.is_aligned() || !slot.is_single_day() {
            return None;
        }
        let first = self.cell_index(slot.start)?;
        let last = self.cell_index(WeekTime::from_minutes(slot.end.minutes() - CELL_MINUTES))?;
        Some(first..last + 1)
    }

    /// Whether the slot fits entirely inside the layout.
    pub fn contains_slot(&self, slot: &TimeSlot) -> bool {
        self.cell_range(slot).is_some()
    }
}

/// Cell-level occupancy of the schedulable week.
///
/// Two grids are structurally equal iff every cell holds the same subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeGrid {
    layout: WeekLayout,
    cells: Vec<Option<usize>>,
}

impl TimeGrid {
    /// Creates an empty grid.
    pub fn new(layout: WeekLayout) -> Self {
        Self {
            layout,
            cells: vec![None; layout.cell_count()],
        }
    }

    pub fn layout(&self) -> &WeekLayout {
        &self.layout
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Subject occupying a cell.
    #[inline]
    pub fn occupant(&self, index: usize) -> Option<usize> {
        self.cells.get(index).copied().flatten()
    }

    /// Subject occupying the cell at an instant.
    pub fn occupant_at(&self, t: WeekTime) -> Option<usize> {
        self.layout.cell_index(t).and_then(|i| self.occupant(i))
    }

    /// Whether every cell in the range is empty.
    pub fn is_free(&self, range: Range<usize>) -> bool {
        self.cells
            .get(range)
            .is_some_and(|cells| cells.iter().all(Option::is_none))
    }

    /// Writes `subject` into every cell of the range.
    pub fn fill(&mut self, range: Range<usize>, subject: usize) {
        for cell in &mut self.cells[range] {
            *cell = Some(subject);
        }
    }

    /// Whether a slot lies inside the grid and all its cells are empty.
    pub fn is_slot_free(&self, slot: &TimeSlot) -> bool {
        self.layout
            .cell_range(slot)
            .is_some_and(|range| self.is_free(range))
    }

    /// Books a slot for `subject` if it is free. Returns whether it was booked.
    pub fn try_book(&mut self, slot: &TimeSlot, subject: usize) -> bool {
        match self.layout.cell_range(slot) {
            Some(range) if self.is_free(range.clone()) => {
                self.fill(range, subject);
                true
            }
            _ => false,
        }
    }

    /// Iterates `(cell start, occupant)` in day-major order.
    pub fn cells(&self) -> impl Iterator<Item = (WeekTime, Option<usize>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (self.layout.cell_time(i), *c))
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Hash of the cell contents, used to bucket dedup candidates.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
