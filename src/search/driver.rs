//! Exhaustive search over the cartesian product of allocation choices.
//!
//! # Strategies
//!
//! - [`SearchStrategy::Odometer`]: a mixed-radix counter over the
//!   enumerator indices. The first subject is the most significant digit,
//!   so combinations come out in nested-loop order. No memo, no recursion.
//! - [`SearchStrategy::Walk`]: a depth-first walk that changes one subject's
//!   choice per step and remembers every visited signature. Each step is
//!   followed by one step back, even when the step forward was blocked at
//!   the last choice, which reproduces the reference discovery order.
//!   Frames live on a heap-allocated stack.
//!
//! The odometer builds exactly `∏ choices` schedules. The walk never builds
//! a signature twice and covers the full product for the usual shapes, but
//! the blocked-step retreat can leave a few combinations unreached when
//! three or more subjects have several choices each (55 of 60 for 5×4×3).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AllocationEnumerator, ScheduleBuilder, ScheduleSink};
use crate::models::{AllocationChoice, Subject, TimeGrid, WeekLayout};
use crate::validation::{validate_subjects, ValidationError};

/// Order in which the product space is explored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Mixed-radix counter, nested-loop order.
    #[default]
    Odometer,
    /// One-axis-at-a-time walk with a visited-signature memo.
    Walk,
}

impl SearchStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            SearchStrategy::Odometer => "odometer",
            SearchStrategy::Walk => "walk",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "odometer" => Ok(SearchStrategy::Odometer),
            "walk" | "memo_walk" => Ok(SearchStrategy::Walk),
            other => Err(format!("unknown search strategy: {other}")),
        }
    }
}

/// Counters for one search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Schedules built (distinct signatures).
    pub visited: usize,
    /// Schedules the sink accepted.
    pub accepted: usize,
    /// Peak walk stack depth (0 for the odometer).
    pub peak_frames: usize,
    /// The accepted-schedule limit ended the search early.
    pub stopped_early: bool,
}

#[derive(Debug, Default)]
struct WalkFrame {
    /// Next subject whose choice is stepped from this node.
    next_axis: usize,
    /// Subject stepped for the child currently being explored; retreated
    /// once the child is done.
    stepped: Option<usize>,
}

/// Runs a full search over validated subjects.
///
/// # Example
///
/// ```
/// use chrono::Weekday;
/// use u_timetable::models::{Subject, TimeSlot, WeekLayout};
/// use u_timetable::search::{DedupRegistry, SearchDriver};
///
/// let subjects = vec![
///     Subject::exclusive("A")
///         .with_slot(TimeSlot::on(Weekday::Mon, (8, 0), (9, 30)))
///         .with_slot(TimeSlot::on(Weekday::Tue, (10, 0), (11, 30))),
///     Subject::best_effort("B")
///         .with_slot(TimeSlot::on(Weekday::Mon, (8, 0), (9, 0)))
///         .with_slot(TimeSlot::on(Weekday::Wed, (9, 0), (10, 0))),
/// ];
/// let driver = SearchDriver::new(&subjects, WeekLayout::default()).unwrap();
/// let mut registry = DedupRegistry::new(&subjects);
/// let stats = driver.run(&mut registry);
///
/// assert_eq!(stats.visited, 2 * 3);
/// assert_eq!(registry.summary().accepted, 2);
/// assert_eq!(registry.summary().incomplete, 1);
/// ```
#[derive(Debug, Clone)]
pub struct SearchDriver<'a> {
    subjects: &'a [Subject],
    blank: TimeGrid,
    strategy: SearchStrategy,
    limit: Option<usize>,
}

impl<'a> SearchDriver<'a> {
    /// Creates a driver after validating the subjects against the layout.
    pub fn new(subjects: &'a [Subject], layout: WeekLayout) -> Result<Self, Vec<ValidationError>> {
        validate_subjects(subjects, &layout)?;
        Ok(Self {
            subjects,
            blank: TimeGrid::new(layout),
            strategy: SearchStrategy::default(),
            limit: None,
        })
    }

    /// Sets the exploration strategy.
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Stops once the sink has accepted `limit` schedules.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Size of the product space, or `None` on overflow.
    pub fn combination_count(&self) -> Option<usize> {
        self.subjects.iter().try_fold(1usize, |acc, s| {
            acc.checked_mul(AllocationEnumerator::for_subject(s).len())
        })
    }

    /// Explores every combination, submitting each build to `sink`.
    pub fn run<S: ScheduleSink + ?Sized>(&self, sink: &mut S) -> SearchStats {
        info!(
            subjects = self.subjects.len(),
            combinations = ?self.combination_count(),
            strategy = %self.strategy,
            "starting search"
        );
        let stats = match self.strategy {
            SearchStrategy::Odometer => self.run_odometer(sink),
            SearchStrategy::Walk => self.run_walk(sink),
        };
        info!(
            visited = stats.visited,
            accepted = stats.accepted,
            stopped_early = stats.stopped_early,
            "search finished"
        );
        stats
    }

    fn enumerators(&self) -> Vec<AllocationEnumerator> {
        self.subjects
            .iter()
            .map(AllocationEnumerator::for_subject)
            .collect()
    }

    fn limit_reached(&self, stats: &SearchStats) -> bool {
        self.limit.is_some_and(|limit| stats.accepted >= limit)
    }

    fn run_odometer<S: ScheduleSink + ?Sized>(&self, sink: &mut S) -> SearchStats {
        let builder = ScheduleBuilder::new(self.subjects, &self.blank);
        let mut digits = self.enumerators();
        let mut stats = SearchStats::default();

        'search: loop {
            if self.limit_reached(&stats) {
                stats.stopped_early = true;
                break;
            }
            let choices: Vec<AllocationChoice> = digits.iter().map(|d| d.current()).collect();
            stats.visited += 1;
            if sink.submit(builder.build(&choices)) {
                stats.accepted += 1;
            }

            // Carry from the least significant digit
            let mut axis = digits.len();
            loop {
                if axis == 0 {
                    break 'search;
                }
                axis -= 1;
                if digits[axis].advance() {
                    break;
                }
                digits[axis].reset();
            }
        }
        stats
    }

    fn run_walk<S: ScheduleSink + ?Sized>(&self, sink: &mut S) -> SearchStats {
        let builder = ScheduleBuilder::new(self.subjects, &self.blank);
        let mut axes = self.enumerators();
        let mut seen = HashSet::new();
        let mut stats = SearchStats::default();
        let mut stack: Vec<WalkFrame> = Vec::new();

        if self.limit_reached(&stats) {
            stats.stopped_early = true;
            return stats;
        }
        if Self::visit(&mut axes, &mut seen, &builder, sink, &mut stats) {
            stack.push(WalkFrame::default());
            stats.peak_frames = 1;
        }

        while let Some(top) = stack.len().checked_sub(1) {
            if self.limit_reached(&stats) {
                stats.stopped_early = true;
                break;
            }

            let frame = &mut stack[top];
            if let Some(axis) = frame.stepped.take() {
                axes[axis].retreat();
            }
            if frame.next_axis == axes.len() {
                stack.pop();
                continue;
            }
            let axis = frame.next_axis;
            frame.next_axis += 1;
            // A blocked step still retreats afterwards
            axes[axis].advance();
            frame.stepped = Some(axis);

            if Self::visit(&mut axes, &mut seen, &builder, sink, &mut stats) {
                stack.push(WalkFrame::default());
                stats.peak_frames = stats.peak_frames.max(stack.len());
            }
        }
        stats
    }

    /// Enters a walk node. Returns whether the node is new and should be
    /// expanded.
    fn visit<S: ScheduleSink + ?Sized>(
        axes: &mut [AllocationEnumerator],
        seen: &mut HashSet<Vec<AllocationChoice>>,
        builder: &ScheduleBuilder<'_>,
        sink: &mut S,
        stats: &mut SearchStats,
    ) -> bool {
        // The step into this node hit the end of an axis
        if axes.iter_mut().any(|a| a.take_end_signal()) {
            return false;
        }

        let signature: Vec<AllocationChoice> = axes.iter().map(|a| a.current()).collect();
        if seen.contains(&signature) {
            return false;
        }

        stats.visited += 1;
        if sink.submit(builder.build(&signature)) {
            stats.accepted += 1;
        }
        seen.insert(signature);
        true
    }
}
