//! Exhaustive schedule search.
//!
//! Enumerates every combination of per-subject allocation choices, builds
//! each into a schedule and hands it to a sink that keeps the distinct,
//! non-failed ones.
//!
//! # Pipeline
//!
//! ```text
//! AllocationEnumerator ×N ──▶ SearchDriver ──▶ ScheduleBuilder ──▶ ScheduleSink
//!     (choices per subject)    (product walk)    (two-phase fill)     (dedup, version)
//! ```
//!
//! # Determinism
//! For a given subject order and strategy, the sequence of built schedules,
//! and therefore version numbering, is fixed. The search is single-threaded.

mod allocation;
mod builder;
mod driver;
mod sink;

pub use allocation::{AllocationEnumerator, MAX_BEST_EFFORT_SLOTS};
pub use builder::ScheduleBuilder;
pub use driver::{SearchDriver, SearchStats, SearchStrategy};
pub use sink::{DedupRegistry, RunSummary, ScheduleSink};
