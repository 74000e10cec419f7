//! Weekly timetable enumeration.
//!
//! Given a set of subjects, each offering one or more weekly time slots,
//! enumerates every distinct timetable that can be formed by choosing slots
//! per subject, discards collisions and duplicates, and hands the accepted
//! timetables to pluggable writers.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `WeekTime`, `TimeSlot`, `Subject`,
//!   `AllocationChoice`, `TimeGrid`, `Schedule`
//! - **`search`**: `AllocationEnumerator`, the two-phase `ScheduleBuilder`,
//!   the `SearchDriver` strategies and the `DedupRegistry` sink
//! - **`validation`**: Input integrity checks (duplicate names, misaligned
//!   or overlapping slots, slots outside the week)
//! - **`io`**: Subject file loader, schedule writers, output directory setup
//! - **`config`**: JSON run configuration
//! - **`generator`**: Seeded random subject sets
//!
//! # Example
//!
//! ```
//! use chrono::Weekday;
//! use u_timetable::models::{Subject, TimeSlot, WeekLayout};
//! use u_timetable::search::{DedupRegistry, SearchDriver};
//!
//! let subjects = vec![
//!     Subject::exclusive("Algebra")
//!         .with_slot(TimeSlot::on(Weekday::Mon, (8, 0), (9, 30)))
//!         .with_slot(TimeSlot::on(Weekday::Wed, (8, 0), (9, 30))),
//!     Subject::best_effort("Physics")
//!         .with_slot(TimeSlot::on(Weekday::Mon, (9, 0), (10, 0)))
//!         .with_slot(TimeSlot::on(Weekday::Tue, (9, 0), (10, 0))),
//! ];
//!
//! let driver = SearchDriver::new(&subjects, WeekLayout::default()).unwrap();
//! let mut registry = DedupRegistry::new(&subjects);
//! driver.run(&mut registry);
//!
//! assert_eq!(registry.summary().accepted, 2);
//! assert_eq!(registry.summary().incomplete, 1);
//! ```

pub mod config;
pub mod generator;
pub mod io;
pub mod models;
pub mod search;
pub mod validation;
