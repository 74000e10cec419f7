//! Timetabling domain models.
//!
//! Provides the data types shared by the search, the loader and the writers.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | Clubs & Training | Shift Work |
//! |-------------|------------|------------------|------------|
//! | Subject | Course | Activity | Duty |
//! | TimeSlot | Lecture / Tutorial Slot | Session | Shift |
//! | TimeGrid | Weekly Timetable | Weekly Plan | Roster Week |
//! | Schedule | Student Timetable | Member Plan | Personal Roster |

mod choice;
mod grid;
mod palette;
mod schedule;
mod subject;
mod time;

pub use choice::{AllocationChoice, MAX_CHOICE_SLOTS};
pub use grid::{TimeGrid, WeekLayout};
pub use schedule::{AllocationPhase, Schedule, SlotAllocation, SubjectAllocation};
pub use subject::{Color, Subject, SubjectKind};
pub use time::{
    weekday_abbrev, weekday_name, TimeSlot, WeekTime, CELL_MINUTES, MINUTES_PER_DAY, WEEKDAYS,
};
