//! Output of accepted schedules.
//!
//! Every writer names its file after the schedule: `schedule<version>`,
//! with an `_INCOMPLETE_` suffix for incomplete schedules, plus a
//! writer-specific extension.
//!
//! | Writer | File | Content |
//! |--------|------|---------|
//! | [`PlainTextWriter`] | `<stem>.txt` | one line per 5-minute cell |
//! | [`CalendarTextWriter`] | `<stem>ascii.txt` | fixed-width week calendar |
//! | [`JsonWriter`] | `<stem>.json` | [`ScheduleReport`] |
//! | [`PngCalendarWriter`](super::PngCalendarWriter) | `<stem>.png` | raster week calendar |

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{
    weekday_abbrev, weekday_name, AllocationPhase, Color, Schedule, Subject, SubjectKind, WEEKDAYS,
};

/// Column width of the text calendar.
const FIELD_WIDTH: usize = 30;

/// Errors while writing a schedule.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Consumer of accepted schedules.
pub trait ScheduleWriter {
    /// Writes one accepted schedule. `subjects` is the run's subject list.
    fn write(&mut self, schedule: &Schedule, subjects: &[Subject]) -> Result<(), WriteError>;
}

/// File stem for a schedule.
pub fn file_stem(schedule: &Schedule) -> String {
    let completeness = if schedule.incomplete { "_INCOMPLETE_" } else { "" };
    format!("schedule{}{completeness}", schedule.version.unwrap_or(0))
}

/// One line per cell: `Mo 08:00 Algebra`.
pub fn render_plain(schedule: &Schedule, subjects: &[Subject]) -> String {
    let mut out = String::new();
    for (index, (time, _)) in schedule.grid.cells().enumerate() {
        let _ = write!(out, "{} {}", weekday_abbrev(time.weekday()), time.clock());
        if let Some(name) = schedule.occupant_name(index, subjects) {
            let _ = write!(out, " {name}");
        }
        out.push('\n');
    }
    out
}

/// Fixed-width week calendar: a time column followed by one centred column
/// per day, one row per cell.
pub fn render_calendar(schedule: &Schedule, subjects: &[Subject]) -> String {
    let layout = schedule.grid.layout();
    let days = layout.days as usize;
    let per_day = layout.cells_per_day();

    let mut out = " ".repeat(6);
    for day in WEEKDAYS.iter().take(days) {
        let _ = write!(out, "{:^width$}", weekday_name(*day), width = FIELD_WIDTH);
    }
    out.push('\n');

    for row in 0..per_day {
        let _ = write!(out, "{:6}", layout.cell_time(row).clock());
        for day in 0..days {
            let name = schedule
                .occupant_name(day * per_day + row, subjects)
                .unwrap_or("");
            let _ = write!(out, "{:^width$}", name, width = FIELD_WIDTH);
        }
        out.push('\n');
    }
    out
}

/// A booked slot in a [`ScheduleReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedSlot {
    pub weekday: String,
    pub start: String,
    pub end: String,
    pub location: Option<String>,
    pub phase: AllocationPhase,
}

/// Per-subject part of a [`ScheduleReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectReport {
    pub name: String,
    pub kind: SubjectKind,
    pub color: Color,
    pub satisfied: bool,
    pub slots: Vec<BookedSlot>,
}

/// Serializable summary of an accepted schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub version: Option<usize>,
    pub incomplete: bool,
    pub subjects: Vec<SubjectReport>,
}

impl ScheduleReport {
    /// Builds the report; slots are listed in definition order.
    pub fn new(schedule: &Schedule, subjects: &[Subject]) -> Self {
        let subjects = subjects
            .iter()
            .zip(&schedule.allocations)
            .map(|(subject, alloc)| {
                let mut booked = alloc.slots.clone();
                booked.sort_by_key(|a| a.slot);
                let slots = booked
                    .iter()
                    .filter_map(|a| subject.slots.get(a.slot).map(|slot| (slot, a.phase)))
                    .map(|(slot, phase)| BookedSlot {
                        weekday: weekday_name(slot.start.weekday()).to_string(),
                        start: slot.start.clock(),
                        end: slot.end.clock(),
                        location: slot.location.clone(),
                        phase,
                    })
                    .collect();
                SubjectReport {
                    name: subject.name.clone(),
                    kind: subject.kind,
                    color: subject.color.clone(),
                    satisfied: subject.is_satisfied_by(alloc.count()),
                    slots,
                }
            })
            .collect();
        Self {
            version: schedule.version,
            incomplete: schedule.incomplete,
            subjects,
        }
    }
}

fn save(path: &Path, contents: &str) -> Result<(), WriteError> {
    info!(path = %path.display(), "saving schedule");
    fs::write(path, contents)?;
    Ok(())
}

/// Writes [`render_plain`] output to `<stem>.txt`.
#[derive(Debug, Clone)]
pub struct PlainTextWriter {
    dir: PathBuf,
}

impl PlainTextWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ScheduleWriter for PlainTextWriter {
    fn write(&mut self, schedule: &Schedule, subjects: &[Subject]) -> Result<(), WriteError> {
        let path = self.dir.join(format!("{}.txt", file_stem(schedule)));
        save(&path, &render_plain(schedule, subjects))
    }
}

/// Writes [`render_calendar`] output to `<stem>ascii.txt`.
#[derive(Debug, Clone)]
pub struct CalendarTextWriter {
    dir: PathBuf,
}

impl CalendarTextWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ScheduleWriter for CalendarTextWriter {
    fn write(&mut self, schedule: &Schedule, subjects: &[Subject]) -> Result<(), WriteError> {
        let path = self.dir.join(format!("{}ascii.txt", file_stem(schedule)));
        save(&path, &render_calendar(schedule, subjects))
    }
}

/// Writes a pretty-printed [`ScheduleReport`] to `<stem>.json`.
#[derive(Debug, Clone)]
pub struct JsonWriter {
    dir: PathBuf,
}

impl JsonWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ScheduleWriter for JsonWriter {
    fn write(&mut self, schedule: &Schedule, subjects: &[Subject]) -> Result<(), WriteError> {
        let path = self.dir.join(format!("{}.json", file_stem(schedule)));
        let json = serde_json::to_string_pretty(&ScheduleReport::new(schedule, subjects))?;
        save(&path, &json)
    }
}
