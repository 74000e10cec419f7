//! File-system collaborators of the search: subject definitions in,
//! rendered schedules out.

mod glyphs;
mod loader;
mod output;
mod png;
mod writer;

pub use loader::{
    format_subject, load_subject_file, load_subjects, parse_subject, parse_weekday, LoadError,
};
pub use output::prepare_output_dir;
pub use png::{render_png, text_color, PngCalendarWriter, DEFAULT_RESOLUTION, MIN_RESOLUTION};
pub use writer::{
    file_stem, render_calendar, render_plain, BookedSlot, CalendarTextWriter, JsonWriter,
    PlainTextWriter, ScheduleReport, ScheduleWriter, SubjectReport, WriteError,
};
