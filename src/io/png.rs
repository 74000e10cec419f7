//! Raster week calendar.
//!
//! Days run left to right after a time column, the schedulable hours top
//! to bottom under a header row. Each booked slot is a filled rectangle in
//! its subject's color, labelled with the subject name, the slot's time
//! and its location.

use std::path::PathBuf;

use image::{Rgb, RgbImage};
use tracing::info;

use super::glyphs::{self, GLYPH_HEIGHT};
use super::writer::{file_stem, ScheduleWriter, WriteError};
use crate::models::{
    weekday_name, Schedule, Subject, TimeSlot, WeekLayout, CELL_MINUTES, WEEKDAYS,
};

/// Image size used when none is configured.
pub const DEFAULT_RESOLUTION: (u32, u32) = (1200, 740);
/// Smallest image size the layout still fits into.
pub const MIN_RESOLUTION: (u32, u32) = (320, 200);

const FIRST_COLUMN: f64 = 0.0583;
const TOP_ROW: f64 = 0.0297;
/// Horizontal rules every 15 minutes.
const ROWS_PER_RULE: usize = 3;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const RULE: Rgb<u8> = Rgb([0xcc, 0xcc, 0xcc]);
const LABEL: Rgb<u8> = Rgb([0, 0, 0]);
const FALLBACK: [u8; 3] = [127, 127, 127];

/// Text color that stays readable on `background`: white on dark fills,
/// black on light ones.
pub fn text_color(background: [u8; 3]) -> Rgb<u8> {
    let [r, g, b] = background.map(f64::from);
    let luminance = (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt() / 255.0;
    if luminance < 0.75 {
        Rgb([255, 255, 255])
    } else {
        Rgb([0, 0, 0])
    }
}

/// Half-open pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Rect {
    fn contains(&self, x: u32, y: u32) -> bool {
        (self.x0..self.x1).contains(&x) && (self.y0..self.y1).contains(&y)
    }

    fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }
}

/// `parts + 1` evenly spaced points from `from` to `to`.
fn linspace(from: u32, to: u32, parts: usize) -> Vec<u32> {
    let span = u64::from(to.saturating_sub(from));
    let parts = parts.max(1) as u64;
    (0..=parts)
        .map(|i| from + (span * i / parts) as u32)
        .collect()
}

/// Column and row boundaries of the calendar.
#[derive(Debug, Clone)]
struct Geometry {
    /// Left edge of each day, plus the right image edge.
    xs: Vec<u32>,
    /// Top edge of each cell row, plus the bottom image edge.
    ys: Vec<u32>,
}

impl Geometry {
    fn new(layout: &WeekLayout, (width, height): (u32, u32)) -> Self {
        let first_column = (f64::from(width) * FIRST_COLUMN) as u32;
        let top_row = (f64::from(height) * TOP_ROW) as u32;
        Self {
            xs: linspace(first_column, width, layout.days as usize),
            ys: linspace(top_row, height, layout.cells_per_day()),
        }
    }

    /// Inset rectangle of a slot, or `None` if it lies off the layout.
    fn slot_rect(&self, layout: &WeekLayout, slot: &TimeSlot) -> Option<Rect> {
        let range = layout.cell_range(slot)?;
        let day = slot.start.day_index() as usize;
        let day_start = day * layout.cells_per_day();
        let (row0, row1) = (range.start - day_start, range.end - day_start);
        Some(Rect {
            x0: self.xs[day] + 1,
            y0: self.ys[row0] + 1,
            x1: self.xs[day + 1].saturating_sub(1),
            y1: self.ys[row1].saturating_sub(1),
        })
    }
}

fn fill_rect(image: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
    for y in rect.y0..rect.y1.min(image.height()) {
        for x in rect.x0..rect.x1.min(image.width()) {
            image.put_pixel(x, y, color);
        }
    }
}

/// Draws `text` with its top-left corner at `(x, y)`, clipped to `clip`.
fn draw_text(
    image: &mut RgbImage,
    text: &str,
    (x, y): (u32, u32),
    scale: u32,
    color: Rgb<u8>,
    clip: Rect,
) {
    let (width, height) = image.dimensions();
    for (i, c) in text.chars().enumerate() {
        let left = x + i as u32 * glyphs::ADVANCE * scale;
        for (dx, dy) in glyphs::pixels(c, scale) {
            let (px, py) = (left + dx, y + dy);
            if px < width && py < height && clip.contains(px, py) {
                image.put_pixel(px, py, color);
            }
        }
    }
}

fn centred(from: u32, span: u32, text_width: u32) -> u32 {
    from + span.saturating_sub(text_width) / 2
}

/// Renders a schedule as an RGB image of `resolution` pixels.
pub fn render_png(schedule: &Schedule, subjects: &[Subject], resolution: (u32, u32)) -> RgbImage {
    let (width, height) = resolution;
    let layout = schedule.grid.layout();
    let geometry = Geometry::new(layout, resolution);
    let whole = Rect {
        x0: 0,
        y0: 0,
        x1: width,
        y1: height,
    };
    let mut image = RgbImage::from_pixel(width, height, BACKGROUND);

    let per_day = layout.cells_per_day();
    for row in (0..per_day).step_by(ROWS_PER_RULE) {
        let y = geometry.ys[row];
        fill_rect(&mut image, Rect { y0: y, y1: y + 1, ..whole }, RULE);
    }
    for &x in &geometry.xs[..layout.days as usize] {
        fill_rect(&mut image, Rect { x0: x, x1: x + 1, ..whole }, RULE);
    }

    let header_scale = (width / 80 / 7).max(1);
    for (day, weekday) in WEEKDAYS.iter().take(layout.days as usize).enumerate() {
        let name = weekday_name(*weekday);
        let (x0, x1) = (geometry.xs[day], geometry.xs[day + 1]);
        let x = centred(x0, x1 - x0, glyphs::text_width(name, header_scale));
        draw_text(&mut image, name, (x, 3), header_scale, LABEL, whole);
    }

    let first_column = geometry.xs[0];
    for row in (0..per_day).step_by(ROWS_PER_RULE) {
        let start = layout.cell_time(row);
        let end = start.offset(i64::from(ROWS_PER_RULE as u32 * CELL_MINUTES));
        let label = format!("{}-{}", start.clock(), end.clock());
        let (y0, y1) = (geometry.ys[row], geometry.ys[(row + ROWS_PER_RULE).min(per_day)]);
        let x = centred(0, first_column, glyphs::text_width(&label, 1));
        let y = centred(y0, y1 - y0, GLYPH_HEIGHT);
        draw_text(&mut image, &label, (x, y), 1, LABEL, whole);
    }

    let offset = (width / 400).max(1);
    for (subject, allocation) in subjects.iter().zip(&schedule.allocations) {
        let fill = subject.color.to_rgb().unwrap_or(FALLBACK);
        let ink = text_color(fill);
        for booked in &allocation.slots {
            let Some(slot) = subject.slots.get(booked.slot) else {
                continue;
            };
            let Some(rect) = geometry.slot_rect(layout, slot) else {
                continue;
            };
            fill_rect(&mut image, rect, Rgb(fill));

            let x = centred(rect.x0, rect.width(), glyphs::text_width(&subject.name, 1));
            let top = rect.y0 + offset * 2 / 3;
            draw_text(&mut image, &subject.name, (x, top), 1, ink, rect);

            // Short slots only fit the name
            if rect.height() < 2 * (GLYPH_HEIGHT + offset) {
                continue;
            }
            let bottom = rect.y1 - GLYPH_HEIGHT - offset;
            let time = format!("{} - {}", slot.start.clock(), slot.end.clock());
            draw_text(&mut image, &time, (rect.x0 + offset, bottom), 1, ink, rect);
            if let Some(location) = &slot.location {
                let x = rect
                    .x1
                    .saturating_sub(glyphs::text_width(location, 1) + offset)
                    .max(rect.x0);
                draw_text(&mut image, location, (x, bottom), 1, ink, rect);
            }
        }
    }

    image
}

/// Writes [`render_png`] output to `<stem>.png`.
#[derive(Debug, Clone)]
pub struct PngCalendarWriter {
    dir: PathBuf,
    resolution: (u32, u32),
}

impl PngCalendarWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            resolution: DEFAULT_RESOLUTION,
        }
    }

    /// Sets the image size in pixels.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = (width, height);
        self
    }
}

impl ScheduleWriter for PngCalendarWriter {
    fn write(&mut self, schedule: &Schedule, subjects: &[Subject]) -> Result<(), WriteError> {
        let path = self.dir.join(format!("{}.png", file_stem(schedule)));
        info!(path = %path.display(), "saving schedule");
        render_png(schedule, subjects, self.resolution).save(&path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocationChoice, Color, TimeGrid};
    use crate::search::ScheduleBuilder;
    use chrono::Weekday;
    use std::fs;

    fn algebra(color: Color) -> (Vec<Subject>, Schedule) {
        let subjects = vec![Subject::exclusive("Algebra")
            .with_color(color)
            .with_slot(TimeSlot::on(Weekday::Mon, (8, 0), (9, 30)).with_location("HS 1"))];
        let blank = TimeGrid::new(WeekLayout::default());
        let mut schedule =
            ScheduleBuilder::new(&subjects, &blank).build(&[AllocationChoice::single(0, 1)]);
        schedule.version = Some(1);
        (subjects, schedule)
    }

    fn slot_rect(schedule: &Schedule, subjects: &[Subject]) -> Rect {
        let layout = schedule.grid.layout();
        Geometry::new(layout, DEFAULT_RESOLUTION)
            .slot_rect(layout, &subjects[0].slots[0])
            .unwrap()
    }

    #[test]
    fn test_text_color() {
        assert_eq!(text_color([70, 130, 180]), Rgb([255, 255, 255]));
        assert_eq!(text_color([0, 0, 0]), Rgb([255, 255, 255]));
        assert_eq!(text_color([255, 255, 0]), Rgb([0, 0, 0]));
        assert_eq!(text_color([255, 255, 255]), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(69, 1200, 5), vec![69, 295, 521, 747, 973, 1200]);
        assert_eq!(linspace(0, 10, 0), vec![0, 10]);
    }

    #[test]
    fn test_slot_rect_geometry() {
        let (subjects, schedule) = algebra(Color::Named("steelblue".into()));
        let rect = slot_rect(&schedule, &subjects);
        // 8:00-9:30 is rows 0..18 of the Monday column
        let geometry = Geometry::new(schedule.grid.layout(), DEFAULT_RESOLUTION);
        assert_eq!(rect.x0, geometry.xs[0] + 1);
        assert_eq!(rect.x1, geometry.xs[1] - 1);
        assert_eq!(rect.y0, geometry.ys[0] + 1);
        assert_eq!(rect.y1, geometry.ys[18] - 1);
    }

    #[test]
    fn test_booked_slot_filled_with_subject_color() {
        let (subjects, schedule) = algebra(Color::Named("steelblue".into()));
        let rect = slot_rect(&schedule, &subjects);
        let geometry = Geometry::new(schedule.grid.layout(), DEFAULT_RESOLUTION);
        let image = render_png(&schedule, &subjects, DEFAULT_RESOLUTION);
        assert_eq!(image.dimensions(), DEFAULT_RESOLUTION);

        // Row 10 carries no rule and no label
        let y = geometry.ys[10] + 1;
        assert_eq!(*image.get_pixel(rect.x0, y), Rgb([70, 130, 180]));
        // Tuesday stays empty
        assert_eq!(*image.get_pixel(geometry.xs[1] + 5, y), BACKGROUND);

        let ink = (rect.x0..rect.x1)
            .flat_map(|x| (rect.y0..rect.y1).map(move |y| (x, y)))
            .filter(|&(x, y)| *image.get_pixel(x, y) == Rgb([255, 255, 255]))
            .count();
        assert!(ink > 0, "slot label is drawn in white");
    }

    #[test]
    fn test_unknown_color_falls_back_to_gray() {
        let (subjects, schedule) = algebra(Color::Named("notacolor".into()));
        let rect = slot_rect(&schedule, &subjects);
        let image = render_png(&schedule, &subjects, DEFAULT_RESOLUTION);
        assert_eq!(*image.get_pixel(rect.x0, rect.y0), Rgb(FALLBACK));
    }

    #[test]
    fn test_writer_output_decodes() {
        let dir = std::env::temp_dir().join(format!("u-timetable-png-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let (subjects, schedule) = algebra(Color::Hex("#4682b4".into()));
        PngCalendarWriter::new(&dir).write(&schedule, &subjects).unwrap();

        let decoded = image::open(dir.join("schedule1.png")).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), DEFAULT_RESOLUTION);
        let rect = slot_rect(&schedule, &subjects);
        let y = Geometry::new(schedule.grid.layout(), DEFAULT_RESOLUTION).ys[10] + 1;
        assert_eq!(*decoded.get_pixel(rect.x0, y), Rgb([70, 130, 180]));
        assert_eq!(*decoded.get_pixel(0, decoded.height() - 1), BACKGROUND);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_small_resolution() {
        let (subjects, schedule) = algebra(Color::Rgb(255, 255, 0));
        let (width, height) = MIN_RESOLUTION;
        let image = render_png(&schedule, &subjects, MIN_RESOLUTION);
        assert_eq!(image.dimensions(), (width, height));
    }

    #[test]
    fn test_missing_dir_is_an_error() {
        let (subjects, schedule) = algebra(Color::default());
        let mut writer = PngCalendarWriter::new("/nonexistent/u-timetable/out");
        assert!(matches!(
            writer.write(&schedule, &subjects),
            Err(WriteError::Image(_))
        ));
    }
}
