//! Week-relative time instants and candidate slots.
//!
//! # Time Model
//! All instants are minutes since Monday 00:00 of an abstract week.
//! Schedules recur weekly, so no calendar date is involved. The grid
//! resolution is [`CELL_MINUTES`]; valid slot boundaries are aligned to it.
//!
//! Slots are half-open intervals `[start, end)`.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Grid resolution in minutes.
pub const CELL_MINUTES: u32 = 5;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Monday-first weekday order used for day indices.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full weekday name as printed on calendars (German, like the input files).
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Montag",
        Weekday::Tue => "Dienstag",
        Weekday::Wed => "Mittwoch",
        Weekday::Thu => "Donnerstag",
        Weekday::Fri => "Freitag",
        Weekday::Sat => "Samstag",
        Weekday::Sun => "Sonntag",
    }
}

/// Two-letter weekday abbreviation: `Mo Di Mi Do Fr Sa So`.
pub fn weekday_abbrev(day: Weekday) -> &'static str {
    &weekday_name(day)[..2]
}

/// An instant within the week, in minutes since Monday 00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekTime(u32);

impl WeekTime {
    /// Creates an instant from a weekday and a time of day.
    pub fn new(day: Weekday, hour: u32, minute: u32) -> Self {
        Self(day.num_days_from_monday() * MINUTES_PER_DAY + hour * 60 + minute)
    }

    /// Creates an instant from raw minutes since Monday 00:00.
    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Minutes since Monday 00:00.
    #[inline]
    pub fn minutes(self) -> u32 {
        self.0
    }

    /// Zero-based day index (Monday = 0).
    #[inline]
    pub fn day_index(self) -> u32 {
        self.0 / MINUTES_PER_DAY
    }

    /// Weekday of this instant.
    pub fn weekday(self) -> Weekday {
        WEEKDAYS[(self.day_index() % 7) as usize]
    }

    /// Minutes since midnight of this instant's day.
    #[inline]
    pub fn minute_of_day(self) -> u32 {
        self.0 % MINUTES_PER_DAY
    }

    pub fn hour(self) -> u32 {
        self.minute_of_day() / 60
    }

    pub fn minute(self) -> u32 {
        self.minute_of_day() % 60
    }

    /// Whether the instant lies on a grid cell boundary.
    #[inline]
    pub fn is_aligned(self) -> bool {
        self.0 % CELL_MINUTES == 0
    }

    /// Shifts the instant by a signed number of minutes, saturating at 0.
    pub fn offset(self, minutes: i64) -> Self {
        Self((self.0 as i64 + minutes).max(0) as u32)
    }

    /// `HH:MM` time of day.
    pub fn clock(self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }
}

impl fmt::Display for WeekTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", weekday_abbrev(self.weekday()), self.clock())
    }
}

/// A candidate time range for a subject.
///
/// Half-open interval: includes `start`, excludes `end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Slot start (inclusive).
    pub start: WeekTime,
    /// Slot end (exclusive).
    pub end: WeekTime,
    /// Optional location label (room, building).
    pub location: Option<String>,
}

impl TimeSlot {
    /// Creates a slot without a location.
    pub fn new(start: WeekTime, end: WeekTime) -> Self {
        Self {
            start,
            end,
            location: None,
        }
    }

    /// Creates a slot on one day from `(hour, minute)` pairs.
    pub fn on(day: Weekday, from: (u32, u32), to: (u32, u32)) -> Self {
        Self::new(WeekTime::new(day, from.0, from.1), WeekTime::new(day, to.0, to.1))
    }

    /// Sets the location label.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Duration in minutes (0 for empty or inverted slots).
    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Whether both boundaries are aligned to the grid resolution.
    pub fn is_aligned(&self) -> bool {
        self.start.is_aligned() && self.end.is_aligned()
    }

    /// Whether the slot starts and ends on the same day.
    ///
    /// An end of exactly midnight counts as the starting day.
    pub fn is_single_day(&self) -> bool {
        self.end > self.start && (self.end.minutes() - 1) / MINUTES_PER_DAY == self.start.day_index()
    }

    /// Whether two slots share at least one minute.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end.clock())?;
        if let Some(location) = &self.location {
            write!(f, " {location}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_time_components() {
        let t = WeekTime::new(Weekday::Wed, 9, 35);
        assert_eq!(t.minutes(), 2 * MINUTES_PER_DAY + 9 * 60 + 35);
        assert_eq!(t.day_index(), 2);
        assert_eq!(t.weekday(), Weekday::Wed);
        assert_eq!(t.hour(), 9);
        assert_eq!(t.minute(), 35);
        assert!(t.is_aligned());
        assert_eq!(t.to_string(), "Mi 09:35");
    }

    #[test]
    fn test_alignment() {
        assert!(!WeekTime::new(Weekday::Mon, 8, 3).is_aligned());
        let slot = TimeSlot::on(Weekday::Mon, (8, 0), (9, 32));
        assert!(!slot.is_aligned());
    }

    #[test]
    fn test_slot_overlap() {
        let a = TimeSlot::on(Weekday::Mon, (8, 0), (9, 30));
        let b = TimeSlot::on(Weekday::Mon, (9, 0), (10, 0));
        let c = TimeSlot::on(Weekday::Mon, (9, 30), (10, 0)); // touching
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert_eq!(a.duration_minutes(), 90);
    }

    #[test]
    fn test_single_day() {
        assert!(TimeSlot::on(Weekday::Tue, (22, 0), (24, 0)).is_single_day());
        let spanning = TimeSlot::new(
            WeekTime::new(Weekday::Tue, 23, 0),
            WeekTime::new(Weekday::Wed, 1, 0),
        );
        assert!(!spanning.is_single_day());
        assert!(!TimeSlot::on(Weekday::Tue, (10, 0), (9, 0)).is_single_day());
    }

    #[test]
    fn test_slot_display() {
        let slot = TimeSlot::on(Weekday::Thu, (10, 0), (11, 30)).with_location("HS 1");
        assert_eq!(slot.to_string(), "Do 10:00-11:30 HS 1");
    }
}
