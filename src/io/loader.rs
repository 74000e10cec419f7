//! Subject definition files.
//!
//! One file per subject, `<name>.txt`, the name being the file stem:
//!
//! ```text
//! UE                         type: UE = exactly one slot, VO = all slots
//! steelblue                  optional color: name, #hex or r,g,b
//! Di 8:00-9:30 Audimax       slot: weekday, start-end, optional location
//! Do 10:00-11:30
//! ```
//!
//! Weekdays are German or English names, abbreviated to at least two
//! letters (`Mo`, `Di`, `Mittwoch`, `Thu`, ...). Times use `:` or `.`.
//! Blank lines are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveTime, Timelike, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Color, Subject, SubjectKind, TimeSlot, WeekTime};

static SLOT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+)\W?\s+(\d{1,2})[:.](\d\d)\s*-\s*(\d{1,2})[:.](\d\d)\W?(?:\s+(.+))?$")
        .expect("slot line pattern")
});

static COLOR_TUPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?\s*(\d{1,3})\s*[,;/ ]\s*(\d{1,3})\s*[,;/ ]\s*(\d{1,3})\s*\)?$")
        .expect("color tuple pattern")
});

static COLOR_STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#[0-9A-Fa-f]{3,6}|[A-Za-z]+)$").expect("color string pattern"));

const WEEKDAY_NAMES: [(&str, Weekday); 14] = [
    ("montag", Weekday::Mon),
    ("dienstag", Weekday::Tue),
    ("mittwoch", Weekday::Wed),
    ("donnerstag", Weekday::Thu),
    ("freitag", Weekday::Fri),
    ("samstag", Weekday::Sat),
    ("sonntag", Weekday::Sun),
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Errors while reading subject definitions.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no subject definition files found in {}", .0.display())]
    NoDefinitions(PathBuf),

    #[error("invalid subject file name: {}", .0.display())]
    InvalidFileName(PathBuf),

    #[error("subject '{subject}' doesn't have a recognizable type (expected UE or VO)")]
    MissingKind { subject: String },

    #[error("subject '{subject}', line {line}: times/location can't be read: {text}")]
    InvalidSlotLine {
        subject: String,
        line: usize,
        text: String,
    },

    #[error("subject '{subject}', line {line}: wrong weekday format '{day}'")]
    UnknownWeekday {
        subject: String,
        line: usize,
        day: String,
    },

    #[error("subject '{subject}', line {line}: invalid time {time}")]
    InvalidTime {
        subject: String,
        line: usize,
        time: String,
    },

    #[error("subject '{subject}', line {line}: color component out of range: {text}")]
    InvalidColor {
        subject: String,
        line: usize,
        text: String,
    },
}

/// Parses a weekday name or abbreviation (at least two letters).
pub fn parse_weekday(token: &str) -> Option<Weekday> {
    let token = token.to_lowercase();
    if token.chars().count() < 2 {
        return None;
    }
    WEEKDAY_NAMES
        .iter()
        .find(|(name, _)| name.starts_with(token.as_str()))
        .map(|&(_, day)| day)
}

/// Parses `hour`/`minute` captures into a time of day; `24:00` is allowed.
fn parse_clock(hour: &str, minute: &str) -> Option<(u32, u32)> {
    let h: u32 = hour.parse().ok()?;
    let m: u32 = minute.parse().ok()?;
    if h == 24 && m == 0 {
        return Some((24, 0));
    }
    NaiveTime::from_hms_opt(h, m, 0).map(|t| (t.hour(), t.minute()))
}

/// Parses an optional color line. `Ok(None)` means the line is not a color.
fn parse_color(subject: &str, line: usize, text: &str) -> Result<Option<Color>, LoadError> {
    if let Some(caps) = COLOR_TUPLE.captures(text) {
        let components: Option<Vec<u8>> = (1..=3).map(|i| caps[i].parse().ok()).collect();
        return match components.as_deref() {
            Some(&[r, g, b]) => Ok(Some(Color::Rgb(r, g, b))),
            _ => Err(LoadError::InvalidColor {
                subject: subject.to_string(),
                line,
                text: text.to_string(),
            }),
        };
    }
    if COLOR_STRING.is_match(text) {
        let color = if text.starts_with('#') {
            Color::Hex(text.to_string())
        } else {
            Color::Named(text.to_string())
        };
        return Ok(Some(color));
    }
    Ok(None)
}

fn parse_slot(subject: &str, line: usize, text: &str) -> Result<TimeSlot, LoadError> {
    let caps = SLOT_LINE
        .captures(text)
        .ok_or_else(|| LoadError::InvalidSlotLine {
            subject: subject.to_string(),
            line,
            text: text.to_string(),
        })?;

    let day = parse_weekday(&caps[1]).ok_or_else(|| LoadError::UnknownWeekday {
        subject: subject.to_string(),
        line,
        day: caps[1].to_string(),
    })?;

    let invalid_time = |h: &str, m: &str| LoadError::InvalidTime {
        subject: subject.to_string(),
        line,
        time: format!("{h}:{m}"),
    };
    let (sh, sm) = parse_clock(&caps[2], &caps[3]).ok_or_else(|| invalid_time(&caps[2], &caps[3]))?;
    let (eh, em) = parse_clock(&caps[4], &caps[5]).ok_or_else(|| invalid_time(&caps[4], &caps[5]))?;

    let slot = TimeSlot::new(WeekTime::new(day, sh, sm), WeekTime::new(day, eh, em));
    Ok(match caps.get(6).map(|m| m.as_str().trim()) {
        Some(location) if !location.is_empty() => slot.with_location(location),
        _ => slot,
    })
}

/// Parses the contents of one definition file.
pub fn parse_subject(name: &str, text: &str) -> Result<Subject, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let kind = lines
        .next()
        .and_then(|(_, l)| l.split_whitespace().next())
        .and_then(SubjectKind::from_code)
        .ok_or_else(|| LoadError::MissingKind {
            subject: name.to_string(),
        })?;
    let mut subject = Subject::new(name, kind);

    for (index, (line, content)) in lines.enumerate() {
        if index == 0 {
            if let Some(color) = parse_color(name, line, content)? {
                subject.color = color;
                continue;
            }
        }
        subject.slots.push(parse_slot(name, line, content)?);
    }

    Ok(subject)
}

/// Reads one definition file; the subject name is the file stem.
pub fn load_subject_file(path: &Path) -> Result<Subject, LoadError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LoadError::InvalidFileName(path.to_path_buf()))?;
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let subject = parse_subject(name, &text)?;
    debug!(
        subject = %subject.name,
        kind = subject.kind.code(),
        slots = subject.slot_count(),
        "loaded subject"
    );
    Ok(subject)
}

/// Loads every `*.txt` definition in a directory, ordered by file name.
pub fn load_subjects(dir: &Path) -> Result<Vec<Subject>, LoadError> {
    info!(dir = %dir.display(), "loading subject definitions");
    let io_err = |source: std::io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "txt") {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(LoadError::NoDefinitions(dir.to_path_buf()));
    }
    paths.sort();

    paths.iter().map(|p| load_subject_file(p)).collect()
}

/// Renders a subject in definition-file format.
pub fn format_subject(subject: &Subject) -> String {
    let mut out = format!("{}\n{}\n", subject.kind.code(), subject.color);
    for slot in &subject.slots {
        out.push_str(&slot.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Mo"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("di"), Some(Weekday::Tue));
        assert_eq!(parse_weekday("Mittwoch"), Some(Weekday::Wed));
        assert_eq!(parse_weekday("Do"), Some(Weekday::Thu));
        assert_eq!(parse_weekday("Thu"), Some(Weekday::Thu));
        assert_eq!(parse_weekday("So"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("M"), None);
        assert_eq!(parse_weekday("Montagmorgen"), None);
        assert_eq!(parse_weekday("Xy"), None);
    }

    #[test]
    fn test_parse_exclusive_with_color_and_location() {
        let text = "UE\nsteelblue\nDi 8:00-9:30 Audimax\nDo 10.00-11.30 other place\n";
        let subject = parse_subject("Algebra", text).unwrap();
        assert_eq!(subject.name, "Algebra");
        assert_eq!(subject.kind, SubjectKind::ExclusiveOne);
        assert_eq!(subject.color, Color::Named("steelblue".into()));
        assert_eq!(subject.slots.len(), 2);
        assert_eq!(subject.slots[0], TimeSlot::on(Weekday::Tue, (8, 0), (9, 30)).with_location("Audimax"));
        assert_eq!(subject.slots[1].location.as_deref(), Some("other place"));
        assert_eq!(subject.slots[1].start, WeekTime::new(Weekday::Thu, 10, 0));
    }

    #[test]
    fn test_parse_best_effort_without_color() {
        let text = "vo\n\nMo 11:00-12:30\nDi 11:00-12:30\nMi 11:00-12:00\n";
        let subject = parse_subject("Analysis", text).unwrap();
        assert_eq!(subject.kind, SubjectKind::AllBestEffort);
        assert_eq!(subject.color, Color::default());
        assert_eq!(subject.slots.len(), 3);
        assert_eq!(subject.slots[2].end, WeekTime::new(Weekday::Wed, 12, 0));
    }

    #[test]
    fn test_parse_colors() {
        let rgb = parse_subject("A", "UE\n70,130,180\nMo 8:00-9:00").unwrap();
        assert_eq!(rgb.color, Color::Rgb(70, 130, 180));
        let hex = parse_subject("A", "UE\n#4682b4\nMo 8:00-9:00").unwrap();
        assert_eq!(hex.color, Color::Hex("#4682b4".into()));

        let err = parse_subject("A", "UE\n300,0,0\nMo 8:00-9:00").unwrap_err();
        assert!(matches!(err, LoadError::InvalidColor { line: 2, .. }));
    }

    #[test]
    fn test_missing_kind() {
        let err = parse_subject("A", "Mo 8:00-9:00\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingKind { .. }));
        assert!(matches!(parse_subject("A", "").unwrap_err(), LoadError::MissingKind { .. }));
    }

    #[test]
    fn test_bad_lines() {
        let err = parse_subject("A", "UE\nMo 8:00-9:00\nnonsense here\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidSlotLine { line: 3, .. }));

        let err = parse_subject("A", "UE\nXx 8:00-9:00\n").unwrap_err();
        assert!(matches!(err, LoadError::UnknownWeekday { .. }));

        let err = parse_subject("A", "UE\nMo 8:75-9:00\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidTime { .. }));
    }

    #[test]
    fn test_format_subject_parses_back() {
        let subject = Subject::best_effort("Physics")
            .with_color(Color::Rgb(1, 2, 3))
            .with_slot(TimeSlot::on(Weekday::Mon, (8, 0), (9, 30)).with_location("HS 2"))
            .with_slot(TimeSlot::on(Weekday::Fri, (14, 15), (15, 45)));
        let text = format_subject(&subject);
        assert_eq!(text, "VO\n1,2,3\nMo 08:00-09:30 HS 2\nFr 14:15-15:45\n");
        assert_eq!(parse_subject("Physics", &text).unwrap(), subject);
    }

    #[test]
    fn test_load_subjects_from_dir() {
        let dir = std::env::temp_dir().join(format!("u-timetable-loader-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        assert!(matches!(load_subjects(&dir).unwrap_err(), LoadError::NoDefinitions(_)));

        fs::write(dir.join("b.txt"), "VO\nMo 8:00-9:00\n").unwrap();
        fs::write(dir.join("a.txt"), "UE\nDi 8:00-9:00\n").unwrap();
        fs::write(dir.join("notes.md"), "ignored").unwrap();

        let subjects = load_subjects(&dir).unwrap();
        let names: Vec<_> = subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
