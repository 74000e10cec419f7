//! Subject model.
//!
//! A subject is one recurring weekly commitment with one or more candidate
//! time slots. Its kind decides how many of those slots it needs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TimeSlot;

/// How a subject consumes its candidate slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKind {
    /// Exactly one of the slots is required (definition code `UE`).
    ExclusiveOne,
    /// Every slot is wanted; partial fill is accepted (definition code `VO`).
    AllBestEffort,
}

impl SubjectKind {
    /// Definition-file code.
    pub fn code(&self) -> &'static str {
        match self {
            SubjectKind::ExclusiveOne => "UE",
            SubjectKind::AllBestEffort => "VO",
        }
    }

    /// Parses a definition-file code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "UE" => Some(SubjectKind::ExclusiveOne),
            "VO" => Some(SubjectKind::AllBestEffort),
            _ => None,
        }
    }
}

/// Display color of a subject. Opaque to the search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Rgb(u8, u8, u8),
    /// Hex code including the leading `#`.
    Hex(String),
    /// Named color, e.g. `steelblue`.
    Named(String),
}

impl Default for Color {
    fn default() -> Self {
        Color::Rgb(127, 127, 127)
    }
}

impl Color {
    /// Resolves to RGB. `None` for unknown names and malformed hex codes.
    pub fn to_rgb(&self) -> Option<[u8; 3]> {
        match self {
            Color::Rgb(r, g, b) => Some([*r, *g, *b]),
            Color::Hex(hex) => super::palette::hex_rgb(hex),
            Color::Named(name) => super::palette::named_rgb(name),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgb(r, g, b) => write!(f, "{r},{g},{b}"),
            Color::Hex(hex) => f.write_str(hex),
            Color::Named(name) => f.write_str(name),
        }
    }
}

/// A subject to be placed on the weekly grid.
///
/// Slot order is significant: it is the tie-break order used when
/// booking slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject name.
    pub name: String,
    /// Slot consumption mode.
    pub kind: SubjectKind,
    /// Candidate slots in priority order.
    pub slots: Vec<TimeSlot>,
    /// Display color.
    pub color: Color,
}

impl Subject {
    /// Creates a subject with no slots and the default color.
    pub fn new(name: impl Into<String>, kind: SubjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            slots: Vec::new(),
            color: Color::default(),
        }
    }

    /// Shorthand for an [`SubjectKind::ExclusiveOne`] subject.
    pub fn exclusive(name: impl Into<String>) -> Self {
        Self::new(name, SubjectKind::ExclusiveOne)
    }

    /// Shorthand for an [`SubjectKind::AllBestEffort`] subject.
    pub fn best_effort(name: impl Into<String>) -> Self {
        Self::new(name, SubjectKind::AllBestEffort)
    }

    /// Appends a candidate slot.
    pub fn with_slot(mut self, slot: TimeSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Number of candidate slots.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether an allocation of `allocated` slots satisfies this subject.
    pub fn is_satisfied_by(&self, allocated: usize) -> bool {
        match self.kind {
            SubjectKind::ExclusiveOne => allocated >= 1,
            SubjectKind::AllBestEffort => allocated == self.slots.len(),
        }
    }
}
