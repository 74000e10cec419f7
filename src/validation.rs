//! Input validation for timetable searches.
//!
//! Checks structural integrity of subjects before searching. Detects:
//! - Duplicate subject names
//! - Subjects without slots
//! - Empty, inverted, misaligned or day-spanning slots
//! - Slots outside the week layout
//! - Overlapping slots within one subject
//! - Subjects with more slots than the enumerator supports
//!
//! The search itself assumes all of these hold.

use std::collections::HashSet;
use std::fmt;

use crate::models::{Subject, SubjectKind, WeekLayout, CELL_MINUTES, MAX_CHOICE_SLOTS};
use crate::search::MAX_BEST_EFFORT_SLOTS;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two subjects share the same name.
    DuplicateName,
    /// A subject has no slots.
    EmptySubject,
    /// A slot ends at or before its start, or crosses midnight.
    InvalidSlot,
    /// A slot boundary is not on the grid resolution.
    MisalignedSlot,
    /// A slot lies (partly) outside the week layout.
    SlotOutsideGrid,
    /// Two slots of one subject overlap.
    OverlappingSlots,
    /// A subject has more slots than can be enumerated.
    TooManySlots,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates subjects against a week layout.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_subjects(subjects: &[Subject], layout: &WeekLayout) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for subject in subjects {
        if !names.insert(subject.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate subject name: {}", subject.name),
            ));
        }

        if subject.slots.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptySubject,
                format!("Subject '{}' has no time slots", subject.name),
            ));
        }

        let max_slots = match subject.kind {
            SubjectKind::ExclusiveOne => MAX_CHOICE_SLOTS,
            SubjectKind::AllBestEffort => MAX_BEST_EFFORT_SLOTS,
        };
        if subject.slots.len() > max_slots {
            errors.push(ValidationError::new(
                ValidationErrorKind::TooManySlots,
                format!(
                    "Subject '{}' has {} slots; at most {max_slots} are supported for {}",
                    subject.name,
                    subject.slots.len(),
                    subject.kind.code()
                ),
            ));
        }

        validate_slots(subject, layout, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_slots(subject: &Subject, layout: &WeekLayout, errors: &mut Vec<ValidationError>) {
    for slot in &subject.slots {
        if !slot.is_single_day() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSlot,
                format!("Subject '{}': slot {slot} is empty or crosses midnight", subject.name),
            ));
        } else if !slot.is_aligned() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MisalignedSlot,
                format!(
                    "Subject '{}': slot {slot} is not aligned to {CELL_MINUTES} minutes",
                    subject.name
                ),
            ));
        } else if !layout.contains_slot(slot) {
            errors.push(ValidationError::new(
                ValidationErrorKind::SlotOutsideGrid,
                format!(
                    "Subject '{}': slot {slot} lies outside {} days, {:02}:00-{:02}:00",
                    subject.name, layout.days, layout.start_hour, layout.end_hour
                ),
            ));
        }
    }

    for (i, a) in subject.slots.iter().enumerate() {
        for b in &subject.slots[i + 1..] {
            if a.overlaps(b) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OverlappingSlots,
                    format!("Subject '{}': slots {a} and {b} overlap", subject.name),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TimeSlot, WeekTime};
    use chrono::Weekday;

    fn sample_subjects() -> Vec<Subject> {
        vec![
            Subject::exclusive("Algebra")
                .with_slot(TimeSlot::on(Weekday::Tue, (8, 0), (9, 30)))
                .with_slot(TimeSlot::on(Weekday::Thu, (10, 0), (11, 30))),
            Subject::best_effort("Analysis")
                .with_slot(TimeSlot::on(Weekday::Mon, (11, 0), (12, 30)))
                .with_slot(TimeSlot::on(Weekday::Tue, (11, 0), (12, 30)))
                .with_slot(TimeSlot::on(Weekday::Wed, (11, 0), (12, 0))),
        ]
    }

    fn has_kind(errors: &[ValidationError], kind: ValidationErrorKind) -> bool {
        errors.iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_subjects(&sample_subjects(), &WeekLayout::default()).is_ok());
    }

    #[test]
    fn test_duplicate_name() {
        let mut subjects = sample_subjects();
        subjects.push(subjects[0].clone());
        let errors = validate_subjects(&subjects, &WeekLayout::default()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::DuplicateName));
    }

    #[test]
    fn test_empty_subject() {
        let subjects = vec![Subject::best_effort("Nothing")];
        let errors = validate_subjects(&subjects, &WeekLayout::default()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::EmptySubject));
    }

    #[test]
    fn test_invalid_and_misaligned_slots() {
        let subjects = vec![
            Subject::exclusive("Inverted").with_slot(TimeSlot::on(Weekday::Mon, (10, 0), (9, 0))),
            Subject::exclusive("Odd").with_slot(TimeSlot::on(Weekday::Mon, (10, 0), (10, 7))),
            Subject::exclusive("Overnight").with_slot(TimeSlot::new(
                WeekTime::new(Weekday::Mon, 23, 0),
                WeekTime::new(Weekday::Tue, 1, 0),
            )),
        ];
        let errors = validate_subjects(&subjects, &WeekLayout::default()).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::InvalidSlot)
                .count(),
            2
        );
        assert!(has_kind(&errors, ValidationErrorKind::MisalignedSlot));
    }

    #[test]
    fn test_slot_outside_grid() {
        let subjects = vec![
            Subject::exclusive("Weekend").with_slot(TimeSlot::on(Weekday::Sat, (10, 0), (11, 0))),
            Subject::exclusive("Evening").with_slot(TimeSlot::on(Weekday::Mon, (18, 30), (19, 30))),
        ];
        let errors = validate_subjects(&subjects, &WeekLayout::default()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::SlotOutsideGrid));

        // A full week accepts the weekend slot
        let week = WeekLayout::new(7, 8, 20);
        assert!(validate_subjects(&subjects, &week).is_ok());
    }

    #[test]
    fn test_overlapping_slots() {
        let subjects = vec![Subject::best_effort("Clash")
            .with_slot(TimeSlot::on(Weekday::Mon, (8, 0), (9, 30)))
            .with_slot(TimeSlot::on(Weekday::Mon, (9, 0), (10, 0)))];
        let errors = validate_subjects(&subjects, &WeekLayout::default()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::OverlappingSlots));
    }

    #[test]
    fn test_too_many_best_effort_slots() {
        let mut subject = Subject::best_effort("Marathon");
        for i in 0..=MAX_BEST_EFFORT_SLOTS as u32 {
            let day = crate::models::WEEKDAYS[(i % 5) as usize];
            let hour = 8 + i / 5;
            subject = subject.with_slot(TimeSlot::on(day, (hour, 0), (hour, 30)));
        }
        let errors = validate_subjects(&[subject], &WeekLayout::default()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::TooManySlots));
    }

    #[test]
    fn test_multiple_errors() {
        let subjects = vec![
            Subject::exclusive("Empty"),
            Subject::exclusive("Empty")
                .with_slot(TimeSlot::on(Weekday::Sun, (10, 0), (11, 0))),
        ];
        let errors = validate_subjects(&subjects, &WeekLayout::default()).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
