//! Random subject-set generator.
//!
//! Produces valid inputs (aligned, inside the layout, no overlap within a
//! subject) for demos, stress runs and tests. Generation is reproducible
//! from the seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Color, Subject, SubjectKind, TimeSlot, WeekLayout, CELL_MINUTES, MINUTES_PER_DAY};
use crate::search::MAX_BEST_EFFORT_SLOTS;

/// Configuration for generating subject sets.
#[derive(Debug, Clone)]
pub struct SubjectGeneratorConfig {
    /// Number of subjects.
    pub subjects: usize,
    /// Slots per subject range (min, max), inclusive.
    pub slots_per_subject: (usize, usize),
    /// Slot duration range in grid cells (min, max), inclusive.
    pub duration_cells: (usize, usize),
    /// Probability that a subject is AllBestEffort.
    pub best_effort_fraction: f64,
    /// Layout the slots must fit into.
    pub layout: WeekLayout,
}

impl Default for SubjectGeneratorConfig {
    fn default() -> Self {
        Self::small()
    }
}

impl SubjectGeneratorConfig {
    /// A handful of subjects; a few hundred combinations.
    pub fn small() -> Self {
        Self {
            subjects: 4,
            slots_per_subject: (1, 3),
            duration_cells: (12, 18), // 60-90 min
            best_effort_fraction: 0.4,
            layout: WeekLayout::default(),
        }
    }

    /// A typical semester: tens of thousands of combinations.
    pub fn medium() -> Self {
        Self {
            subjects: 7,
            slots_per_subject: (2, 4),
            duration_cells: (12, 24),
            best_effort_fraction: 0.3,
            layout: WeekLayout::default(),
        }
    }
}

/// Seeded generator for subject sets.
pub struct SubjectGenerator {
    config: SubjectGeneratorConfig,
    rng: StdRng,
}

impl SubjectGenerator {
    /// Creates a generator with the given config and seed.
    pub fn new(config: SubjectGeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a subject set named `S01`, `S02`, ...
    pub fn generate(&mut self) -> Vec<Subject> {
        (0..self.config.subjects)
            .map(|i| self.generate_subject(i))
            .collect()
    }

    fn generate_subject(&mut self, index: usize) -> Subject {
        let kind = if self
            .rng
            .random_bool(self.config.best_effort_fraction.clamp(0.0, 1.0))
        {
            SubjectKind::AllBestEffort
        } else {
            SubjectKind::ExclusiveOne
        };

        let (lo, hi) = self.config.slots_per_subject;
        let lo = lo.max(1);
        let mut wanted = self.rng.random_range(lo..=hi.max(lo));
        if kind == SubjectKind::AllBestEffort {
            wanted = wanted.min(MAX_BEST_EFFORT_SLOTS);
        }

        let color = Color::Rgb(self.rng.random(), self.rng.random(), self.rng.random());
        let mut subject = Subject::new(format!("S{:02}", index + 1), kind).with_color(color);

        let mut attempts = 0;
        while subject.slots.len() < wanted && attempts < wanted * 20 {
            attempts += 1;
            if let Some(slot) = self.random_slot() {
                if !subject.slots.iter().any(|s| s.overlaps(&slot)) {
                    subject.slots.push(slot);
                }
            }
        }
        subject
    }

    fn random_slot(&mut self) -> Option<TimeSlot> {
        let layout = self.config.layout;
        let per_day = layout.cells_per_day();
        if per_day == 0 || layout.days == 0 {
            return None;
        }

        let (lo, hi) = self.config.duration_cells;
        let lo = lo.clamp(1, per_day);
        let duration = self.rng.random_range(lo..=hi.clamp(lo, per_day));
        let day = self.rng.random_range(0..layout.days);
        let start_cell = self.rng.random_range(0..=per_day - duration);

        let start = layout.cell_time(day as usize * per_day + start_cell);
        let end = start.offset(i64::from(duration as u32 * CELL_MINUTES));
        debug_assert!(end.minutes() <= (day + 1) * MINUTES_PER_DAY);
        Some(TimeSlot::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchDriver;
    use crate::validation::validate_subjects;

    #[test]
    fn test_generated_subjects_are_valid() {
        for seed in 0..20 {
            let config = SubjectGeneratorConfig::medium();
            let layout = config.layout;
            let subjects = SubjectGenerator::new(config, seed).generate();
            assert_eq!(subjects.len(), 7);
            assert!(subjects.iter().all(|s| !s.slots.is_empty()));
            assert!(validate_subjects(&subjects, &layout).is_ok(), "seed {seed}");
        }
    }

    #[test]
    fn test_same_seed_same_subjects() {
        let a = SubjectGenerator::new(SubjectGeneratorConfig::small(), 42).generate();
        let b = SubjectGenerator::new(SubjectGeneratorConfig::small(), 42).generate();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_subjects_searchable() {
        let config = SubjectGeneratorConfig::small();
        let layout = config.layout;
        let subjects = SubjectGenerator::new(config, 7).generate();
        let driver = SearchDriver::new(&subjects, layout).unwrap();
        assert!(driver.combination_count().is_some());
    }
}
