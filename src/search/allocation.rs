//! Per-subject allocation enumeration.
//!
//! # Choice Sets
//!
//! | Kind | Predicate | Count |
//! |------|-----------|-------|
//! | ExclusiveOne | exactly one flag set | n |
//! | AllBestEffort | at least one flag set | 2ⁿ − 1 |
//!
//! Choices are computed from the index on demand; nothing is materialized.
//! The order is fixed: ExclusiveOne flags slot 0 first, then slot 1, and so
//! on; AllBestEffort counts the raw bits down from all-set to the single
//! last slot. The order only affects discovery order (and therefore version
//! numbering), never which schedules exist.

use crate::models::{AllocationChoice, Subject, SubjectKind, MAX_CHOICE_SLOTS};

/// Largest slot count accepted for an AllBestEffort subject.
///
/// 2²⁰ − 1 choices for a single subject is already far beyond what an
/// exhaustive search can multiply out.
pub const MAX_BEST_EFFORT_SLOTS: usize = 20;

/// Cursor over one subject's valid allocation choices.
///
/// Besides random access it keeps a current index that can step forward and
/// back. Stepping forward from the last index leaves the index in place and
/// raises the end-of-range signal instead.
#[derive(Debug, Clone)]
pub struct AllocationEnumerator {
    kind: SubjectKind,
    slot_count: usize,
    index: usize,
    reached_end: bool,
}

impl AllocationEnumerator {
    /// Creates an enumerator positioned at the first choice.
    ///
    /// # Panics
    /// If `slot_count` is 0, exceeds [`MAX_CHOICE_SLOTS`], or exceeds
    /// [`MAX_BEST_EFFORT_SLOTS`] for an AllBestEffort subject. Callers
    /// validate subjects before building enumerators.
    pub fn new(kind: SubjectKind, slot_count: usize) -> Self {
        assert!(slot_count >= 1, "subject must have at least one slot");
        assert!(slot_count <= MAX_CHOICE_SLOTS, "too many slots for one subject");
        if kind == SubjectKind::AllBestEffort {
            assert!(
                slot_count <= MAX_BEST_EFFORT_SLOTS,
                "too many slots for a best-effort subject"
            );
        }
        Self {
            kind,
            slot_count,
            index: 0,
            reached_end: false,
        }
    }

    /// Creates an enumerator for a subject.
    pub fn for_subject(subject: &Subject) -> Self {
        Self::new(subject.kind, subject.slot_count())
    }

    /// Number of valid choices.
    pub fn len(&self) -> usize {
        match self.kind {
            SubjectKind::ExclusiveOne => self.slot_count,
            SubjectKind::AllBestEffort => (1usize << self.slot_count) - 1,
        }
    }

    /// Always false: every enumerator has at least one choice.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Choice at a given position.
    pub fn choice_at(&self, index: usize) -> Option<AllocationChoice> {
        (index < self.len()).then(|| self.choice(index))
    }

    /// Choice at the current index.
    pub fn current(&self) -> AllocationChoice {
        self.choice(self.index)
    }

    fn choice(&self, index: usize) -> AllocationChoice {
        match self.kind {
            SubjectKind::ExclusiveOne => AllocationChoice::single(index, self.slot_count),
            SubjectKind::AllBestEffort => {
                let all = (1u64 << self.slot_count) - 1;
                AllocationChoice::from_bits(all - index as u64, self.slot_count)
            }
        }
    }

    /// Current index.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves to the next choice.
    ///
    /// Returns `false` and raises the end-of-range signal if the current
    /// choice is already the last one.
    pub fn advance(&mut self) -> bool {
        if self.index + 1 < self.len() {
            self.index += 1;
            true
        } else {
            self.reached_end = true;
            false
        }
    }

    /// Moves to the previous choice. Returns `false` at the first choice.
    pub fn retreat(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Whether the end-of-range signal is raised.
    #[inline]
    pub fn has_reached_end(&self) -> bool {
        self.reached_end
    }

    /// Reads and clears the end-of-range signal.
    pub fn take_end_signal(&mut self) -> bool {
        std::mem::take(&mut self.reached_end)
    }

    /// Returns to the first choice and clears the signal.
    pub fn reset(&mut self) {
        self.index = 0;
        self.reached_end = false;
    }

    /// All choices in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = AllocationChoice> + '_ {
        (0..self.len()).filter_map(move |i| self.choice_at(i))
    }
}
