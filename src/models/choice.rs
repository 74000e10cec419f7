//! Per-subject priority flags.
//!
//! An [`AllocationChoice`] marks which of a subject's slots are attempted in
//! the priority phase of a schedule build. Slot 0 is the most significant
//! bit, so counting the raw value downward walks choices in the canonical
//! order (all slots first, then progressively fewer).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum slots per subject representable by a choice.
pub const MAX_CHOICE_SLOTS: usize = 64;

/// Priority flags for one subject's slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AllocationChoice {
    bits: u64,
    len: u8,
}

impl AllocationChoice {
    /// Creates a choice from raw bits, slot 0 being bit `len - 1`.
    pub fn from_bits(bits: u64, len: usize) -> Self {
        debug_assert!(len <= MAX_CHOICE_SLOTS);
        let mask = if len >= 64 { u64::MAX } else { (1u64 << len) - 1 };
        Self {
            bits: bits & mask,
            len: len as u8,
        }
    }

    /// A choice with only `slot` flagged.
    pub fn single(slot: usize, len: usize) -> Self {
        Self::from_bits(1u64 << (len - 1 - slot), len)
    }

    /// Creates a choice from per-slot flags.
    pub fn from_flags(flags: &[bool]) -> Self {
        let bits = flags
            .iter()
            .fold(0u64, |acc, &flag| (acc << 1) | u64::from(flag));
        Self::from_bits(bits, flags.len())
    }

    /// Raw bits.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of slots covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the slot is flagged.
    #[inline]
    pub fn is_set(&self, slot: usize) -> bool {
        slot < self.len() && (self.bits >> (self.len() - 1 - slot)) & 1 == 1
    }

    /// Number of flagged slots.
    pub fn count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Per-slot flags in slot order.
    pub fn flags(&self) -> Vec<bool> {
        (0..self.len()).map(|i| self.is_set(i)).collect()
    }
}

impl fmt::Display for AllocationChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            f.write_str(if self.is_set(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}
