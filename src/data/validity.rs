//! Per-slot validity bits for a data object's representations.

/// A bitset with one bit per representation slot, by index.
///
/// Bit `i` set means "the content of slot `i` matches the most recent
/// edit". Indices are stable for the lifetime of a slot; only
/// [`remove`](ValidityMask::remove) renumbers, compacting the bits above
/// the removed index down by one. Capacity is [`ValidityMask::CAPACITY`]
/// slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidityMask(u64);

impl ValidityMask {
    /// Maximum number of slots the mask can track.
    pub const CAPACITY: usize = 64;

    /// A mask with no bits set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Marks slot `index` valid.
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < Self::CAPACITY);
        self.0 |= 1 << index;
    }

    /// Marks slot `index` invalid.
    pub fn clear(&mut self, index: usize) {
        debug_assert!(index < Self::CAPACITY);
        self.0 &= !(1 << index);
    }

    /// True if slot `index` is valid.
    pub fn test(&self, index: usize) -> bool {
        debug_assert!(index < Self::CAPACITY);
        self.0 & (1 << index) != 0
    }

    /// Marks the first `len` slots valid.
    pub fn set_all(&mut self, len: usize) {
        debug_assert!(len <= Self::CAPACITY);
        self.0 = if len == Self::CAPACITY {
            u64::MAX
        } else {
            (1u64 << len) - 1
        };
    }

    /// Removes slot `index`: bits below keep their position, bits above
    /// shift down by one.
    pub fn remove(&mut self, index: usize) {
        debug_assert!(index < Self::CAPACITY);
        let below = self.0 & ((1u64 << index) - 1);
        let above = if index + 1 == Self::CAPACITY {
            0
        } else {
            self.0 >> (index + 1)
        };
        self.0 = below | (above << index);
    }

    /// Number of valid slots among the first `len`.
    pub fn count_valid(&self, len: usize) -> usize {
        debug_assert!(len <= Self::CAPACITY);
        let window = if len == Self::CAPACITY {
            u64::MAX
        } else {
            (1u64 << len) - 1
        };
        (self.0 & window).count_ones() as usize
    }
}
