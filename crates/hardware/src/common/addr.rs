//! Virtual address and physical page index types.
//!
//! Strong types keep the two address spaces apart at compile time: software
//! only ever names [`VirtAddr`]s, and the translator is the only component
//! that produces [`PhysPageIndex`]es.

use super::constants::{
    LEVEL1_SHIFT, LEVEL2_SHIFT, LEVEL3_SHIFT, LEVEL4_SHIFT, LEVEL_INDEX_MASK, PAGE_OFFSET_MASK,
};

/// A 64-bit virtual address as seen by the processor.
///
/// Every storage access the processor makes is expressed as a `VirtAddr` and
/// routed through translation before it reaches a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub u64);

/// The index of a physical 4 KiB page, assigned at allocation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysPageIndex(pub u64);

impl VirtAddr {
    /// Wraps a raw 64-bit value.
    #[inline(always)]
    pub fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit value.
    #[inline(always)]
    pub fn val(self) -> u64 {
        self.0
    }

    /// Extracts the in-page offset (low 12 bits). Pure bit masking.
    #[inline(always)]
    pub fn page_offset(self) -> u64 {
        self.0 & PAGE_OFFSET_MASK
    }

    /// Extracts the four 9-bit translation indices, level 4 first.
    pub fn table_indices(self) -> [u16; 4] {
        [
            ((self.0 >> LEVEL4_SHIFT) & LEVEL_INDEX_MASK) as u16,
            ((self.0 >> LEVEL3_SHIFT) & LEVEL_INDEX_MASK) as u16,
            ((self.0 >> LEVEL2_SHIFT) & LEVEL_INDEX_MASK) as u16,
            ((self.0 >> LEVEL1_SHIFT) & LEVEL_INDEX_MASK) as u16,
        ]
    }
}

impl PhysPageIndex {
    /// Returns the raw page index.
    #[inline(always)]
    pub fn val(self) -> u64 {
        self.0
    }
}

impl From<u64> for VirtAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}
