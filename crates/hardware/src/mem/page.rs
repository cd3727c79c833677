//! Fixed-size physical memory pages.

use std::fmt;

use crate::common::{PhysPageIndex, PAGE_SIZE};

/// One 4 KiB unit of backing storage.
///
/// A page owns its buffer and knows its own physical index. All access is by
/// in-page offset (the low 12 bits of the virtual address); pages are
/// zero-initialized and never freed once allocated.
pub struct MemoryPage {
    index: PhysPageIndex,
    data: Box<[u8; PAGE_SIZE as usize]>,
}

impl MemoryPage {
    /// Creates a zero-filled page with the given physical index.
    pub fn new(index: PhysPageIndex) -> Self {
        Self {
            index,
            data: Box::new([0; PAGE_SIZE as usize]),
        }
    }

    /// The physical index assigned to this page at allocation.
    pub fn index(&self) -> PhysPageIndex {
        self.index
    }

    /// Reads the byte at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= PAGE_SIZE`; callers pass offsets produced by
    /// [`crate::common::VirtAddr::page_offset`], which masks to 12 bits.
    pub fn read(&self, offset: u64) -> u8 {
        self.data[offset as usize]
    }

    /// Writes `value` at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= PAGE_SIZE`; see [`Self::read`].
    pub fn write(&mut self, offset: u64, value: u8) {
        self.data[offset as usize] = value;
    }

    /// Copies `buf.len()` bytes starting at `offset` into `buf`.
    ///
    /// # Panics
    ///
    /// Panics if the range extends past the end of the page.
    pub fn read_slice(&self, offset: u64, buf: &mut [u8]) {
        let start = offset as usize;
        buf.copy_from_slice(&self.data[start..start + buf.len()]);
    }
}

impl fmt::Debug for MemoryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPage")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
