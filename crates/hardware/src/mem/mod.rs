//! Backing storage: paged memory behind hierarchical address translation.
//!
//! This module models the flat byte-addressable store the cache hierarchy
//! falls through to. It provides:
//! 1. **Pages:** Fixed 4 KiB zero-initialized buffers, allocated lazily.
//! 2. **Translation:** The four-level walk from virtual address to page.
//! 3. **Byte/Block Access:** Single-byte reads and writes plus the
//!    line-sized block transfers the cache uses for fills.
//!
//! Each `Memory` owns its page table outright; there is no process-wide
//! shared translation state.

/// Fixed-size physical memory pages.
pub mod page;
/// Four-level virtual-to-physical translation.
pub mod translate;

pub use page::MemoryPage;
pub use translate::AddressTranslator;

use crate::common::{Fault, VirtAddr, PAGE_OFFSET_MASK, PAGE_SIZE};

/// Byte-addressable backing store organized as lazily allocated 4 KiB pages.
///
/// All access goes through the owned [`AddressTranslator`]; callers only
/// ever name virtual addresses.
#[derive(Debug, Default)]
pub struct Memory {
    translator: AddressTranslator,
}

impl Memory {
    /// Creates an empty memory with an unbounded page budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty memory that refuses to allocate more than
    /// `max_pages` physical pages.
    pub fn with_page_limit(max_pages: u64) -> Self {
        Self {
            translator: AddressTranslator::with_page_limit(max_pages),
        }
    }

    /// Reads the byte at `vaddr`.
    ///
    /// A page that was never written reads as zero; the read path does not
    /// materialize pages, which keeps reads infallible even under a page
    /// budget.
    pub fn read(&self, vaddr: VirtAddr) -> u8 {
        match self.translator.lookup(vaddr) {
            Some(page) => page.read(vaddr.page_offset()),
            None => 0,
        }
    }

    /// Writes `value` to the byte at `vaddr`, allocating the page on first
    /// touch.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressTranslationExhausted`] when a page budget is
    /// configured and exceeded.
    pub fn write(&mut self, vaddr: VirtAddr, value: u8) -> Result<(), Fault> {
        let page = self.translator.translate(vaddr)?;
        page.write(vaddr.page_offset(), value);
        Ok(())
    }

    /// Fills `buf` with the bytes starting at `base`.
    ///
    /// Used by the cache for line fills. The block is read page by page;
    /// line-aligned blocks never straddle a page because the page size is a
    /// multiple of every valid line size.
    pub fn read_block(&self, base: VirtAddr, buf: &mut [u8]) {
        let mut addr = base.val();
        let mut filled = 0;
        while filled < buf.len() {
            let offset = addr & PAGE_OFFSET_MASK;
            let in_page = ((PAGE_SIZE - offset) as usize).min(buf.len() - filled);
            match self.translator.lookup(VirtAddr::new(addr)) {
                Some(page) => {
                    page.read_slice(offset, &mut buf[filled..filled + in_page]);
                }
                None => {
                    buf[filled..filled + in_page].fill(0);
                }
            }
            filled += in_page;
            addr += in_page as u64;
        }
    }

    /// Number of physical pages allocated so far.
    pub fn pages_allocated(&self) -> u64 {
        self.translator.pages_allocated()
    }

    /// Shared access to the owned translator, for callers that only need
    /// translation (for example, tests of the walk itself).
    pub fn translator(&self) -> &AddressTranslator {
        &self.translator
    }

    /// Exclusive access to the owned translator.
    pub fn translator_mut(&mut self) -> &mut AddressTranslator {
        &mut self.translator
    }
}
