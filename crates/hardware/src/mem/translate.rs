//! Hierarchical virtual-to-physical address translation.
//!
//! The translator walks a four-level page table: each level is indexed by
//! one 9-bit field of the virtual address (bits 39–47, 30–38, 21–29, 12–20)
//! and the low 12 bits address a byte within the resolved page. Tables and
//! pages are created lazily on first touch; nothing beyond the top level's
//! 512 fixed slots ever exists before it is needed.
//!
//! The walk is deterministic: translating the same address twice yields the
//! same page. Under the default lazy policy translation never fails; an
//! optional physical-page cap turns exhaustion into a
//! [`Fault::AddressTranslationExhausted`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::trace;

use crate::common::{Fault, PhysPageIndex, VirtAddr};
use crate::mem::page::MemoryPage;

/// Innermost table: 9-bit index to physical page.
type Level1 = HashMap<u16, MemoryPage>;
/// 9-bit index to a level-1 table.
type Level2 = HashMap<u16, Level1>;
/// 9-bit index to a level-2 table.
type Level3 = HashMap<u16, Level2>;

/// The four-level page table walker.
///
/// Owned exclusively by its [`crate::mem::Memory`]; there is deliberately no
/// shared or global translation state.
#[derive(Debug, Default)]
pub struct AddressTranslator {
    /// Top-level table. Its index space is the fixed 512 slots addressed by
    /// bits 39–47; entries below it are created lazily.
    root: HashMap<u16, Level3>,
    /// Pages handed out so far; also the next physical page index.
    pages_allocated: u64,
    /// Optional cap on total physical pages.
    max_pages: Option<u64>,
}

impl AddressTranslator {
    /// Creates a translator with an unbounded page budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a translator that refuses to allocate more than `max_pages`
    /// physical pages.
    pub fn with_page_limit(max_pages: u64) -> Self {
        Self {
            max_pages: Some(max_pages),
            ..Self::default()
        }
    }

    /// Walks the hierarchy for `vaddr`, creating tables and the final page
    /// on first touch, and returns the resolved page.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressTranslationExhausted`] when the page budget
    /// is exceeded. Intermediate tables may already have been created at
    /// that point; they hold no pages and translate nothing.
    pub fn translate(&mut self, vaddr: VirtAddr) -> Result<&mut MemoryPage, Fault> {
        let Self {
            root,
            pages_allocated,
            max_pages,
        } = self;

        let [i4, i3, i2, i1] = vaddr.table_indices();
        let level1 = root
            .entry(i4)
            .or_default()
            .entry(i3)
            .or_default()
            .entry(i2)
            .or_default();

        match level1.entry(i1) {
            Entry::Occupied(slot) => Ok(slot.into_mut()),
            Entry::Vacant(slot) => {
                if max_pages.is_some_and(|cap| *pages_allocated >= cap) {
                    return Err(Fault::AddressTranslationExhausted {
                        vaddr: vaddr.val(),
                    });
                }
                let index = PhysPageIndex(*pages_allocated);
                *pages_allocated += 1;
                trace!(vaddr = vaddr.val(), page = index.val(), "page allocated");
                Ok(slot.insert(MemoryPage::new(index)))
            }
        }
    }

    /// Walks the hierarchy without allocating.
    ///
    /// Returns `None` when any level along the path was never touched; the
    /// read path maps that to a zero byte, which is indistinguishable from a
    /// lazily created zero page.
    pub fn lookup(&self, vaddr: VirtAddr) -> Option<&MemoryPage> {
        let [i4, i3, i2, i1] = vaddr.table_indices();
        self.root.get(&i4)?.get(&i3)?.get(&i2)?.get(&i1)
    }

    /// Number of physical pages allocated so far.
    pub fn pages_allocated(&self) -> u64 {
        self.pages_allocated
    }
}
