//! Paged memory tests: lazy allocation, zero-fill reads, block transfers.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use emusim_core::common::{Fault, VirtAddr, PAGE_SIZE};
use emusim_core::mem::Memory;

/// A byte that was never written reads as zero, and reading allocates
/// nothing.
#[test]
fn untouched_memory_reads_zero() {
    let memory = Memory::new();
    assert_eq!(memory.read(VirtAddr::new(0xDEAD_BEEF)), 0);
    assert_eq!(memory.pages_allocated(), 0);
}

/// The first write to a page allocates it; later writes to the same page
/// do not.
#[test]
fn write_allocates_page_once() {
    let mut memory = Memory::new();
    memory.write(VirtAddr::new(100), 1).unwrap();
    assert_eq!(memory.pages_allocated(), 1);

    memory.write(VirtAddr::new(200), 2).unwrap();
    assert_eq!(memory.pages_allocated(), 1, "same page");

    memory.write(VirtAddr::new(PAGE_SIZE), 3).unwrap();
    assert_eq!(memory.pages_allocated(), 2);
}

/// A deep, widely scattered address behaves like any other.
#[test]
fn deep_address_round_trip() {
    let mut memory = Memory::new();
    let addr = VirtAddr::new(0x0123_4567_89AB_CDEF);
    memory.write(addr, 42).unwrap();
    assert_eq!(memory.read(addr), 42);
    assert_eq!(memory.pages_allocated(), 1);
}

/// A block read spanning a page boundary stitches the pages together and
/// zero-fills unallocated gaps.
#[test]
fn block_read_spans_pages() {
    let mut memory = Memory::new();
    let boundary = PAGE_SIZE;
    memory.write(VirtAddr::new(boundary - 1), 0xAA).unwrap();
    memory.write(VirtAddr::new(boundary), 0xBB).unwrap();

    let mut buf = [0u8; 4];
    memory.read_block(VirtAddr::new(boundary - 2), &mut buf);
    assert_eq!(buf, [0x00, 0xAA, 0xBB, 0x00]);
}

/// A block read over fully unallocated memory is all zeros and allocates
/// nothing.
#[test]
fn block_read_of_nothing_is_zeros() {
    let memory = Memory::new();
    let mut buf = [0xFFu8; 64];
    memory.read_block(VirtAddr::new(0x9000), &mut buf);
    assert!(buf.iter().all(|&b| b == 0));
    assert_eq!(memory.pages_allocated(), 0);
}

/// The configured page limit surfaces as a translation fault on the write
/// path; reads stay infallible.
#[test]
fn page_limit_faults_writes_only() {
    let mut memory = Memory::with_page_limit(1);
    memory.write(VirtAddr::new(0), 1).unwrap();

    let err = memory.write(VirtAddr::new(PAGE_SIZE), 2).unwrap_err();
    assert_eq!(
        err,
        Fault::AddressTranslationExhausted { vaddr: PAGE_SIZE }
    );
    assert_eq!(memory.read(VirtAddr::new(PAGE_SIZE)), 0);
}

proptest! {
    /// Any written byte reads back from any address, including ones whose
    /// translation paths share intermediate tables.
    #[test]
    fn written_bytes_read_back(addr in 0u64..1 << 48, value: u8) {
        let mut memory = Memory::new();
        memory.write(VirtAddr::new(addr), value).unwrap();
        prop_assert_eq!(memory.read(VirtAddr::new(addr)), value);
    }

    /// Writes to distinct addresses never clobber each other.
    #[test]
    fn distinct_addresses_are_independent(
        a in 0u64..1 << 48,
        b in 0u64..1 << 48,
        va: u8,
        vb: u8,
    ) {
        prop_assume!(a != b);
        let mut memory = Memory::new();
        memory.write(VirtAddr::new(a), va).unwrap();
        memory.write(VirtAddr::new(b), vb).unwrap();
        prop_assert_eq!(memory.read(VirtAddr::new(a)), va);
        prop_assert_eq!(memory.read(VirtAddr::new(b)), vb);
    }
}
