//! Address translation tests: index extraction, the four-level walk, and
//! the physical page budget.

use pretty_assertions::assert_eq;

use emusim_core::common::{VirtAddr, PAGE_SIZE, TOP_LEVEL_SLOTS};
use emusim_core::mem::AddressTranslator;

/// The four 9-bit indices and the 12-bit offset come out of their
/// documented bit ranges.
#[test]
fn table_indices_extract_bit_fields() {
    // 0x0123_4567_89AB_CDEF:
    //   bits 39-47 = 0x08A, bits 30-38 = 0x19E, bits 21-29 = 0x04D,
    //   bits 12-20 = 0x0BC, offset = 0xDEF.
    let addr = VirtAddr::new(0x0123_4567_89AB_CDEF);
    assert_eq!(addr.table_indices(), [0x08A, 0x19E, 0x04D, 0x0BC]);
    assert_eq!(addr.page_offset(), 0xDEF);
}

/// Addresses one page apart share every index except the innermost.
#[test]
fn adjacent_pages_differ_in_innermost_index() {
    let a = VirtAddr::new(0x4000_0000).table_indices();
    let b = VirtAddr::new(0x4000_0000 + PAGE_SIZE).table_indices();
    assert_eq!(a[..3], b[..3]);
    assert_eq!(u64::from(b[3]), u64::from(a[3]) + 1);
}

/// The top level can address its full 512 fixed slots.
#[test]
fn top_level_slot_space() {
    assert_eq!(TOP_LEVEL_SLOTS, 512);
    let top = VirtAddr::new((TOP_LEVEL_SLOTS as u64 - 1) << 39).table_indices();
    assert_eq!(top[0], 511);
}

/// Translating the same address twice resolves to the same page; no second
/// page is allocated.
#[test]
fn translation_is_deterministic() {
    let mut translator = AddressTranslator::new();
    let addr = VirtAddr::new(0x0123_4567_89AB_CDEF);

    let first = translator.translate(addr).unwrap().index();
    let second = translator.translate(addr).unwrap().index();
    assert_eq!(first, second);
    assert_eq!(translator.pages_allocated(), 1);
}

/// `lookup` never allocates: an untouched path stays untouched.
#[test]
fn lookup_does_not_allocate() {
    let mut translator = AddressTranslator::new();
    assert!(translator.lookup(VirtAddr::new(0xABCD_E000)).is_none());
    assert_eq!(translator.pages_allocated(), 0);

    translator.translate(VirtAddr::new(0xABCD_E000)).unwrap();
    assert!(translator.lookup(VirtAddr::new(0xABCD_E123)).is_some());
}

/// Distinct pages get distinct physical indices, assigned in allocation
/// order.
#[test]
fn pages_get_sequential_indices() {
    let mut translator = AddressTranslator::new();
    let a = translator.translate(VirtAddr::new(0)).unwrap().index();
    let b = translator
        .translate(VirtAddr::new(PAGE_SIZE))
        .unwrap()
        .index();
    assert_eq!(a.val(), 0);
    assert_eq!(b.val(), 1);
}

/// The optional page cap turns the next fresh allocation into a fault;
/// already-resolved pages keep translating.
#[test]
fn page_budget_exhaustion_faults() {
    let mut translator = AddressTranslator::with_page_limit(2);
    translator.translate(VirtAddr::new(0)).unwrap();
    translator.translate(VirtAddr::new(PAGE_SIZE)).unwrap();

    assert!(translator.translate(VirtAddr::new(2 * PAGE_SIZE)).is_err());
    assert!(
        translator.translate(VirtAddr::new(0)).is_ok(),
        "existing pages still resolve"
    );
    assert_eq!(translator.pages_allocated(), 2);
}
