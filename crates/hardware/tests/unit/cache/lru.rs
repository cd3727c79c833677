//! Cache level tests: strict per-set LRU and set-associative placement.
//!
//! Levels are constructed directly from their config; no hierarchy or
//! backing memory is involved.

use emusim_core::cache::{CacheLevel, CacheLine};
use emusim_core::config::{Associativity, CacheLevelConfig};

const LINE: usize = 64;

fn level(capacity_bytes: usize, associativity: Associativity) -> CacheLevel {
    CacheLevel::new(
        &CacheLevelConfig {
            capacity_bytes,
            associativity,
        },
        LINE,
    )
}

fn line() -> CacheLine {
    CacheLine::zeroed(LINE)
}

// ──────────────────────────────────────────────────────────
// Strict LRU within one set
// ──────────────────────────────────────────────────────────

/// Inserting past capacity evicts the least recently used block.
#[test]
fn insert_past_capacity_evicts_lru() {
    let mut level = level(2 * 64, Associativity::Full);

    assert!(level.insert(0, line()).is_none());
    assert!(level.insert(64, line()).is_none());

    let evicted = level.insert(128, line());
    assert_eq!(evicted.map(|(block, _)| block), Some(0));
    assert!(!level.contains(0));
    assert!(level.contains(64));
    assert!(level.contains(128));
}

/// A lookup refreshes recency, changing which block is the victim.
#[test]
fn lookup_refreshes_recency() {
    let mut level = level(2 * 64, Associativity::Full);
    level.insert(0, line());
    level.insert(64, line());

    assert!(level.lookup(0).is_some());

    let evicted = level.insert(128, line());
    assert_eq!(evicted.map(|(block, _)| block), Some(64), "0 was refreshed");
}

/// `contains` is a pure query: it must not disturb the victim choice.
#[test]
fn contains_does_not_touch_recency() {
    let mut level = level(2 * 64, Associativity::Full);
    level.insert(0, line());
    level.insert(64, line());

    assert!(level.contains(0));

    let evicted = level.insert(128, line());
    assert_eq!(evicted.map(|(block, _)| block), Some(0));
}

/// Re-inserting a resident block replaces it in place with no eviction.
#[test]
fn reinsert_resident_block_evicts_nothing() {
    let mut level = level(2 * 64, Associativity::Full);
    level.insert(0, line());
    level.insert(64, line());

    assert!(level.insert(0, line()).is_none());
    assert_eq!(level.resident_lines(), 2);
}

// ──────────────────────────────────────────────────────────
// Set-associative placement
// ──────────────────────────────────────────────────────────

/// With 1-way sets, conflicting blocks evict within their set while other
/// sets stay untouched.
#[test]
fn conflict_evicts_within_set_only() {
    // 4 direct-mapped sets: block 0 and block 256 both map to set 0.
    let mut level = level(4 * 64, Associativity::Ways(1));
    level.insert(0, line());
    level.insert(64, line());

    let evicted = level.insert(256, line());
    assert_eq!(evicted.map(|(block, _)| block), Some(0));
    assert!(level.contains(64), "set 1 was not involved");
}

/// Geometry accessors reflect the configured partitioning.
#[test]
fn geometry_from_config() {
    let level = level(8 * 64, Associativity::Ways(2));
    assert_eq!(level.ways(), 2);
    assert_eq!(level.num_sets(), 4);
    assert_eq!(level.capacity_bytes(), 8 * 64);
}

/// Full associativity is a single set spanning every line.
#[test]
fn full_associativity_is_one_set() {
    let level = level(8 * 64, Associativity::Full);
    assert_eq!(level.num_sets(), 1);
    assert_eq!(level.ways(), 8);
}
