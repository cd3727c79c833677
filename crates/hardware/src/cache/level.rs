//! One cache level: line storage, set partitioning, and LRU order.
//!
//! A level is a capacity-bounded mapping from line-aligned block addresses
//! to owned [`CacheLine`]s. The level is partitioned into sets at
//! construction; each set tracks its own recency stack (most recently used
//! at the front, victim at the back), so eviction is an explicit operation
//! with an observable result rather than a side effect of a map policy.

use std::collections::HashMap;

use crate::config::{Associativity, CacheLevelConfig};

/// A fixed-size block of bytes owned by exactly one cache level slot.
///
/// Lines are created on demand and default to zero, matching the
/// zero-initialized backing pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheLine {
    data: Box<[u8]>,
}

impl CacheLine {
    /// Creates a zero-filled line of `line_bytes` bytes.
    pub fn zeroed(line_bytes: usize) -> Self {
        Self {
            data: vec![0; line_bytes].into_boxed_slice(),
        }
    }

    /// Reads the byte at `offset` within the line.
    pub fn read(&self, offset: u64) -> u8 {
        self.data[offset as usize]
    }

    /// Writes `value` at `offset` within the line.
    pub fn write(&mut self, offset: u64, value: u8) {
        self.data[offset as usize] = value;
    }

    /// The line contents, for fills from memory.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The line contents, read-only.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

/// One set: its resident lines plus their recency order.
#[derive(Debug, Default)]
struct CacheSet {
    lines: HashMap<u64, CacheLine>,
    /// Block addresses ordered by recency; index 0 is MRU, the back is the
    /// eviction victim.
    recency: Vec<u64>,
}

impl CacheSet {
    /// Moves `block` to the MRU position.
    fn touch(&mut self, block: u64) {
        if let Some(pos) = self.recency.iter().position(|&b| b == block) {
            let _ = self.recency.remove(pos);
        }
        self.recency.insert(0, block);
    }

    /// Removes and returns the least recently used entry.
    fn evict(&mut self) -> Option<(u64, CacheLine)> {
        let victim = self.recency.pop()?;
        let line = self.lines.remove(&victim)?;
        Some((victim, line))
    }
}

/// A capacity-bounded, set-partitioned store of cache lines with strict
/// per-set LRU eviction.
#[derive(Debug)]
pub struct CacheLevel {
    sets: Vec<CacheSet>,
    ways: usize,
    line_bytes: u64,
    capacity_bytes: usize,
}

impl CacheLevel {
    /// Builds a level from its validated configuration and the shared line
    /// size.
    pub fn new(config: &CacheLevelConfig, line_bytes: usize) -> Self {
        let lines = config.capacity_bytes / line_bytes;
        let ways = match config.associativity {
            Associativity::Full => lines,
            Associativity::Ways(n) => n,
        };
        let num_sets = lines / ways;
        let mut sets = Vec::with_capacity(num_sets);
        sets.resize_with(num_sets, CacheSet::default);
        Self {
            sets,
            ways,
            line_bytes: line_bytes as u64,
            capacity_bytes: config.capacity_bytes,
        }
    }

    /// The set a block address maps to.
    fn set_of(&self, block: u64) -> usize {
        ((block / self.line_bytes) as usize) % self.sets.len()
    }

    /// Looks up the line for `block`, refreshing its recency on hit.
    ///
    /// `block` must already be line-aligned; lookups never mask raw byte
    /// addresses themselves.
    pub fn lookup(&mut self, block: u64) -> Option<&mut CacheLine> {
        debug_assert_eq!(block % self.line_bytes, 0, "unaligned block address");
        let set = self.set_of(block);
        let set = &mut self.sets[set];
        if set.lines.contains_key(&block) {
            set.touch(block);
            return set.lines.get_mut(&block);
        }
        None
    }

    /// Whether the line for `block` is resident. Does not disturb recency.
    pub fn contains(&self, block: u64) -> bool {
        let set = self.set_of(block);
        self.sets[set].lines.contains_key(&block)
    }

    /// Installs a line for `block` at the MRU position, evicting the set's
    /// LRU entry first when the set is full.
    ///
    /// Returns the evicted block and line, if any, so the caller can demote
    /// or discard it. The set invariant — never more than `ways` resident
    /// lines — holds on return.
    pub fn insert(&mut self, block: u64, line: CacheLine) -> Option<(u64, CacheLine)> {
        debug_assert_eq!(block % self.line_bytes, 0, "unaligned block address");
        let ways = self.ways;
        let set_index = self.set_of(block);
        let set = &mut self.sets[set_index];

        let evicted = if set.lines.len() >= ways && !set.lines.contains_key(&block) {
            set.evict()
        } else {
            None
        };

        let _ = set.lines.insert(block, line);
        set.touch(block);
        evicted
    }

    /// Number of resident lines across all sets.
    pub fn resident_lines(&self) -> usize {
        self.sets.iter().map(|s| s.lines.len()).sum()
    }

    /// Lines per set (the enforced associativity).
    pub fn ways(&self) -> usize {
        self.ways
    }

    /// Number of sets the level is partitioned into.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Configured capacity in bytes.
    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }
}
