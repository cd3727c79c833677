//! Multi-level cache hierarchy with LRU eviction and hit/miss accounting.
//!
//! This module implements the configurable cache the processor routes every
//! memory access through. It provides:
//! 1. **Levels:** An ordered sequence of [`CacheLevel`]s, L1 fastest and
//!    smallest, each set-partitioned with strict per-set LRU.
//! 2. **Fall-through:** Reads and writes probe levels in order and fall
//!    through to backing [`Memory`] on a full miss.
//! 3. **Accounting:** One hit or miss per access, plus per-level probe
//!    counters.
//!
//! Policy decisions, stated once here and relied on everywhere:
//! - **Write-through on hit and miss.** Backing memory is updated on every
//!   write, so no level ever holds the only copy of a byte and dropped
//!   lines lose nothing.
//! - **Demotion on eviction.** A victim evicted from level k is installed
//!   in level k+1; eviction from the last level discards the line. This is
//!   how outer levels are populated.
//! - **No promotion.** A hit at L2 or L3 serves the byte where it lies and
//!   refreshes recency there only.
//! - **Line identity** is the address masked to the line boundary; raw byte
//!   addresses are never used as keys.

/// Cache line and level structures.
pub mod level;

pub use level::{CacheLevel, CacheLine};

use tracing::trace;

use crate::common::{Fault, VirtAddr};
use crate::config::{CacheConfig, ConfigError};
use crate::mem::Memory;
use crate::stats::{CacheCounters, CacheStats};

/// The ordered cache levels plus the backing memory they fall through to.
///
/// Geometry (level count, capacities, associativity, line size) is fixed at
/// construction and immutable afterwards.
#[derive(Debug)]
pub struct CacheHierarchy {
    levels: Vec<CacheLevel>,
    line_bytes: u64,
    memory: Memory,
    stats: CacheStats,
}

impl CacheHierarchy {
    /// Builds the hierarchy described by `config` in front of `memory`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the geometry does not validate.
    pub fn new(config: &CacheConfig, memory: Memory) -> Result<Self, ConfigError> {
        config.validate()?;
        let levels = config
            .levels
            .iter()
            .map(|lc| CacheLevel::new(lc, config.line_bytes))
            .collect::<Vec<_>>();
        let stats = CacheStats::new(levels.len());
        Ok(Self {
            levels,
            line_bytes: config.line_bytes as u64,
            memory,
            stats,
        })
    }

    /// The line-aligned base of the block containing `addr`.
    #[inline]
    fn block_of(&self, addr: VirtAddr) -> u64 {
        addr.val() & !(self.line_bytes - 1)
    }

    /// Reads the byte at `addr` through the hierarchy.
    ///
    /// On a hit the serving level's recency is refreshed. On a full miss the
    /// containing line is filled from memory, installed in L1 (with
    /// demotion of any victim), and the byte served from the fresh line.
    pub fn read(&mut self, addr: VirtAddr) -> u8 {
        let block = self.block_of(addr);
        let offset = addr.val() - block;

        let Self { levels, stats, .. } = self;
        for (i, level) in levels.iter_mut().enumerate() {
            if let Some(line) = level.lookup(block) {
                stats.record_hit(i);
                return line.read(offset);
            }
        }

        self.stats.record_miss();
        let mut line = CacheLine::zeroed(self.line_bytes as usize);
        self.memory.read_block(VirtAddr::new(block), line.bytes_mut());
        let value = line.read(offset);
        self.install(block, line);
        value
    }

    /// Writes the byte at `addr` through the hierarchy.
    ///
    /// Write-through: backing memory is updated first on every path. On a
    /// hit the resident line's byte is updated in place; on a miss the
    /// containing line is filled from (already updated) memory and
    /// installed in L1.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressTranslationExhausted`] when the backing
    /// store cannot allocate the page; the cache is left untouched.
    pub fn write(&mut self, addr: VirtAddr, value: u8) -> Result<(), Fault> {
        let block = self.block_of(addr);
        let offset = addr.val() - block;

        self.memory.write(addr, value)?;

        let Self { levels, stats, .. } = self;
        for (i, level) in levels.iter_mut().enumerate() {
            if let Some(line) = level.lookup(block) {
                line.write(offset, value);
                stats.record_hit(i);
                return Ok(());
            }
        }

        self.stats.record_miss();
        let mut line = CacheLine::zeroed(self.line_bytes as usize);
        self.memory.read_block(VirtAddr::new(block), line.bytes_mut());
        self.install(block, line);
        Ok(())
    }

    /// Installs a line in L1, demoting evicted victims level by level.
    fn install(&mut self, block: u64, line: CacheLine) {
        let mut evicted = self.levels[0].insert(block, line);
        let mut level = 1;
        while let Some((victim_block, victim_line)) = evicted {
            if level >= self.levels.len() {
                trace!(block = victim_block, "line discarded past last level");
                break;
            }
            trace!(block = victim_block, to_level = level + 1, "line demoted");
            evicted = self.levels[level].insert(victim_block, victim_line);
            level += 1;
        }
    }

    /// Whether any level currently holds the line containing `addr`.
    pub fn contains(&self, addr: VirtAddr) -> bool {
        let block = self.block_of(addr);
        self.levels.iter().any(|l| l.contains(block))
    }

    /// Accesses satisfied by some level.
    pub fn hit_count(&self) -> u64 {
        self.stats.totals.hits
    }

    /// Accesses no level could satisfy.
    pub fn miss_count(&self) -> u64 {
        self.stats.totals.misses
    }

    /// Aggregate hit percentage; `0.0` before any access.
    pub fn hit_percentage(&self) -> f64 {
        self.stats.totals.hit_percentage()
    }

    /// Per-level probe counters, L1 first.
    pub fn level_counters(&self) -> &[CacheCounters] {
        &self.stats.per_level
    }

    /// Full accounting snapshot for the end-of-run report.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The configured line size in bytes.
    pub fn line_bytes(&self) -> u64 {
        self.line_bytes
    }

    /// The configured levels, L1 first.
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Shared access to the backing memory.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Exclusive access to the backing memory (used by the loader to place
    /// a program before the run starts).
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }
}
