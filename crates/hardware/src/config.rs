//! Configuration for the machine model.
//!
//! This module defines the construction-time parameters of the machine. It
//! provides:
//! 1. **Defaults:** The canonical three-level hierarchy (32 KiB / 512 KiB /
//!    32 MiB, 64-byte lines) as documented constants.
//! 2. **Structures:** Hierarchical config for general run behavior, the
//!    cache hierarchy, and the memory page budget.
//! 3. **Validation:** Geometry checks that reject configurations the cache
//!    cannot partition into sets.
//!
//! Configuration is supplied as JSON (the CLI deserializes a file with
//! `serde_json`) or built in code; `Config::default()` gives the canonical
//! machine. All values are immutable once the hierarchy is constructed.

use serde::Deserialize;
use thiserror::Error;

/// Default configuration constants.
mod defaults {
    /// L1 capacity in bytes (32 KiB).
    pub const L1_CAPACITY: usize = 32 * 1024;

    /// L2 capacity in bytes (512 KiB).
    pub const L2_CAPACITY: usize = 512 * 1024;

    /// L3 capacity in bytes (32 MiB).
    pub const L3_CAPACITY: usize = 32 * 1024 * 1024;

    /// L1 associativity (4-way).
    pub const L1_WAYS: usize = 4;

    /// L2 associativity (8-way).
    pub const L2_WAYS: usize = 8;

    /// L3 associativity (16-way).
    pub const L3_WAYS: usize = 16;

    /// Line size shared by all levels (64 bytes).
    pub const LINE_BYTES: usize = 64;
}

/// Errors produced by [`Config::validate`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The hierarchy was configured with no levels at all.
    #[error("cache hierarchy needs at least one level")]
    NoLevels,

    /// The line size is zero or not a power of two.
    #[error("line size {0} is not a power of two")]
    BadLineSize(usize),

    /// A level's capacity does not divide into whole sets of whole lines.
    #[error("level {level}: capacity {capacity} does not partition into {ways}-way sets of {line}-byte lines")]
    BadGeometry {
        /// Zero-based level index.
        level: usize,
        /// Configured capacity in bytes.
        capacity: usize,
        /// Configured ways per set.
        ways: usize,
        /// Shared line size in bytes.
        line: usize,
    },
}

/// Set partitioning of one cache level.
///
/// `Full` places every line in a single set (any line may hold any block);
/// `Ways(n)` partitions the level into `capacity / (line * n)` sets of `n`
/// lines each. LRU order is tracked per set in both cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum Associativity {
    /// Fully associative: one set spanning the whole level.
    #[default]
    Full,
    /// N-way set associative.
    Ways(usize),
}

/// Construction-time parameters of one cache level.
#[derive(Clone, Debug, Deserialize)]
pub struct CacheLevelConfig {
    /// Level capacity in bytes.
    pub capacity_bytes: usize,
    /// Set partitioning for this level.
    #[serde(default)]
    pub associativity: Associativity,
}

/// Construction-time parameters of the whole hierarchy.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Line size in bytes, shared by every level.
    pub line_bytes: usize,
    /// Levels in order, L1 first.
    pub levels: Vec<CacheLevelConfig>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            line_bytes: defaults::LINE_BYTES,
            levels: vec![
                CacheLevelConfig {
                    capacity_bytes: defaults::L1_CAPACITY,
                    associativity: Associativity::Ways(defaults::L1_WAYS),
                },
                CacheLevelConfig {
                    capacity_bytes: defaults::L2_CAPACITY,
                    associativity: Associativity::Ways(defaults::L2_WAYS),
                },
                CacheLevelConfig {
                    capacity_bytes: defaults::L3_CAPACITY,
                    associativity: Associativity::Ways(defaults::L3_WAYS),
                },
            ],
        }
    }
}

/// Backing-memory parameters.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Optional cap on physical pages; `None` means the lazy allocator
    /// never fails.
    pub max_pages: Option<u64>,
}

/// Run-loop parameters.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Dump processor state after every retired instruction.
    pub trace_instructions: bool,
    /// Optional per-instruction delay in milliseconds (execution pacing).
    pub pace_millis: Option<u64>,
}

/// Root configuration type.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run-loop behavior.
    pub general: GeneralConfig,
    /// Cache hierarchy geometry.
    pub cache: CacheConfig,
    /// Backing-memory limits.
    pub memory: MemoryConfig,
}

impl CacheConfig {
    /// Checks that every level partitions cleanly into sets.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if self.line_bytes == 0 || !self.line_bytes.is_power_of_two() {
            return Err(ConfigError::BadLineSize(self.line_bytes));
        }
        for (i, level) in self.levels.iter().enumerate() {
            let lines = level.capacity_bytes / self.line_bytes;
            let ways = match level.associativity {
                Associativity::Full => lines,
                Associativity::Ways(n) => n,
            };
            let whole_lines = level.capacity_bytes % self.line_bytes == 0;
            let whole_sets = ways != 0 && lines != 0 && lines % ways == 0;
            if !whole_lines || !whole_sets {
                return Err(ConfigError::BadGeometry {
                    level: i,
                    capacity: level.capacity_bytes,
                    ways,
                    line: self.line_bytes,
                });
            }
        }
        Ok(())
    }
}

impl Config {
    /// Parses a configuration from a JSON document; omitted fields take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] for malformed input.
    /// The result is syntactically valid but not yet geometry-checked;
    /// call [`Config::validate`] before building a machine from it.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Validates the whole configuration.
    ///
    /// # Errors
    ///
    /// Currently only cache geometry can be invalid; see
    /// [`CacheConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()
    }
}
