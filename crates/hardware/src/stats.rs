//! Simulation statistics collection and reporting.
//!
//! This module tracks what the machine did during a run. It provides:
//! 1. **Cache accounting:** Hit/miss counters, per level and aggregate, with
//!    the derived hit percentage.
//! 2. **Run accounting:** Retired instruction count and wall-clock time.
//! 3. **Reporting:** A plain-text table printed at the end of a run.

use std::time::Instant;

/// Hit/miss counters for one accounting scope (a level, or the whole
/// hierarchy).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// Accesses satisfied by this scope.
    pub hits: u64,
    /// Accesses this scope could not satisfy.
    pub misses: u64,
}

impl CacheCounters {
    /// Total accesses seen by this scope.
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// `100 * hits / (hits + misses)`, or `0.0` before any access.
    pub fn hit_percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Cache accounting for the whole hierarchy.
///
/// The aggregate counters record one hit or one miss per access; the
/// per-level counters record the probes each level saw (a hit at L2 counts
/// a miss at L1 and a hit at L2).
#[derive(Clone, Debug, Default)]
pub struct CacheStats {
    /// One hit or miss per hierarchy access.
    pub totals: CacheCounters,
    /// Probe outcomes per level, L1 first.
    pub per_level: Vec<CacheCounters>,
}

impl CacheStats {
    /// Creates accounting for `levels` cache levels.
    pub fn new(levels: usize) -> Self {
        Self {
            totals: CacheCounters::default(),
            per_level: vec![CacheCounters::default(); levels],
        }
    }

    /// Records an access served by `level`; earlier levels each count a
    /// probe miss.
    pub fn record_hit(&mut self, level: usize) {
        self.totals.hits += 1;
        for counters in &mut self.per_level[..level] {
            counters.misses += 1;
        }
        self.per_level[level].hits += 1;
    }

    /// Records an access no level could serve.
    pub fn record_miss(&mut self) {
        self.totals.misses += 1;
        for counters in &mut self.per_level {
            counters.misses += 1;
        }
    }
}

/// Statistics for one machine run.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Instructions executed to completion.
    pub instructions_retired: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            instructions_retired: 0,
        }
    }
}

impl SimStats {
    /// Prints the end-of-run report to stdout.
    pub fn print(&self, cache: &CacheStats) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        println!("\n==========================================================");
        println!("MACHINE RUN STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("instructions_retired     {}", self.instructions_retired);
        println!("----------------------------------------------------------");
        println!("CACHE HIERARCHY");
        for (i, counters) in cache.per_level.iter().enumerate() {
            println!(
                "  L{:<5} probes: {:<10} | hits: {:<10} | hit_rate: {:.2}%",
                i + 1,
                counters.total(),
                counters.hits,
                counters.hit_percentage()
            );
        }
        println!(
            "  total  accesses: {:<8} | hits: {:<10} | hit_rate: {:.2}%",
            cache.totals.total(),
            cache.totals.hits,
            cache.totals.hit_percentage()
        );
        println!("==========================================================");
    }
}
