//! The processor core: registers, flags, program counter, and run state.
//!
//! This module defines the machine's execution engine. It provides:
//! 1. **State:** The four-register file, the comparison flags, the program
//!    counter (an instruction index, not a byte address), and the
//!    running/halted state.
//! 2. **Memory Path:** Every fetch, load, and store goes through the owned
//!    [`CacheHierarchy`]; the processor never touches backing memory
//!    directly.
//! 3. **Stepping:** The fetch/decode/execute cycle itself lives in
//!    [`execution`].

/// The fetch/decode/execute cycle.
pub mod execution;

use std::fmt;

use crate::cache::CacheHierarchy;
use crate::common::{Flags, RegisterFile};
use crate::config::{Config, ConfigError};
use crate::devices::Console;
use crate::mem::Memory;
use crate::stats::SimStats;

/// Whether the machine is still willing to execute instructions.
///
/// `Halted` is terminal: it is entered by `HALT` or by any fault, and
/// further step requests are no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// The machine will execute the next instruction on request.
    Running,
    /// The machine has stopped and will not execute again.
    Halted,
}

/// The register machine driving the memory hierarchy.
pub struct Processor {
    pub(crate) regs: RegisterFile,
    pub(crate) pc: u64,
    pub(crate) flags: Flags,
    pub(crate) state: State,
    pub(crate) cache: CacheHierarchy,
    pub(crate) console: Box<dyn Console>,
    pub(crate) stats: SimStats,
}

impl Processor {
    /// Builds a zeroed processor over the hierarchy `config` describes,
    /// wired to `console` for its I/O instructions.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the cache geometry does not validate.
    pub fn new(config: &Config, console: Box<dyn Console>) -> Result<Self, ConfigError> {
        let memory = match config.memory.max_pages {
            Some(cap) => Memory::with_page_limit(cap),
            None => Memory::new(),
        };
        let cache = CacheHierarchy::new(&config.cache, memory)?;
        Ok(Self {
            regs: RegisterFile::new(),
            pc: 0,
            flags: Flags::default(),
            state: State::Running,
            cache,
            console,
            stats: SimStats::default(),
        })
    }

    /// The register file.
    pub fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    /// The current program counter (an instruction index).
    pub fn pc(&self) -> u64 {
        self.pc
    }

    /// The comparison flags as of the last `CMP`.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The current run state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the machine has reached its terminal state.
    pub fn is_halted(&self) -> bool {
        self.state == State::Halted
    }

    /// Stops the machine. Idempotent.
    pub fn halt(&mut self) {
        self.state = State::Halted;
    }

    /// The cache hierarchy all memory traffic flows through.
    pub fn cache(&self) -> &CacheHierarchy {
        &self.cache
    }

    /// Exclusive access to the hierarchy (program loading, tests).
    pub fn cache_mut(&mut self) -> &mut CacheHierarchy {
        &mut self.cache
    }

    /// Run statistics accumulated so far.
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Dumps pc, flags, and all registers to stderr.
    pub fn dump_state(&self) {
        eprintln!(
            "pc = {} | zero={} greater={} less={}",
            self.pc, self.flags.zero, self.flags.greater, self.flags.less
        );
        self.regs.dump();
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("regs", &self.regs)
            .field("pc", &self.pc)
            .field("flags", &self.flags)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
