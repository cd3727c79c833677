//! Educational computer model library.
//!
//! This crate implements a small register machine with a realistic memory
//! hierarchy:
//! 1. **CPU:** Four-register processor with a fetch/decode/execute cycle,
//!    comparison flags, and a terminal halted state.
//! 2. **Cache:** A configurable multi-level hierarchy (write-through, LRU
//!    per set, demotion on eviction) with hit/miss accounting.
//! 3. **Memory:** Lazily allocated 4 KiB pages behind a four-level
//!    hierarchical address translator.
//! 4. **ISA:** A 64-bit instruction word with arithmetic, logic, data
//!    movement, conditional jumps, and console I/O.
//! 5. **Simulation:** Text program loader, run loop, and statistics
//!    reporting.

/// Multi-level cache hierarchy with LRU eviction and accounting.
pub mod cache;
/// Common types and constants (addresses, registers, faults).
pub mod common;
/// Machine configuration (defaults, hierarchical config structures).
pub mod config;
/// CPU core (registers, flags, fetch/decode/execute).
pub mod cpu;
/// Peripheral devices (console).
pub mod devices;
/// Instruction set (opcodes, encoding, decoding).
pub mod isa;
/// Paged backing memory and address translation.
pub mod mem;
/// Program loader and run loop.
pub mod sim;
/// Run statistics collection and reporting.
pub mod stats;

/// Cache hierarchy; construct with `CacheHierarchy::new` over a `Memory`.
pub use crate::cache::CacheHierarchy;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main CPU type; holds registers, flags, cache, and stats.
pub use crate::cpu::Processor;
/// Paged backing store with lazy allocation.
pub use crate::mem::Memory;
/// Top-level driver; loads a program and runs the machine to halt.
pub use crate::sim::Simulator;
