//! # Unit Components
//!
//! This module is the hub for the per-component unit tests. Each submodule
//! exercises one piece of the machine in isolation, constructing only the
//! state it needs.

/// Unit tests for the cache hierarchy.
///
/// This module aggregates tests for:
/// - Hit/miss behavior, write-through, and demotion across levels.
/// - Strict per-set LRU ordering and set-associative placement.
pub mod cache;

/// Unit tests for configuration defaults and geometry validation.
pub mod config;

/// Unit tests for the processor core.
///
/// This module aggregates tests for:
/// - The fetch/decode/execute cycle and every operation in the table.
/// - Comparison flag exclusivity and conditional jumps.
pub mod cpu;


/// Unit tests for paged memory and the four-level address translator.
pub mod mem;
