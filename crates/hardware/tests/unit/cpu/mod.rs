//! Processor core unit tests.

/// Comparison flag exclusivity and the conditional jumps.
pub mod flags;
