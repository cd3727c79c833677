//! Program loading and the top-level run loop.

/// Text program parsing and placement in memory.
pub mod loader;
/// The run loop driving the processor to halt.
pub mod simulator;

pub use loader::{parse_program, LoadError};
pub use simulator::Simulator;
