//! Peripheral devices the processor talks to.

/// Console (keyboard and screen) device.
pub mod console;

pub use console::{Console, StdConsole};
