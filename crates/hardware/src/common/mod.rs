//! Common types and constants shared across the machine model.
//!
//! This module gathers the pieces every other component leans on:
//! 1. **Addresses:** Strong types for virtual addresses and physical page indices.
//! 2. **Constants:** Page geometry, translation field layout, instruction width.
//! 3. **Registers:** The four-slot register file and the comparison flags.
//! 4. **Faults:** The structured fault taxonomy that halts the machine.

/// Virtual address and physical page index types.
pub mod addr;
/// Page geometry, translation layout, and instruction width constants.
pub mod constants;
/// The machine fault taxonomy.
pub mod error;
/// Register file and comparison flags.
pub mod reg;

pub use addr::{PhysPageIndex, VirtAddr};
pub use constants::{
    INSTRUCTION_BYTES, LEVEL_INDEX_MASK, PAGE_OFFSET_MASK, PAGE_SHIFT, PAGE_SIZE, TOP_LEVEL_SLOTS,
};
pub use error::Fault;
pub use reg::{Flags, RegisterFile, NUM_REGISTERS};
