//! Machine fault definitions.
//!
//! This module defines the structured conditions that are fatal to the
//! simulated machine. It provides:
//! 1. **Fault Representation:** One variant per condition, each carrying the
//!    context a caller needs (faulting address, opcode byte, register index).
//! 2. **Propagation Policy:** Every fault transitions the processor to
//!    `Halted`; none is ever masked by a silent default value.
//!
//! Program-loading errors have their own type in [`crate::sim::loader`]
//! because they occur before the machine starts and carry source-line
//! context instead of machine state.

use thiserror::Error;

use super::reg::NUM_REGISTERS;

/// A condition that is fatal to the simulated machine.
///
/// Faults are reported to the caller as structured values; the processor is
/// left in the `Halted` state and executes nothing further.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Fault {
    /// The fetched opcode byte names no operation in the table.
    #[error("invalid opcode {opcode:#04x} at instruction {pc}")]
    InvalidOpcode {
        /// The unrecognized opcode byte.
        opcode: u8,
        /// Program counter of the offending instruction.
        pc: u64,
    },

    /// A `DIV` instruction saw a zero divisor.
    ///
    /// The destination register is left unchanged.
    #[error("division by zero at instruction {pc}")]
    DivisionByZero {
        /// Program counter of the offending instruction.
        pc: u64,
    },

    /// A decoded register field addresses a slot outside the register file.
    #[error("register index {index} out of range (file holds {max} registers)", max = NUM_REGISTERS)]
    RegisterIndexOutOfRange {
        /// The out-of-range register index.
        index: u8,
    },

    /// The translator hit the configured physical-page cap.
    ///
    /// Only raised when `max_pages` is configured; the default lazy policy
    /// never fails.
    #[error("physical page limit reached while translating {vaddr:#x}")]
    AddressTranslationExhausted {
        /// The virtual address whose page could not be allocated.
        vaddr: u64,
    },

    /// A fetch, load, or store computed an address past the top of the
    /// 64-bit address space.
    ///
    /// Reached through a runaway program counter (an indirect jump through
    /// a slot holding a huge word) or a pointer within 8 bytes of the top
    /// of memory; word access never wraps around to address zero.
    #[error("address computation wrapped past the top of memory at instruction {pc}")]
    AddressOutOfRange {
        /// Program counter of the offending instruction.
        pc: u64,
    },

    /// The console failed while servicing `READ_KEYBOARD` or `WRITE_SCREEN`.
    #[error("console error: {message}")]
    Console {
        /// Description of the underlying I/O failure.
        message: String,
    },
}
