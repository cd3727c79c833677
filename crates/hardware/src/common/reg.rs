//! Register file and comparison flags.
//!
//! The machine carries four signed 64-bit general purpose registers and the
//! three mutually exclusive comparison flags produced by `CMP`. Both are
//! zero-initialized at processor construction and mutated only by processor
//! operations.

use std::cmp::Ordering;

use super::error::Fault;

/// Number of general purpose registers in the file.
pub const NUM_REGISTERS: usize = 4;

/// The four-slot file of signed 64-bit general purpose registers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [i64; NUM_REGISTERS],
}

impl RegisterFile {
    /// Creates a register file with all slots zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the register at `idx`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::RegisterIndexOutOfRange`] when `idx` does not name a
    /// slot; decoded instruction fields are 8 bits wide and are validated
    /// here rather than at decode so that unused fields never fault.
    pub fn read(&self, idx: u8) -> Result<i64, Fault> {
        self.regs
            .get(idx as usize)
            .copied()
            .ok_or(Fault::RegisterIndexOutOfRange { index: idx })
    }

    /// Writes `val` to the register at `idx`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::RegisterIndexOutOfRange`] when `idx` does not name a slot.
    pub fn write(&mut self, idx: u8, val: i64) -> Result<(), Fault> {
        match self.regs.get_mut(idx as usize) {
            Some(slot) => {
                *slot = val;
                Ok(())
            }
            None => Err(Fault::RegisterIndexOutOfRange { index: idx }),
        }
    }

    /// Dumps all registers to stderr, one per line.
    pub fn dump(&self) {
        for (i, val) in self.regs.iter().enumerate() {
            eprintln!("R{i} = {val:<20} ({val:#018x})");
        }
    }
}

/// The comparison flags set by `CMP` and consumed by conditional jumps.
///
/// Exactly one flag is true after any comparison; all three start false and
/// no other operation touches them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    /// The compared registers were equal.
    pub zero: bool,
    /// The first register was greater (signed).
    pub greater: bool,
    /// The first register was smaller (signed).
    pub less: bool,
}

impl Flags {
    /// Sets the flags from a signed comparison of `lhs` and `rhs`.
    pub fn set_from_cmp(&mut self, lhs: i64, rhs: i64) {
        *self = match lhs.cmp(&rhs) {
            Ordering::Equal => Self {
                zero: true,
                greater: false,
                less: false,
            },
            Ordering::Greater => Self {
                zero: false,
                greater: true,
                less: false,
            },
            Ordering::Less => Self {
                zero: false,
                greater: false,
                less: true,
            },
        };
    }
}
