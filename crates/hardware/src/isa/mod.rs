//! Instruction set: opcodes, encoding, and decoding.
//!
//! This module defines the machine's single canonical instruction format, a
//! 64-bit word laid out as:
//!
//! ```text
//! 63      56 55      48 47      40 39      32 31               0
//! +---------+----------+----------+----------+-----------------+
//! | opcode  |   dest   |   src1   |   src2   |     payload     |
//! +---------+----------+----------+----------+-----------------+
//! ```
//!
//! The payload is reinterpreted per opcode: a sign-extended immediate for
//! `MOV`-immediate, a data address for `LOAD`/`STORE`, a target instruction
//! index for jumps, unused otherwise. For jumps, loads, and stores the
//! `src2` field doubles as the indirection flag (nonzero = indirect).
//!
//! Register fields are validated at use, not at decode, so an instruction
//! with garbage in a field it never reads still executes.

use crate::common::Fault;

/// Bit position of the opcode field.
const OPCODE_SHIFT: u64 = 56;
/// Bit position of the destination register field.
const DEST_SHIFT: u64 = 48;
/// Bit position of the first source register field.
const SRC1_SHIFT: u64 = 40;
/// Bit position of the second source register field.
const SRC2_SHIFT: u64 = 32;
/// Mask for one 8-bit register/opcode field.
const FIELD_MASK: u64 = 0xFF;
/// Mask for the 32-bit payload.
const PAYLOAD_MASK: u64 = 0xFFFF_FFFF;

/// The operation table.
///
/// Discriminants are the on-the-wire opcode bytes; zero is deliberately
/// unassigned so an all-zero word decodes as invalid rather than as a
/// silent no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// `dest = src1 + src2` (wrapping).
    Add = 0x01,
    /// `dest = src1 - src2` (wrapping).
    Sub = 0x02,
    /// `dest = src1 * src2` (wrapping).
    Mul = 0x03,
    /// `dest = src1 / src2`; zero divisor is a fatal fault.
    Div = 0x04,
    /// `dest = src1 & src2`.
    And = 0x05,
    /// `dest = src1 | src2`.
    Or = 0x06,
    /// `dest = !src1`.
    Not = 0x07,
    /// `dest = src1 ^ src2`.
    Xor = 0x08,
    /// `dest = payload` (sign-extended from 32 bits).
    MovImm = 0x09,
    /// `dest = src1`.
    MovReg = 0x0A,
    /// `dest = the 8-byte word at payload` (optionally indirect).
    Load = 0x0B,
    /// Stores all 8 bytes of `src1` at payload (optionally indirect).
    Store = 0x0C,
    /// `pc = payload` (optionally indirect); no auto-advance.
    Jmp = 0x0D,
    /// Branch when the zero flag is set.
    Je = 0x0E,
    /// Branch when the zero flag is clear.
    Jne = 0x0F,
    /// Branch when zero or greater is set.
    Jge = 0x10,
    /// Branch when the less flag is set.
    Jl = 0x11,
    /// Signed comparison of `src1` and `src2`; sets exactly one flag.
    Cmp = 0x12,
    /// Blocks for one console character; stores its code point in `dest`.
    ReadKeyboard = 0x13,
    /// Writes `src1` as one character to the console.
    WriteScreen = 0x14,
    /// Transitions the machine to the terminal `Halted` state.
    Halt = 0x15,
}

impl Opcode {
    /// Maps an opcode byte back to the table entry.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x01 => Self::Add,
            0x02 => Self::Sub,
            0x03 => Self::Mul,
            0x04 => Self::Div,
            0x05 => Self::And,
            0x06 => Self::Or,
            0x07 => Self::Not,
            0x08 => Self::Xor,
            0x09 => Self::MovImm,
            0x0A => Self::MovReg,
            0x0B => Self::Load,
            0x0C => Self::Store,
            0x0D => Self::Jmp,
            0x0E => Self::Je,
            0x0F => Self::Jne,
            0x10 => Self::Jge,
            0x11 => Self::Jl,
            0x12 => Self::Cmp,
            0x13 => Self::ReadKeyboard,
            0x14 => Self::WriteScreen,
            0x15 => Self::Halt,
            _ => return None,
        })
    }
}

/// One decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Destination register field.
    pub dest: u8,
    /// First source register field.
    pub src1: u8,
    /// Second source register field; indirection flag for jumps and
    /// memory transfers.
    pub src2: u8,
    /// Immediate / address / target payload.
    pub payload: u32,
}

impl Instruction {
    /// Builds an instruction from raw fields.
    pub fn new(opcode: Opcode, dest: u8, src1: u8, src2: u8, payload: u32) -> Self {
        Self {
            opcode,
            dest,
            src1,
            src2,
            payload,
        }
    }

    /// A three-register operation (`dest = src1 op src2`).
    pub fn reg3(opcode: Opcode, dest: u8, src1: u8, src2: u8) -> Self {
        Self::new(opcode, dest, src1, src2, 0)
    }

    /// `MOV dest, imm`.
    pub fn mov_imm(dest: u8, imm: i32) -> Self {
        Self::new(Opcode::MovImm, dest, 0, 0, imm as u32)
    }

    /// A jump to `target` (an instruction index).
    pub fn jump(opcode: Opcode, target: u32, indirect: bool) -> Self {
        Self::new(opcode, 0, 0, u8::from(indirect), target)
    }

    /// `LOAD dest, [addr]`.
    pub fn load(dest: u8, addr: u32, indirect: bool) -> Self {
        Self::new(Opcode::Load, dest, 0, u8::from(indirect), addr)
    }

    /// `STORE src, [addr]`.
    pub fn store(src: u8, addr: u32, indirect: bool) -> Self {
        Self::new(Opcode::Store, 0, src, u8::from(indirect), addr)
    }

    /// Packs the instruction into its 64-bit wire form.
    pub fn encode(&self) -> u64 {
        ((self.opcode as u64) << OPCODE_SHIFT)
            | ((self.dest as u64) << DEST_SHIFT)
            | ((self.src1 as u64) << SRC1_SHIFT)
            | ((self.src2 as u64) << SRC2_SHIFT)
            | (self.payload as u64)
    }

    /// Unpacks a fetched 64-bit word.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::InvalidOpcode`] (with the fetching `pc` for
    /// context) when the opcode byte names no operation.
    pub fn decode(word: u64, pc: u64) -> Result<Self, Fault> {
        let opcode_byte = ((word >> OPCODE_SHIFT) & FIELD_MASK) as u8;
        let opcode = Opcode::from_byte(opcode_byte).ok_or(Fault::InvalidOpcode {
            opcode: opcode_byte,
            pc,
        })?;
        Ok(Self {
            opcode,
            dest: ((word >> DEST_SHIFT) & FIELD_MASK) as u8,
            src1: ((word >> SRC1_SHIFT) & FIELD_MASK) as u8,
            src2: ((word >> SRC2_SHIFT) & FIELD_MASK) as u8,
            payload: (word & PAYLOAD_MASK) as u32,
        })
    }

    /// The payload as a sign-extended immediate.
    pub fn imm(&self) -> i64 {
        i64::from(self.payload as i32)
    }

    /// The payload as an address or target index.
    pub fn target(&self) -> u64 {
        u64::from(self.payload)
    }

    /// The indirection flag carried in `src2` (jumps, loads, stores).
    pub fn indirect(&self) -> bool {
        self.src2 != 0
    }
}
