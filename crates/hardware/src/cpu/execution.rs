//! The fetch/decode/execute cycle.
//!
//! One [`Processor::step`] call retires at most one instruction:
//! 1. **Fetch:** Read the 8-byte little-endian word at `pc *
//!    INSTRUCTION_BYTES` through the cache, so instruction fetch
//!    participates in hit/miss accounting like any data access. A program
//!    counter whose byte address does not fit in 64 bits faults instead of
//!    wrapping.
//! 2. **Decode:** Unpack the word; an unknown opcode faults.
//! 3. **Execute:** Perform the operation. The program counter advances by
//!    one instruction unless a jump was taken or the machine halted.
//!
//! Any fault transitions the machine to `Halted` before the error is
//! returned; a halted machine steps as a no-op.

use tracing::trace;

use crate::common::{Fault, VirtAddr, INSTRUCTION_BYTES};
use crate::cpu::{Processor, State};
use crate::isa::{Instruction, Opcode};

impl Processor {
    /// Executes one instruction and reports the resulting run state.
    ///
    /// # Errors
    ///
    /// Returns the [`Fault`] that stopped the machine; the processor is
    /// left `Halted` with all other state as it was at the fault point.
    pub fn step(&mut self) -> Result<State, Fault> {
        if self.state == State::Halted {
            return Ok(State::Halted);
        }

        let result = self.fetch_and_execute();
        match result {
            Ok(()) => {
                self.stats.instructions_retired += 1;
                Ok(self.state)
            }
            Err(fault) => {
                self.state = State::Halted;
                Err(fault)
            }
        }
    }

    fn fetch_and_execute(&mut self) -> Result<(), Fault> {
        let base = self
            .pc
            .checked_mul(INSTRUCTION_BYTES)
            .ok_or(Fault::AddressOutOfRange { pc: self.pc })?;
        let word = self.read_word(base)?;
        let instr = Instruction::decode(word, self.pc)?;
        trace!(pc = self.pc, ?instr, "executing");
        self.execute(&instr)
    }

    /// Dispatches one decoded instruction.
    ///
    /// Arms that redirect control flow (taken jumps, `HALT`) return early;
    /// every other path falls through to the `pc + 1` advance at the end.
    fn execute(&mut self, instr: &Instruction) -> Result<(), Fault> {
        match instr.opcode {
            Opcode::Add => self.binary_op(instr, i64::wrapping_add)?,
            Opcode::Sub => self.binary_op(instr, i64::wrapping_sub)?,
            Opcode::Mul => self.binary_op(instr, i64::wrapping_mul)?,
            Opcode::Div => {
                let lhs = self.regs.read(instr.src1)?;
                let rhs = self.regs.read(instr.src2)?;
                if rhs == 0 {
                    return Err(Fault::DivisionByZero { pc: self.pc });
                }
                self.regs.write(instr.dest, lhs.wrapping_div(rhs))?;
            }
            Opcode::And => self.binary_op(instr, |a, b| a & b)?,
            Opcode::Or => self.binary_op(instr, |a, b| a | b)?,
            Opcode::Not => {
                let val = self.regs.read(instr.src1)?;
                self.regs.write(instr.dest, !val)?;
            }
            Opcode::Xor => self.binary_op(instr, |a, b| a ^ b)?,
            Opcode::MovImm => {
                self.regs.write(instr.dest, instr.imm())?;
            }
            Opcode::MovReg => {
                let val = self.regs.read(instr.src1)?;
                self.regs.write(instr.dest, val)?;
            }
            Opcode::Load => {
                let addr = self.data_address(instr)?;
                let word = self.read_word(addr)?;
                self.regs.write(instr.dest, word as i64)?;
            }
            Opcode::Store => {
                let addr = self.data_address(instr)?;
                let val = self.regs.read(instr.src1)?;
                self.write_word(addr, val as u64)?;
            }
            Opcode::Jmp => {
                self.pc = self.jump_target(instr)?;
                return Ok(());
            }
            Opcode::Je => {
                if self.flags.zero {
                    self.pc = self.jump_target(instr)?;
                    return Ok(());
                }
            }
            Opcode::Jne => {
                if !self.flags.zero {
                    self.pc = self.jump_target(instr)?;
                    return Ok(());
                }
            }
            Opcode::Jge => {
                if self.flags.zero || self.flags.greater {
                    self.pc = self.jump_target(instr)?;
                    return Ok(());
                }
            }
            Opcode::Jl => {
                if self.flags.less {
                    self.pc = self.jump_target(instr)?;
                    return Ok(());
                }
            }
            Opcode::Cmp => {
                let lhs = self.regs.read(instr.src1)?;
                let rhs = self.regs.read(instr.src2)?;
                self.flags.set_from_cmp(lhs, rhs);
            }
            Opcode::ReadKeyboard => {
                let ch = self.console.read_char()?;
                self.regs.write(instr.dest, ch)?;
            }
            Opcode::WriteScreen => {
                let val = self.regs.read(instr.src1)?;
                self.console.write_char(val)?;
            }
            Opcode::Halt => {
                self.state = State::Halted;
                return Ok(());
            }
        }

        self.pc += 1;
        Ok(())
    }

    /// `dest = op(src1, src2)` for the two-source arithmetic and logic
    /// instructions.
    fn binary_op(
        &mut self,
        instr: &Instruction,
        op: impl Fn(i64, i64) -> i64,
    ) -> Result<(), Fault> {
        let lhs = self.regs.read(instr.src1)?;
        let rhs = self.regs.read(instr.src2)?;
        self.regs.write(instr.dest, op(lhs, rhs))
    }

    /// The effective data address of a `LOAD`/`STORE`.
    ///
    /// Direct instructions use the payload itself; indirect ones read the
    /// word at the payload address and use its value. Indirection resolves
    /// exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when the indirect pointer word
    /// cannot be read without wrapping.
    fn data_address(&mut self, instr: &Instruction) -> Result<u64, Fault> {
        if instr.indirect() {
            self.read_word(instr.target())
        } else {
            Ok(instr.target())
        }
    }

    /// The destination instruction index of a jump.
    ///
    /// Direct jumps target the payload; indirect jumps read the word stored
    /// at instruction slot `payload` and jump to its value.
    fn jump_target(&mut self, instr: &Instruction) -> Result<u64, Fault> {
        if instr.indirect() {
            self.read_word(instr.target() * INSTRUCTION_BYTES)
        } else {
            Ok(instr.target())
        }
    }

    /// Reads the 8-byte little-endian word at byte address `addr` through
    /// the cache.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when the word would extend
    /// past the top of the address space; access never wraps to zero.
    pub(crate) fn read_word(&mut self, addr: u64) -> Result<u64, Fault> {
        self.check_word_range(addr)?;
        let mut bytes = [0u8; INSTRUCTION_BYTES as usize];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.cache.read(VirtAddr::new(addr + i as u64));
        }
        Ok(u64::from_le_bytes(bytes))
    }

    /// Writes `value` as an 8-byte little-endian word at byte address
    /// `addr` through the cache.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when the word would wrap, or
    /// [`Fault::AddressTranslationExhausted`] when the backing store is
    /// out of pages.
    pub(crate) fn write_word(&mut self, addr: u64, value: u64) -> Result<(), Fault> {
        self.check_word_range(addr)?;
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.cache.write(VirtAddr::new(addr + i as u64), byte)?;
        }
        Ok(())
    }

    /// Rejects word accesses whose last byte falls outside the 64-bit
    /// address space.
    fn check_word_range(&self, addr: u64) -> Result<(), Fault> {
        if addr.checked_add(INSTRUCTION_BYTES - 1).is_none() {
            return Err(Fault::AddressOutOfRange { pc: self.pc });
        }
        Ok(())
    }
}
