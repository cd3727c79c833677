//! Text program format: parsing and error reporting.
//!
//! Programs are plain text, one instruction per line:
//!
//! ```text
//! ; compute 10 + 5 and print the result's low byte
//! MOV  R0, 10
//! MOV  R1, 5
//! ADD  R2, R0, R1
//! WRITE_SCREEN R2
//! HALT
//! ```
//!
//! Rules:
//! - Mnemonics and register names are case-insensitive; registers are
//!   `R0`..`R3`, the `R` prefix optional (`ADD 2 0 1` works).
//! - `MOV`'s second operand is a register when `R`-prefixed and an
//!   immediate otherwise, so both forms of the move are reachable.
//! - Operands are separated by whitespace and/or commas.
//! - Everything after `;` is a comment; blank lines are skipped.
//! - Numbers are decimal or `0x`-prefixed hex. `MOV` immediates may be
//!   negative.
//! - A `@` prefix on a jump target or `LOAD`/`STORE` address marks the
//!   operand as indirect.
//!
//! Errors carry 1-based source line numbers, since they describe the text
//! file rather than machine state.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::common::{Fault, NUM_REGISTERS};
use crate::isa::{Instruction, Opcode};

/// Errors produced while loading a program, before the machine starts.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The program file could not be opened or read.
    #[error("cannot read program file {path}")]
    ProgramFileNotFound {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A source line did not parse as an instruction.
    #[error("line {line}: {reason}")]
    MalformedInstructionLine {
        /// 1-based line number in the source file.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// The program image did not fit within the configured page budget.
    #[error("cannot place instruction {index} into memory")]
    Placement {
        /// Zero-based index of the instruction that failed to place.
        index: usize,
        /// The memory fault that stopped placement.
        #[source]
        source: Fault,
    },
}

/// Reads and parses the program at `path`.
///
/// # Errors
///
/// Returns [`LoadError::ProgramFileNotFound`] when the file cannot be read
/// and [`LoadError::MalformedInstructionLine`] for the first line that
/// fails to parse.
pub fn load_file(path: &Path) -> Result<Vec<Instruction>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::ProgramFileNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    parse_program(&text)
}

/// Parses a whole program, one instruction per non-empty line.
///
/// # Errors
///
/// Returns [`LoadError::MalformedInstructionLine`] for the first offending
/// line, with its 1-based number.
pub fn parse_program(text: &str) -> Result<Vec<Instruction>, LoadError> {
    let mut program = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split(';').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let instr = parse_line(line).map_err(|reason| LoadError::MalformedInstructionLine {
            line: idx + 1,
            reason,
        })?;
        program.push(instr);
    }
    Ok(program)
}

fn parse_line(line: &str) -> Result<Instruction, String> {
    let mut tokens = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty());
    let mnemonic = tokens
        .next()
        .ok_or_else(|| "empty instruction".to_owned())?
        .to_ascii_uppercase();
    let operands: Vec<&str> = tokens.collect();

    let instr = match mnemonic.as_str() {
        "ADD" => reg3(Opcode::Add, &operands)?,
        "SUB" => reg3(Opcode::Sub, &operands)?,
        "MUL" => reg3(Opcode::Mul, &operands)?,
        "DIV" => reg3(Opcode::Div, &operands)?,
        "AND" => reg3(Opcode::And, &operands)?,
        "OR" => reg3(Opcode::Or, &operands)?,
        "XOR" => reg3(Opcode::Xor, &operands)?,
        "NOT" => {
            expect_operands(&operands, 2)?;
            let dest = parse_register(operands[0])?;
            let src = parse_register(operands[1])?;
            Instruction::reg3(Opcode::Not, dest, src, 0)
        }
        "MOV" => {
            expect_operands(&operands, 2)?;
            let dest = parse_register(operands[0])?;
            if is_register_token(operands[1]) {
                let src = parse_register(operands[1])?;
                Instruction::reg3(Opcode::MovReg, dest, src, 0)
            } else {
                Instruction::mov_imm(dest, parse_immediate(operands[1])?)
            }
        }
        "LOAD" => {
            expect_operands(&operands, 2)?;
            let dest = parse_register(operands[0])?;
            let (addr, indirect) = parse_address(operands[1])?;
            Instruction::load(dest, addr, indirect)
        }
        "STORE" => {
            expect_operands(&operands, 2)?;
            let src = parse_register(operands[0])?;
            let (addr, indirect) = parse_address(operands[1])?;
            Instruction::store(src, addr, indirect)
        }
        "JMP" => jump(Opcode::Jmp, &operands)?,
        "JE" => jump(Opcode::Je, &operands)?,
        "JNE" => jump(Opcode::Jne, &operands)?,
        "JGE" => jump(Opcode::Jge, &operands)?,
        "JL" => jump(Opcode::Jl, &operands)?,
        "CMP" => {
            expect_operands(&operands, 2)?;
            let lhs = parse_register(operands[0])?;
            let rhs = parse_register(operands[1])?;
            Instruction::reg3(Opcode::Cmp, 0, lhs, rhs)
        }
        "READ_KEYBOARD" => {
            expect_operands(&operands, 1)?;
            let dest = parse_register(operands[0])?;
            Instruction::new(Opcode::ReadKeyboard, dest, 0, 0, 0)
        }
        "WRITE_SCREEN" => {
            expect_operands(&operands, 1)?;
            let src = parse_register(operands[0])?;
            Instruction::new(Opcode::WriteScreen, 0, src, 0, 0)
        }
        "HALT" => {
            expect_operands(&operands, 0)?;
            Instruction::new(Opcode::Halt, 0, 0, 0, 0)
        }
        other => return Err(format!("unknown mnemonic `{other}`")),
    };
    Ok(instr)
}

fn reg3(opcode: Opcode, operands: &[&str]) -> Result<Instruction, String> {
    expect_operands(operands, 3)?;
    let dest = parse_register(operands[0])?;
    let src1 = parse_register(operands[1])?;
    let src2 = parse_register(operands[2])?;
    Ok(Instruction::reg3(opcode, dest, src1, src2))
}

fn jump(opcode: Opcode, operands: &[&str]) -> Result<Instruction, String> {
    expect_operands(operands, 1)?;
    let (target, indirect) = parse_address(operands[0])?;
    Ok(Instruction::jump(opcode, target, indirect))
}

fn expect_operands(operands: &[&str], count: usize) -> Result<(), String> {
    if operands.len() == count {
        Ok(())
    } else {
        Err(format!(
            "expected {count} operand(s), found {}",
            operands.len()
        ))
    }
}

/// Whether a token is unambiguously a register name (`R` plus digits).
///
/// Distinguishes `MOV R0, R1` (register move) from `MOV R0, 1`
/// (immediate); bare numerals in register positions are still parsed as
/// indices by [`parse_register`].
fn is_register_token(token: &str) -> bool {
    token
        .strip_prefix('R')
        .or_else(|| token.strip_prefix('r'))
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_register(token: &str) -> Result<u8, String> {
    let digits = token
        .strip_prefix('R')
        .or_else(|| token.strip_prefix('r'))
        .unwrap_or(token);
    let index = digits.parse::<u8>().map_err(|_| {
        format!(
            "`{token}` is not a register (expected R0..R{max} or a bare index)",
            max = NUM_REGISTERS - 1
        )
    })?;
    if (index as usize) < NUM_REGISTERS {
        Ok(index)
    } else {
        Err(format!(
            "register R{index} out of range (file holds {NUM_REGISTERS} registers)"
        ))
    }
}

fn parse_immediate(token: &str) -> Result<i32, String> {
    let (digits, negative) = match token.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (token, false),
    };
    let magnitude = parse_number(digits)?;
    let magnitude =
        i64::try_from(magnitude).map_err(|_| format!("immediate `{token}` out of range"))?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| format!("immediate `{token}` does not fit in 32 bits"))
}

fn parse_address(token: &str) -> Result<(u32, bool), String> {
    let (digits, indirect) = match token.strip_prefix('@') {
        Some(rest) => (rest, true),
        None => (token, false),
    };
    let value = parse_number(digits)?;
    let addr =
        u32::try_from(value).map_err(|_| format!("address `{token}` does not fit in 32 bits"))?;
    Ok((addr, indirect))
}

fn parse_number(digits: &str) -> Result<u64, String> {
    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => digits.parse::<u64>(),
    };
    parsed.map_err(|_| format!("`{digits}` is not a number"))
}
