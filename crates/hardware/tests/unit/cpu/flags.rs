//! Comparison flag tests: `CMP` sets exactly one flag, and each
//! conditional jump consumes the right one.

use pretty_assertions::assert_eq;
use rstest::rstest;

use emusim_core::common::Flags;
use emusim_core::isa::{Instruction, Opcode};

use crate::common::run_program;

/// Exactly one flag is true after any comparison.
#[rstest]
#[case(5, 5, (true, false, false))]
#[case(7, 3, (false, true, false))]
#[case(-7, 3, (false, false, true))]
#[case(i64::MIN, i64::MAX, (false, false, true))]
#[case(-1, -1, (true, false, false))]
fn cmp_sets_exactly_one_flag(
    #[case] lhs: i64,
    #[case] rhs: i64,
    #[case] expected: (bool, bool, bool),
) {
    let mut flags = Flags::default();
    flags.set_from_cmp(lhs, rhs);
    assert_eq!((flags.zero, flags.greater, flags.less), expected);
}

/// All three flags start false: no jump is taken before the first `CMP`.
#[test]
fn flags_start_clear() {
    let flags = Flags::default();
    assert!(!flags.zero && !flags.greater && !flags.less);
}

/// Each conditional jump fires on the comparison outcomes it should, and
/// only those.
#[rstest]
#[case(Opcode::Je, 5, 5, true)]
#[case(Opcode::Je, 5, 6, false)]
#[case(Opcode::Jne, 5, 6, true)]
#[case(Opcode::Jne, 5, 5, false)]
#[case(Opcode::Jge, 6, 5, true)]
#[case(Opcode::Jge, 5, 5, true)]
#[case(Opcode::Jge, 4, 5, false)]
#[case(Opcode::Jl, 4, 5, true)]
#[case(Opcode::Jl, 5, 5, false)]
#[case(Opcode::Jl, 6, 5, false)]
fn conditional_jumps_consume_flags(
    #[case] opcode: Opcode,
    #[case] lhs: i32,
    #[case] rhs: i32,
    #[case] taken: bool,
) {
    let mut sim = crate::common::default_simulator();
    sim.load_instructions(&[
        Instruction::mov_imm(0, lhs),
        Instruction::mov_imm(1, rhs),
        Instruction::reg3(Opcode::Cmp, 0, 0, 1),
        Instruction::jump(opcode, 5, false),
        Instruction::mov_imm(2, 1), // runs only on fall-through
        Instruction::new(Opcode::Halt, 0, 0, 0, 0),
    ])
    .unwrap();
    sim.run().unwrap();

    let fell_through = sim.processor().regs().read(2).unwrap() == 1;
    assert_eq!(fell_through, !taken);
}

/// Flags survive unrelated instructions: only `CMP` writes them.
#[test]
fn only_cmp_writes_flags() {
    let sim = run_program(
        "CMP R0, R0\n\
         MOV R1, 9\n\
         ADD R2, R1, R1\n\
         JE 5\n\
         MOV R3, 1\n\
         HALT\n",
    );
    assert_eq!(
        sim.processor().regs().read(3).unwrap(),
        0,
        "JE still sees the zero flag from the CMP"
    );
}
