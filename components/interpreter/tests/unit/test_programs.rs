//! Whole programs run through the machine

use interpreter::{Instruction, Machine, Program, VmError};
use memory_manager::HeapConfig;
use num_bigint::BigInt;
use proptest::prelude::*;

fn machine(space_words: usize) -> Machine {
    Machine::with_config(
        HeapConfig::default()
            .with_space_words(space_words)
            .with_verify_collections(true),
    )
}

/// Loads two literals into r0 and r1, then runs `op`
fn binary_program(lhs: &str, rhs: &str, op: Instruction) -> Program {
    let mut program = Program::new();
    let a = program.add_literal(lhs);
    let b = program.add_literal(rhs);
    program.emit(Instruction::LoadInt { dst: 0, literal: a });
    program.emit(Instruction::LoadInt { dst: 1, literal: b });
    program.emit(op);
    program.emit(Instruction::Halt);
    program
}

#[test]
fn test_arithmetic_instructions() {
    let cases = [
        (Instruction::Add { dst: 2, lhs: 0, rhs: 1 }, "-99999999999999999999"),
        (Instruction::Sub { dst: 2, lhs: 0, rhs: 1 }, "-100000000000000000001"),
        (Instruction::Mul { dst: 2, lhs: 0, rhs: 1 }, "-100000000000000000000"),
        (Instruction::Div { dst: 2, lhs: 0, rhs: 1 }, "-100000000000000000000"),
        (Instruction::Rem { dst: 2, lhs: 0, rhs: 1 }, "0"),
    ];
    for (op, expected) in cases {
        let mut vm = machine(1024);
        vm.run(&binary_program("-100000000000000000000", "1", op))
            .unwrap();
        assert_eq!(vm.render(2).unwrap(), expected, "{op:?}");
    }
}

#[test]
fn test_destination_may_alias_operands() {
    let mut vm = machine(512);
    let program = binary_program("12", "30", Instruction::Add { dst: 0, lhs: 0, rhs: 1 });
    vm.run(&program).unwrap();
    assert_eq!(vm.render(0).unwrap(), "42");
    assert_eq!(vm.render(1).unwrap(), "30");
}

#[test]
fn test_divrem_same_destination_keeps_remainder() {
    let mut vm = machine(512);
    let program = binary_program(
        "17",
        "5",
        Instruction::DivRem {
            quotient: 4,
            remainder: 4,
            lhs: 0,
            rhs: 1,
        },
    );
    vm.run(&program).unwrap();
    assert_eq!(vm.render(4).unwrap(), "2");
}

#[test]
fn test_neg_inc_dec() {
    let mut vm = machine(512);
    let mut program = Program::new();
    let lit = program.add_literal("0");
    program.emit(Instruction::LoadInt { dst: 0, literal: lit });
    program.emit(Instruction::Dec { reg: 0 });
    program.emit(Instruction::Neg { dst: 1, src: 0 });
    program.emit(Instruction::Inc { reg: 1 });
    vm.run(&program).unwrap();
    assert_eq!(vm.render(0).unwrap(), "-1");
    assert_eq!(vm.render(1).unwrap(), "2");
}

#[test]
fn test_unrolled_factorial() {
    let mut vm = machine(256);
    let mut program = Program::new();
    let one = program.add_literal("1");
    program.emit(Instruction::LoadInt { dst: 0, literal: one });
    program.emit(Instruction::LoadInt { dst: 1, literal: one });
    for _ in 0..30 {
        program.emit(Instruction::Mul { dst: 0, lhs: 0, rhs: 1 });
        program.emit(Instruction::Inc { reg: 1 });
    }
    vm.run(&program).unwrap();

    assert_eq!(
        vm.render(0).unwrap(),
        "265252859812191058636308480000000"
    );
    assert_eq!(vm.render(1).unwrap(), "31");
    assert!(vm.heap().stats().collections > 0);
}

#[test]
fn test_error_leaves_earlier_effects() {
    let mut vm = machine(512);
    let mut program = Program::new();
    let lit = program.add_literal("8");
    program.emit(Instruction::LoadInt { dst: 0, literal: lit });
    program.emit(Instruction::Add { dst: 1, lhs: 0, rhs: 5 });
    program.emit(Instruction::Inc { reg: 0 });

    assert_eq!(vm.run(&program), Err(VmError::NotAnObject(5)));
    assert_eq!(vm.render(0).unwrap(), "8");
    assert!(!vm.registers().is_managed(1));
}

#[test]
fn test_bad_literal() {
    let mut vm = machine(512);
    let mut program = Program::new();
    let lit = program.add_literal("12a");
    program.emit(Instruction::LoadInt { dst: 0, literal: lit });
    let err = vm.run(&program).unwrap_err();
    assert!(matches!(err, VmError::Literal { index: 0, .. }));
    assert_eq!(err.to_string(), "literal #0: invalid digit 'a' at index 2");
}

#[test]
#[should_panic(expected = "division by zero")]
fn test_division_by_zero_is_fatal() {
    let mut vm = machine(512);
    vm.run(&binary_program("1", "0", Instruction::Div { dst: 2, lhs: 0, rhs: 1 }))
        .unwrap();
}

fn signed() -> impl Strategy<Value = String> {
    "-?[0-9]{1,40}"
}

proptest! {
    #[test]
    fn prop_divrem_matches_oracle(lhs in signed(), rhs in signed()) {
        let divisor: BigInt = rhs.parse().unwrap();
        prop_assume!(divisor != BigInt::from(0));
        let dividend: BigInt = lhs.parse().unwrap();

        let mut vm = machine(1024);
        let op = Instruction::DivRem { quotient: 2, remainder: 3, lhs: 0, rhs: 1 };
        vm.run(&binary_program(&lhs, &rhs, op)).unwrap();

        // BigInt division truncates toward zero as well
        prop_assert_eq!(vm.render(2).unwrap(), (&dividend / &divisor).to_string());
        prop_assert_eq!(vm.render(3).unwrap(), (&dividend % &divisor).to_string());
    }

    #[test]
    fn prop_mul_sub_match_oracle(lhs in signed(), rhs in signed()) {
        let a: BigInt = lhs.parse().unwrap();
        let b: BigInt = rhs.parse().unwrap();

        let mut program = binary_program(&lhs, &rhs, Instruction::Mul { dst: 2, lhs: 0, rhs: 1 });
        program.instructions.pop();
        program.emit(Instruction::Sub { dst: 3, lhs: 2, rhs: 0 });
        program.emit(Instruction::Cmp { dst: 4, lhs: 0, rhs: 1 });

        let mut vm = machine(1024);
        vm.run(&program).unwrap();

        prop_assert_eq!(vm.render(2).unwrap(), (&a * &b).to_string());
        prop_assert_eq!(vm.render(3).unwrap(), (&a * &b - &a).to_string());
        let ordering = a.cmp(&b) as i64;
        prop_assert_eq!(vm.render(4).unwrap(), ordering.to_string());
    }
}
