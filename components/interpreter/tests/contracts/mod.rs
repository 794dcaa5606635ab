//! Contract tests for the interpreter API
//!
//! These tests pin the public surface other crates build on.

use interpreter::{Dispatcher, ExecutionContext, Instruction, Machine, Program, VmError};
use memory_manager::{RegisterSet, Scratch, GENERAL_REGISTERS};

/// Machine::new() starts with empty, unmanaged registers
#[test]
fn test_machine_new_contract() {
    let machine = Machine::new();
    for reg in 0..GENERAL_REGISTERS {
        assert_eq!(machine.raw(reg).unwrap(), 0);
        assert!(!machine.registers().is_managed(reg));
    }
    assert_eq!(machine.heap().live_words(), 0);
}

/// Machine::run() stops at Halt
#[test]
fn test_run_stops_at_halt_contract() {
    let mut program = Program::new();
    program.emit(Instruction::LoadImm { dst: 0, value: 1 });
    program.emit(Instruction::Halt);
    program.emit(Instruction::LoadImm { dst: 0, value: 2 });

    let mut machine = Machine::new();
    machine.run(&program).unwrap();
    assert_eq!(machine.raw(0).unwrap(), 1);
    assert_eq!(machine.instructions_executed(), 2);
}

/// Arithmetic results are managed registers
#[test]
fn test_results_are_managed_contract() {
    let mut program = Program::new();
    let lit = program.add_literal("6");
    program.emit(Instruction::LoadInt { dst: 0, literal: lit });
    program.emit(Instruction::Mul { dst: 1, lhs: 0, rhs: 0 });

    let mut machine = Machine::new();
    machine.run(&program).unwrap();
    assert!(machine.registers().is_managed(1));
    let value = machine.value(1).unwrap();
    assert_eq!(value.to_i64(machine.heap()), Some(36));
}

/// Scratch slots are empty between instructions
#[test]
fn test_scratch_empty_after_run_contract() {
    let mut program = Program::new();
    let lit = program.add_literal("2");
    program.emit(Instruction::LoadInt { dst: 0, literal: lit });
    program.emit(Instruction::DivRem { quotient: 1, remainder: 2, lhs: 0, rhs: 0 });

    let mut machine = Machine::new();
    machine.run(&program).unwrap();
    for slot in Scratch::ALL {
        assert!(machine.registers().scratch(slot).is_null());
    }
}

/// Every malformed operand is a VmError, not a fault
#[test]
fn test_error_variants_contract() {
    let out_of_range = GENERAL_REGISTERS;
    let cases = [
        (
            Instruction::LoadImm { dst: out_of_range, value: 0 },
            VmError::RegisterOutOfRange(out_of_range),
        ),
        (
            Instruction::Move { dst: 0, src: out_of_range },
            VmError::RegisterOutOfRange(out_of_range),
        ),
        (
            Instruction::Inc { reg: 0 },
            VmError::NotAnObject(0),
        ),
        (
            Instruction::LoadInt { dst: 0, literal: 3 },
            VmError::LiteralOutOfRange(3),
        ),
    ];
    for (inst, expected) in cases {
        let mut program = Program::new();
        program.emit(inst);
        let mut machine = Machine::new();
        assert_eq!(machine.run(&program), Err(expected), "{inst:?}");
    }
}

/// Machine::render() shows raw registers as signed values
#[test]
fn test_render_raw_contract() {
    let mut program = Program::new();
    program.emit(Instruction::LoadImm { dst: 0, value: u64::MAX });
    let mut machine = Machine::new();
    machine.run(&program).unwrap();
    assert_eq!(machine.render(0).unwrap(), "-1");
}

/// Dispatcher and ExecutionContext drive any registered register set
#[test]
fn test_dispatcher_contract() {
    let mut heap = memory_manager::Heap::new();
    let regs = heap.register_register_set(RegisterSet::new());
    let mut program = Program::new();
    program.emit(Instruction::LoadImm { dst: 4, value: 9 });

    let mut ctx = ExecutionContext::new(&program);
    let mut dispatcher = Dispatcher::new();
    dispatcher.execute(&mut heap, regs, &mut ctx).unwrap();
    assert_eq!(heap.register_set(regs).raw(4), 9);
    assert_eq!(dispatcher.executed(), 1);
}
