//! Interpreter and Memory Manager Integration Tests
//!
//! The machine's register set is a heap root: numbers in registers must
//! survive and follow every collection the arithmetic triggers.

use interpreter::{Instruction, Machine, Program};
use memory_manager::{HeapConfig, Scratch};

fn machine(space_words: usize) -> Machine {
    Machine::with_config(
        HeapConfig::default()
            .with_space_words(space_words)
            .with_verify_collections(true),
    )
}

/// Test: a register survives a collection forced from outside the machine
#[test]
fn test_register_survives_external_collection() {
    let mut vm = machine(256);
    let mut program = Program::new();
    let lit = program.add_literal("123456789012345678901234567890");
    program.emit(Instruction::LoadInt { dst: 0, literal: lit });
    vm.run(&program).unwrap();

    let unforced = vm.render(0).unwrap();
    vm.heap_mut().collect();
    assert_eq!(vm.render(0).unwrap(), unforced);
    assert_eq!(vm.heap().validate_all(), 1);
}

/// Test: stack roots held by the host coexist with machine registers
#[test]
fn test_host_stack_roots_and_registers() {
    let mut vm = machine(512);
    let mut program = Program::new();
    let lit = program.add_literal("-5");
    program.emit(Instruction::LoadInt { dst: 0, literal: lit });
    vm.run(&program).unwrap();

    let heap = vm.heap_mut();
    let kept = bignum::Int::from_i64(heap, 1 << 40);
    let root = heap.push_root(kept.obj());

    let mut square = Program::new();
    for _ in 0..40 {
        square.emit(Instruction::Mul { dst: 1, lhs: 0, rhs: 0 });
    }
    square.emit(Instruction::Collect);
    vm.run(&square).unwrap();

    let heap = vm.heap_mut();
    let kept = bignum::Int::from_obj(heap.root(&root));
    assert_eq!(kept.render(heap), "1099511627776");
    heap.pop_root(root);
    assert_eq!(vm.render(1).unwrap(), "25");
    assert_eq!(vm.heap().validate_all(), 3);
}

/// Test: 2^128 squared repeatedly stays exact across many collections
#[test]
fn test_repeated_squaring_under_pressure() {
    let mut vm = machine(512);
    let mut program = Program::new();
    let lit = program.add_literal("340282366920938463463374607431768211456");
    let one = program.add_literal("1");
    program.emit(Instruction::LoadInt { dst: 0, literal: lit });
    program.emit(Instruction::LoadInt { dst: 1, literal: one });
    // r2 = r0 * r0, then back down by dividing twice
    for _ in 0..25 {
        program.emit(Instruction::Mul { dst: 2, lhs: 0, rhs: 0 });
        program.emit(Instruction::Div { dst: 3, lhs: 2, rhs: 0 });
        program.emit(Instruction::Sub { dst: 4, lhs: 3, rhs: 0 });
        program.emit(Instruction::Add { dst: 4, lhs: 4, rhs: 1 });
    }
    vm.run(&program).unwrap();

    assert_eq!(vm.render(3).unwrap(), "340282366920938463463374607431768211456");
    assert_eq!(vm.render(4).unwrap(), "1");
    assert!(vm.heap().stats().collections > 0);
    for slot in Scratch::ALL {
        assert!(vm.registers().scratch(slot).is_null());
    }
}
