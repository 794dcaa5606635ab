//! Register contents across collections

use interpreter::{Instruction, Machine, Program};
use memory_manager::HeapConfig;

fn machine(space_words: usize) -> Machine {
    Machine::with_config(
        HeapConfig::default()
            .with_space_words(space_words)
            .with_verify_collections(true),
    )
}

#[test]
fn test_registers_relocate_on_collect() {
    let mut vm = machine(256);
    let mut program = Program::new();
    let lit = program.add_literal("123456789012345678901234567890");
    program.emit(Instruction::LoadInt { dst: 9, literal: lit });
    program.emit(Instruction::LoadImm { dst: 3, value: 77 });
    program.emit(Instruction::Collect);
    vm.run(&program).unwrap();

    let before = vm.registers().object(9).unwrap();
    vm.heap_mut().collect();
    let after = vm.registers().object(9).unwrap();

    assert_eq!(vm.render(9).unwrap(), "123456789012345678901234567890");
    assert_eq!(vm.raw(3).unwrap(), 77);
    assert_eq!(vm.heap().stats().collections, 2);
    // the only live object is copied to the bottom of each new space
    assert_eq!(before.offset(), 0);
    assert_eq!(after.offset(), 0);
}

#[test]
fn test_overwritten_registers_become_garbage() {
    let mut vm = machine(256);
    let mut program = Program::new();
    let lit = program.add_literal("5");
    program.emit(Instruction::LoadInt { dst: 0, literal: lit });
    for _ in 0..200 {
        program.emit(Instruction::Add { dst: 1, lhs: 0, rhs: 0 });
    }
    program.emit(Instruction::Collect);
    vm.run(&program).unwrap();

    assert_eq!(vm.render(1).unwrap(), "10");
    // r0 and r1, each a one-limb integer
    let live = vm.heap().live_words();
    assert!(live <= 2 * 12, "{live} words live");
    assert!(vm.heap().stats().exhaustion_collections > 0);
}

#[test]
fn test_growing_values_under_pressure() {
    let mut vm = machine(512);
    let mut program = Program::new();
    let lit = program.add_literal("3");
    program.emit(Instruction::LoadInt { dst: 0, literal: lit });
    program.emit(Instruction::Move { dst: 1, src: 0 });
    // 3^(2^6) by repeated squaring, keeping every intermediate
    for reg in 2..8 {
        program.emit(Instruction::Mul { dst: reg, lhs: reg - 1, rhs: reg - 1 });
    }
    vm.run(&program).unwrap();

    assert_eq!(vm.render(2).unwrap(), "9");
    assert_eq!(vm.render(3).unwrap(), "81");
    assert_eq!(vm.render(4).unwrap(), "6561");
    assert_eq!(vm.render(5).unwrap(), "43046721");
    assert_eq!(vm.render(6).unwrap(), "1853020188851841");
    assert_eq!(
        vm.render(7).unwrap(),
        "3433683820292512484657849089281"
    );
    vm.heap().validate_all();
}
