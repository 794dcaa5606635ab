//! Register machine
//!
//! Main entry point for running programs.

use bignum::Int;
use memory_manager::{Heap, HeapConfig, RegisterSet, RegisterSetId, GENERAL_REGISTERS};
use tracing::debug;

use crate::context::ExecutionContext;
use crate::dispatch::{self, Dispatcher};
use crate::error::VmError;
use crate::instruction::{Program, Reg};

/// Register machine over signed bignums
///
/// The machine owns:
/// - The managed heap every number lives on
/// - One register set, registered with that heap as a root
/// - The dispatcher that executes instructions
///
/// Registers keep their contents between runs.
#[derive(Debug)]
pub struct Machine {
    /// Heap holding every number in the registers
    heap: Heap,
    /// The machine's register set, as registered with `heap`
    registers: RegisterSetId,
    /// Dispatcher for instruction execution
    dispatcher: Dispatcher,
}

impl Machine {
    /// Create a machine with a default-sized heap
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    /// Create a machine whose heap uses `config`
    ///
    /// An invalid configuration is fatal.
    pub fn with_config(config: HeapConfig) -> Self {
        let mut heap = Heap::with_config(config);
        let registers = heap.register_register_set(RegisterSet::new());
        Self {
            heap,
            registers,
            dispatcher: Dispatcher::new(),
        }
    }

    /// Execute a program
    ///
    /// # Arguments
    ///
    /// * `program` - Instructions and literals to execute
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The program reached `Halt` or its last instruction
    /// * `Err(VmError)` - An instruction was malformed; registers keep the
    ///   effects of the instructions before it
    ///
    /// # Example
    ///
    /// ```
    /// use interpreter::{Instruction, Machine, Program};
    ///
    /// let mut program = Program::new();
    /// let lit = program.add_literal("-18446744073709551616");
    /// program.emit(Instruction::LoadInt { dst: 0, literal: lit });
    /// program.emit(Instruction::Mul { dst: 1, lhs: 0, rhs: 0 });
    /// program.emit(Instruction::Halt);
    ///
    /// let mut machine = Machine::new();
    /// machine.run(&program).unwrap();
    /// assert_eq!(
    ///     machine.render(1).unwrap(),
    ///     "340282366920938463463374607431768211456"
    /// );
    /// ```
    pub fn run(&mut self, program: &Program) -> Result<(), VmError> {
        debug!(
            instructions = program.instruction_count(),
            literals = program.literal_count(),
            "run started"
        );
        let mut ctx = ExecutionContext::new(program);
        let result = self.dispatcher.execute(&mut self.heap, self.registers, &mut ctx);
        debug!(
            executed = self.dispatcher.executed(),
            ip = ctx.instruction_pointer,
            ok = result.is_ok(),
            "run finished"
        );
        result
    }

    /// Render a register as decimal text
    ///
    /// Numbers render canonically; raw values render as signed 64-bit
    /// integers, so a comparison result reads as `-1`, `0` or `1`.
    pub fn render(&self, reg: Reg) -> Result<String, VmError> {
        let set = self.register_file(reg)?;
        Ok(match set.object(reg) {
            Some(obj) => Int::from_obj(obj).render(&self.heap),
            None => (set.raw(reg) as i64).to_string(),
        })
    }

    /// The number held by a register
    ///
    /// The handle is only current until the next allocation on the heap.
    pub fn value(&self, reg: Reg) -> Result<Int, VmError> {
        dispatch::operand(&self.heap, self.registers, reg)
    }

    /// Raw contents of a register
    pub fn raw(&self, reg: Reg) -> Result<u64, VmError> {
        Ok(self.register_file(reg)?.raw(reg))
    }

    /// Zero every register, releasing the numbers they held
    pub fn clear_registers(&mut self) {
        let set = self.heap.register_set_mut(self.registers);
        for reg in 0..GENERAL_REGISTERS {
            set.clear(reg);
        }
    }

    /// The machine's register set
    pub fn registers(&self) -> &RegisterSet {
        self.heap.register_set(self.registers)
    }

    /// The machine's heap
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Mutable access to the heap, e.g. to force a collection
    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// Instructions executed across all runs
    pub fn instructions_executed(&self) -> u64 {
        self.dispatcher.executed()
    }

    fn register_file(&self, reg: Reg) -> Result<&RegisterSet, VmError> {
        if reg < GENERAL_REGISTERS {
            Ok(self.registers())
        } else {
            Err(VmError::RegisterOutOfRange(reg))
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
