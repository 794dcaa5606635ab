//! Instruction dispatch
//!
//! Every value an instruction is working on lives in a GC-visible slot of the
//! machine's register set: operands in `Lhs`/`Rhs`, results in `Accumulator`
//! (and `Spill` for a second result) until they are written to their
//! destination registers.

use bignum::Int;
use memory_manager::{Heap, RegisterSetId, Scratch, GENERAL_REGISTERS};
use tracing::trace;

use crate::context::ExecutionContext;
use crate::error::VmError;
use crate::instruction::{Instruction, Reg};

/// Whether the dispatch loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Halt,
}

/// Executes instructions against a heap and a registered register set
#[derive(Debug, Default)]
pub struct Dispatcher {
    /// Instructions executed since creation
    executed: u64,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Instructions executed since creation
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Run until `Halt` or the end of the program
    ///
    /// # Arguments
    ///
    /// * `heap` - Heap holding every number the program touches
    /// * `registers` - Register set registered with `heap`
    /// * `ctx` - Program and instruction pointer
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The program halted or ran off its end
    /// * `Err(VmError)` - An instruction was malformed; earlier effects remain
    pub fn execute(
        &mut self,
        heap: &mut Heap,
        registers: RegisterSetId,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), VmError> {
        while let Some(inst) = ctx.fetch() {
            trace!(ip = ctx.instruction_pointer - 1, ?inst, "dispatch");
            self.executed += 1;
            let flow = self.step(heap, registers, ctx, inst);
            heap.register_set_mut(registers).clear_scratch();
            if flow? == Flow::Halt {
                break;
            }
        }
        Ok(())
    }

    fn step(
        &mut self,
        heap: &mut Heap,
        regs: RegisterSetId,
        ctx: &ExecutionContext<'_>,
        inst: Instruction,
    ) -> Result<Flow, VmError> {
        match inst {
            Instruction::LoadInt { dst, literal } => {
                check(dst)?;
                let text = ctx
                    .literal(literal)
                    .ok_or(VmError::LiteralOutOfRange(literal))?;
                let value = Int::parse(heap, text).map_err(|source| VmError::Literal {
                    index: literal,
                    source,
                })?;
                heap.register_set_mut(regs).set_object(dst, value.obj());
            }
            Instruction::LoadImm { dst, value } => {
                check(dst)?;
                heap.register_set_mut(regs).set_raw(dst, value);
            }
            Instruction::Move { dst, src } => {
                check(dst)?;
                check(src)?;
                let set = heap.register_set_mut(regs);
                match set.object(src) {
                    Some(obj) => set.set_object(dst, obj),
                    None => {
                        let raw = set.raw(src);
                        set.set_raw(dst, raw);
                    }
                }
            }
            Instruction::Add { dst, lhs, rhs } => binary(heap, regs, dst, lhs, rhs, Int::add)?,
            Instruction::Sub { dst, lhs, rhs } => binary(heap, regs, dst, lhs, rhs, Int::sub)?,
            Instruction::Mul { dst, lhs, rhs } => binary(heap, regs, dst, lhs, rhs, Int::mul)?,
            Instruction::Div { dst, lhs, rhs } => binary(heap, regs, dst, lhs, rhs, Int::div)?,
            Instruction::Rem { dst, lhs, rhs } => binary(heap, regs, dst, lhs, rhs, Int::rem)?,
            Instruction::DivRem {
                quotient,
                remainder,
                lhs,
                rhs,
            } => {
                check(quotient)?;
                check(remainder)?;
                let (a, b) = stage(heap, regs, lhs, rhs)?;
                let (q, r) = Int::div_rem(heap, a, b);
                let set = heap.register_set_mut(regs);
                set.set_scratch(Scratch::Accumulator, q.obj());
                set.set_scratch(Scratch::Spill, r.obj());
                set.set_object(quotient, q.obj());
                set.set_object(remainder, r.obj());
            }
            Instruction::Neg { dst, src } => unary(heap, regs, dst, src, Int::neg)?,
            Instruction::Inc { reg } => unary(heap, regs, reg, reg, Int::inc)?,
            Instruction::Dec { reg } => unary(heap, regs, reg, reg, Int::dec)?,
            Instruction::Cmp { dst, lhs, rhs } => {
                check(dst)?;
                let (a, b) = stage(heap, regs, lhs, rhs)?;
                let ordering = Int::compare(heap, a, b);
                heap.register_set_mut(regs)
                    .set_raw(dst, ordering as i64 as u64);
            }
            Instruction::Collect => heap.collect(),
            Instruction::Halt => return Ok(Flow::Halt),
        }
        Ok(Flow::Continue)
    }
}

fn check(reg: Reg) -> Result<(), VmError> {
    if reg < GENERAL_REGISTERS {
        Ok(())
    } else {
        Err(VmError::RegisterOutOfRange(reg))
    }
}

/// The integer held by a register
pub(crate) fn operand(heap: &Heap, regs: RegisterSetId, reg: Reg) -> Result<Int, VmError> {
    check(reg)?;
    heap.register_set(regs)
        .object(reg)
        .map(Int::from_obj)
        .ok_or(VmError::NotAnObject(reg))
}

/// Reads both operands into the `Lhs`/`Rhs` slots
fn stage(heap: &mut Heap, regs: RegisterSetId, lhs: Reg, rhs: Reg) -> Result<(Int, Int), VmError> {
    let a = operand(heap, regs, lhs)?;
    let b = operand(heap, regs, rhs)?;
    let set = heap.register_set_mut(regs);
    set.set_scratch(Scratch::Lhs, a.obj());
    set.set_scratch(Scratch::Rhs, b.obj());
    Ok((a, b))
}

/// Parks a fresh result in the accumulator, then writes it to `dst`
fn retire(heap: &mut Heap, regs: RegisterSetId, dst: Reg, result: Int) {
    let set = heap.register_set_mut(regs);
    set.set_scratch(Scratch::Accumulator, result.obj());
    let result = set.scratch(Scratch::Accumulator);
    set.set_object(dst, result);
}

fn binary(
    heap: &mut Heap,
    regs: RegisterSetId,
    dst: Reg,
    lhs: Reg,
    rhs: Reg,
    op: fn(&mut Heap, Int, Int) -> Int,
) -> Result<(), VmError> {
    check(dst)?;
    let (a, b) = stage(heap, regs, lhs, rhs)?;
    let result = op(heap, a, b);
    retire(heap, regs, dst, result);
    Ok(())
}

fn unary(
    heap: &mut Heap,
    regs: RegisterSetId,
    dst: Reg,
    src: Reg,
    op: fn(&mut Heap, Int) -> Int,
) -> Result<(), VmError> {
    check(dst)?;
    let a = operand(heap, regs, src)?;
    heap.register_set_mut(regs).set_scratch(Scratch::Lhs, a.obj());
    let result = op(heap, a);
    retire(heap, regs, dst, result);
    Ok(())
}
