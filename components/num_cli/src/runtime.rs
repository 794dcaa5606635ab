//! Evaluation of one command line
//!
//! Signed arithmetic is compiled to a short program and run on an
//! [`interpreter::Machine`]; natural arithmetic calls the `Nat` operations on
//! a bare heap. Conditions the engine treats as fatal (zero divisors, natural
//! underflow) are checked first and reported as errors instead, as is an
//! operation whose worst-case footprint exceeds the heap.

use std::cmp::Ordering;

use bignum::{limbs_for_digits, Int, Nat};
use interpreter::{Instruction, Machine, Program, Reg, VmError};
use memory_manager::{GcStats, Heap, HeapConfig};
use tracing::debug;

use crate::cli::{Cli, Op};
use crate::error::{CliError, CliResult};

const LHS: Reg = 0;
const RHS: Reg = 1;
const RESULT: Reg = 2;
const REMAINDER: Reg = 3;

/// What an evaluation produced
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Output lines, in order
    pub lines: Vec<String>,
    /// Heap statistics after the evaluation
    pub stats: GcStats,
}

impl Outcome {
    /// The statistics as pretty-printed JSON
    pub fn stats_json(&self) -> CliResult<String> {
        Ok(serde_json::to_string_pretty(&self.stats)?)
    }
}

/// Evaluates operations on a fresh heap per call
#[derive(Debug, Clone)]
pub struct Runtime {
    /// Natural instead of signed arithmetic
    natural: bool,
    /// Configuration for each heap
    config: HeapConfig,
}

impl Runtime {
    /// Create a signed runtime
    ///
    /// # Errors
    /// Returns `CliError::Config` if `config` cannot describe a heap
    ///
    /// # Example
    /// ```
    /// use memory_manager::HeapConfig;
    /// use num_cli::{Op, Runtime};
    ///
    /// let runtime = Runtime::new(HeapConfig::default()).unwrap();
    /// let outcome = runtime.evaluate("-7", Op::DivRem, Some("2")).unwrap();
    /// assert_eq!(outcome.lines, ["-3", "-1"]);
    /// ```
    pub fn new(config: HeapConfig) -> CliResult<Self> {
        config.check().map_err(CliError::Config)?;
        Ok(Self {
            natural: false,
            config,
        })
    }

    /// Create a runtime from parsed arguments
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let config = HeapConfig::default()
            .with_space_words(cli.heap_words)
            .with_verify_collections(cli.verify_heap);
        Ok(Self::new(config)?.with_natural(cli.natural))
    }

    /// Switch between natural and signed arithmetic
    pub fn with_natural(mut self, natural: bool) -> Self {
        self.natural = natural;
        self
    }

    /// Evaluate `lhs op rhs`
    ///
    /// # Returns
    /// One output line, or two for `divrem`, plus the heap statistics
    ///
    /// # Errors
    /// Returns `CliError` for a malformed operand, a wrong operand count, or
    /// an operation with no result
    pub fn evaluate(&self, lhs: &str, op: Op, rhs: Option<&str>) -> CliResult<Outcome> {
        let rhs = match (op.is_binary(), rhs) {
            (true, None) => return Err(CliError::MissingOperand(op.symbol())),
            (false, Some(_)) => return Err(CliError::UnexpectedOperand(op.symbol())),
            (_, rhs) => rhs,
        };
        debug!(natural = self.natural, op = op.symbol(), "evaluating");
        self.ensure_fits(lhs, op, rhs)?;
        if self.natural {
            self.evaluate_natural(lhs, op, rhs)
        } else {
            self.evaluate_signed(lhs, op, rhs)
        }
    }

    /// Rejects an operation whose live objects could outgrow a semispace
    ///
    /// The bound counts both operands at the size parsing reserves for them
    /// plus every result slot the operation allocates. Malformed operands are
    /// measured by length.
    fn ensure_fits(&self, lhs: &str, op: Op, rhs: Option<&str>) -> CliResult<()> {
        let object_words = if self.natural {
            Nat::object_words
        } else {
            Int::object_words
        };
        let a = operand_limbs(lhs);
        let b = rhs.map_or(0, operand_limbs);
        let results = match op {
            Op::Add | Op::Sub => object_words(a.max(b) + 1),
            Op::Mul => object_words(a + b),
            Op::Div | Op::Rem | Op::DivRem => object_words(a) + object_words(a.max(b)),
            Op::Inc | Op::Dec | Op::Neg => object_words(a + 1),
            Op::Cmp => 0,
        };
        let operands = object_words(a) + rhs.map_or(0, |_| object_words(b));
        let needed = operands + results;
        let capacity = self.config.space_words;
        if needed > capacity {
            return Err(CliError::HeapTooSmall { needed, capacity });
        }
        Ok(())
    }

    fn evaluate_signed(&self, lhs: &str, op: Op, rhs: Option<&str>) -> CliResult<Outcome> {
        let mut machine = Machine::with_config(self.config.clone());

        let mut load = Program::new();
        for (dst, text) in [lhs].into_iter().chain(rhs).enumerate() {
            let literal = load.add_literal(text);
            load.emit(Instruction::LoadInt { dst, literal });
        }
        machine.run(&load).map_err(|err| match err {
            VmError::Literal { index, source } => CliError::Operand {
                text: load.literals[index].clone(),
                source,
            },
            other => other.into(),
        })?;

        if op.divides() && machine.value(RHS)?.is_zero(machine.heap()) {
            return Err(CliError::DivisionByZero);
        }

        let (instruction, outputs): (Instruction, &[Reg]) = match op {
            Op::Add => (Instruction::Add { dst: RESULT, lhs: LHS, rhs: RHS }, &[RESULT]),
            Op::Sub => (Instruction::Sub { dst: RESULT, lhs: LHS, rhs: RHS }, &[RESULT]),
            Op::Mul => (Instruction::Mul { dst: RESULT, lhs: LHS, rhs: RHS }, &[RESULT]),
            Op::Div => (Instruction::Div { dst: RESULT, lhs: LHS, rhs: RHS }, &[RESULT]),
            Op::Rem => (Instruction::Rem { dst: RESULT, lhs: LHS, rhs: RHS }, &[RESULT]),
            Op::DivRem => (
                Instruction::DivRem {
                    quotient: RESULT,
                    remainder: REMAINDER,
                    lhs: LHS,
                    rhs: RHS,
                },
                &[RESULT, REMAINDER],
            ),
            Op::Cmp => (Instruction::Cmp { dst: RESULT, lhs: LHS, rhs: RHS }, &[RESULT]),
            Op::Inc => (Instruction::Inc { reg: LHS }, &[LHS]),
            Op::Dec => (Instruction::Dec { reg: LHS }, &[LHS]),
            Op::Neg => (Instruction::Neg { dst: RESULT, src: LHS }, &[RESULT]),
        };
        let mut program = Program::new();
        program.emit(instruction);
        program.emit(Instruction::Halt);
        machine.run(&program)?;

        let lines = outputs
            .iter()
            .map(|&reg| machine.render(reg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Outcome {
            lines,
            stats: machine.heap().stats(),
        })
    }

    fn evaluate_natural(&self, lhs: &str, op: Op, rhs: Option<&str>) -> CliResult<Outcome> {
        if op == Op::Neg {
            return Err(CliError::Unsupported(op.symbol()));
        }
        let mut heap = Heap::with_config(self.config.clone());
        let a = parse_nat(&mut heap, lhs)?;
        let lines = heap.with_roots([a.obj()], |heap, [a]| {
            let b = rhs.map(|text| parse_nat(heap, text)).transpose()?;
            let a = Nat::from_obj(heap.root(a));
            natural(heap, op, a, b)
        })?;
        Ok(Outcome {
            lines,
            stats: heap.stats(),
        })
    }
}

/// Limb slots parsing reserves for an operand
fn operand_limbs(text: &str) -> usize {
    limbs_for_digits(text.trim_start_matches(['+', '-']).len())
}

fn parse_nat(heap: &mut Heap, text: &str) -> CliResult<Nat> {
    Nat::parse(heap, text).map_err(|source| CliError::Operand {
        text: text.to_string(),
        source,
    })
}

fn natural(heap: &mut Heap, op: Op, a: Nat, b: Option<Nat>) -> CliResult<Vec<String>> {
    if op == Op::Inc {
        return Ok(vec![Nat::inc(heap, a).render(heap)]);
    }
    if op == Op::Dec {
        if a.is_zero(heap) {
            return Err(CliError::NaturalUnderflow);
        }
        return Ok(vec![Nat::dec(heap, a).render(heap)]);
    }

    let b = b.ok_or(CliError::MissingOperand(op.symbol()))?;
    if op.divides() && b.is_zero(heap) {
        return Err(CliError::DivisionByZero);
    }
    let ordering = Nat::compare(heap, a, b);
    let result = match op {
        Op::Add => Nat::add(heap, a, b),
        Op::Sub if ordering == Ordering::Less => return Err(CliError::NaturalUnderflow),
        Op::Sub => Nat::sub(heap, a, b),
        Op::Mul => Nat::mul(heap, a, b),
        Op::Div => Nat::div(heap, a, b),
        Op::Rem => Nat::rem(heap, a, b),
        Op::DivRem => {
            let (q, r) = Nat::div_rem(heap, a, b);
            return Ok(vec![q.render(heap), r.render(heap)]);
        }
        Op::Cmp => return Ok(vec![(ordering as i64).to_string()]),
        Op::Inc | Op::Dec | Op::Neg => return Err(CliError::Unsupported(op.symbol())),
    };
    Ok(vec![result.render(heap)])
}
