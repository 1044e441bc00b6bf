//! Parsed programs and their execution.

use std::str::FromStr;

use thiserror::Error;
use zp_core::Registers;

use crate::instruction::{InstrId, Instruction, InstructionArena, Op};
use crate::parser::{self, LabelTable, ParseError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    /// Parsing rejects unresolved jumps, so this only fires on a broken invariant.
    #[error("jump to unresolved label {0:?}")]
    UnresolvedLabel(String),
    /// Control reached an id with no instruction behind it; also a broken invariant.
    #[error("no instruction with id {0}")]
    MissingInstruction(InstrId),
    #[error("step limit of {limit} instructions exceeded")]
    StepLimit { limit: u64 },
}

/// Either failure of "parse this text, then run it".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("run error: {0}")]
    Run(#[from] RunError),
}

/// Final registers plus the number of executed instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    pub registers: Registers,
    pub steps: u64,
}

/// An immutable instruction graph; run it as often as needed.
#[derive(Debug, Clone)]
pub struct Program {
    instructions: InstructionArena,
    labels: LabelTable,
}

impl Program {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let parsed = parser::parse(text)?;
        zp_logging::debug_log(
            "zp-machine::program",
            "parsed program",
            serde_json::json!({
                "instructions": parsed.instructions.len(),
                "labels": parsed.labels.len(),
            }),
        );
        Ok(Self {
            instructions: parsed.instructions,
            labels: parsed.labels,
        })
    }

    /// Number of instructions (chained commands count individually).
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instruction(&self, id: InstrId) -> Option<&Instruction> {
        self.instructions.get(id)
    }

    /// Where a jump to `label` lands: `Some(None)` means end of program.
    pub fn label_target(&self, label: &str) -> Option<Option<InstrId>> {
        self.labels.get(label).copied()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Run until the program falls off its end.
    ///
    /// Hand-written programs can loop forever; use [`Program::run_bounded`] for those.
    pub fn run(&self, registers: Registers) -> Result<Registers, RunError> {
        Ok(self.execute(registers, None)?.registers)
    }

    /// Like [`Program::run`], but fails after `max_steps` executed instructions.
    pub fn run_bounded(&self, registers: Registers, max_steps: u64) -> Result<Registers, RunError> {
        Ok(self.execute(registers, Some(max_steps))?.registers)
    }

    pub fn execute(&self, mut regs: Registers, max_steps: Option<u64>) -> Result<Execution, RunError> {
        let mut pc: Option<InstrId> = if self.instructions.is_empty() {
            None
        } else {
            Some(0)
        };
        let mut steps = 0u64;

        while let Some(id) = pc {
            if let Some(limit) = max_steps {
                if steps >= limit {
                    return Err(RunError::StepLimit { limit });
                }
            }
            steps += 1;

            let instr = self
                .instructions
                .get(id)
                .ok_or(RunError::MissingInstruction(id))?;
            pc = match &instr.op {
                Op::Give { register, amount } => {
                    // Overflow is absorbed: the register keeps its old value.
                    regs.try_add(*register, *amount);
                    instr.next
                }
                Op::Take { register, amount } => {
                    if regs.try_sub(*register, *amount) {
                        instr.next
                    } else {
                        instr.else_
                    }
                }
                Op::Jump { label } => self
                    .labels
                    .get(label)
                    .copied()
                    .ok_or_else(|| RunError::UnresolvedLabel(label.clone()))?,
            };
        }

        Ok(Execution {
            registers: regs,
            steps,
        })
    }
}

impl FromStr for Program {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse `text` and run it once from `registers`.
pub fn run(text: &str, registers: Registers) -> Result<Registers, MachineError> {
    Ok(Program::parse(text)?.run(registers)?)
}
