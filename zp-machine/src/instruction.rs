//! Instructions and the arena that links them into a graph.

use std::fmt;

use zp_core::Register;

pub type InstrId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Add `amount` unless the result would exceed 32767.
    Give { register: Register, amount: u16 },
    /// Subtract `amount` if the result stays >= 0, otherwise branch to `else_`.
    Take { register: Register, amount: u16 },
    /// Continue at the instruction following `:label`.
    Jump { label: String },
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Give { register, amount } => write!(f, "give {} {}", register, amount),
            Op::Take { register, amount } => write!(f, "take {} {}", register, amount),
            Op::Jump { label } => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    /// Fallthrough: first instruction of the next command line. None = halt.
    pub next: Option<InstrId>,
    /// Failure branch of a take: the chained command, or `next` if there is none.
    pub else_: Option<InstrId>,
}

impl Instruction {
    pub fn new(op: Op) -> Self {
        Self {
            op,
            next: None,
            else_: None,
        }
    }
}

/// Arena-backed instruction storage.
#[derive(Debug, Clone)]
pub struct InstructionArena {
    instrs: Vec<Instruction>,
}

impl InstructionArena {
    pub fn new() -> Self {
        Self { instrs: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn push(&mut self, i: Instruction) -> InstrId {
        let id = self.instrs.len() as InstrId;
        self.instrs.push(i);
        id
    }

    pub fn get(&self, id: InstrId) -> Option<&Instruction> {
        self.instrs.get(id as usize)
    }

    pub fn get_mut(&mut self, id: InstrId) -> Option<&mut Instruction> {
        self.instrs.get_mut(id as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instrs.iter()
    }
}

impl Default for InstructionArena {
    fn default() -> Self {
        Self::new()
    }
}
