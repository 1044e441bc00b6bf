//! zp-machine: a counter machine with `give`, `take` and jumps.
//!
//! Five registers hold values in `[0, 32767]`. `give` adds unless the sum would
//! overflow (then nothing happens); `take` subtracts if the result stays >= 0
//! and otherwise branches to its else edge. The generator in `zp-codegen`
//! relies on exactly these rules for its wrapping-add idiom.

pub mod instruction;
pub mod parser;
pub mod program;

pub use instruction::{InstrId, Instruction, Op};
pub use parser::ParseError;
pub use program::{run, Execution, MachineError, Program, RunError};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod parser_tests;
