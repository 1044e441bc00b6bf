//! Program text -> instruction graph.
//!
//! Line kinds:
//! - `#cmd ...`  command line (`give R N`, `take R N [chained cmd]`, or a bare label to jump to)
//! - `:label`    label declaration; names the next command line
//! - anything else is a comment
//!
//! Commands chained on one line form an if/elif chain through the takes'
//! else edges. Parsing is two-pass: declarations are collected while the
//! arena is built, then every jump is checked against them.

use rustc_hash::FxHashMap;
use thiserror::Error;
use zp_core::{is_word, Register, COMMAND_SIGIL, LABEL_SIGIL, MAX_VALUE};

use crate::instruction::{InstrId, Instruction, InstructionArena, Op};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: malformed token {token:?}")]
    BadToken { line: usize, token: String },
    #[error("line {line}: unexpected token {token:?}, expected end-of-line")]
    Trailing { line: usize, token: String },
    #[error("line {line}: unexpected end-of-line, expected {expected}")]
    Missing { line: usize, expected: &'static str },
    #[error("line {line}: invalid register name {name:?}")]
    UnknownRegister { line: usize, name: String },
    #[error("line {line}: invalid integer {text:?}")]
    InvalidInteger { line: usize, text: String },
    #[error("line {line}: integer {text} is outside the range [0, 32767]")]
    AmountOutOfRange { line: usize, text: String },
    #[error("line {line}: duplicate label {label:?}")]
    DuplicateLabel { line: usize, label: String },
    #[error("unresolved labels: {}", .0.join(", "))]
    UnresolvedLabels(Vec<String>),
}

/// Label -> first instruction after its declaration (None = end of program).
pub type LabelTable = FxHashMap<String, Option<InstrId>>;

#[derive(Debug)]
pub struct Parsed {
    pub instructions: InstructionArena,
    pub labels: LabelTable,
}

/// Words of one command line, consumed left to right.
///
/// A word may carry a leading sigil only where a chained command starts
/// (`#take a 1 #give b 2`); everywhere else it is a malformed token.
struct Words<'a> {
    line: usize,
    words: Vec<&'a str>,
    pos: usize,
}

impl<'a> Words<'a> {
    fn split(line: usize, body: &'a str) -> Result<Self, ParseError> {
        let mut words = Vec::new();
        for raw in body.split_whitespace() {
            let bare = raw.strip_prefix(COMMAND_SIGIL).unwrap_or(raw);
            if !bare.is_empty() && !is_word(bare) {
                return Err(ParseError::BadToken {
                    line,
                    token: raw.to_string(),
                });
            }
            words.push(raw);
        }
        Ok(Self {
            line,
            words,
            pos: 0,
        })
    }

    fn at_end(&self) -> bool {
        self.pos >= self.words.len()
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        let w = self.words.get(self.pos).copied().ok_or(ParseError::Missing {
            line: self.line,
            expected,
        })?;
        if !is_word(w) {
            return Err(ParseError::BadToken {
                line: self.line,
                token: w.to_string(),
            });
        }
        self.pos += 1;
        Ok(w)
    }

    /// Drops the optional sigil in front of a chained command: `#give` or a lone `#`.
    fn chained_sigil(&mut self) {
        let word = self.words.get(self.pos).copied().unwrap_or_default();
        match word.strip_prefix(COMMAND_SIGIL) {
            Some("") => self.pos += 1,
            Some(bare) => self.words[self.pos] = bare,
            None => {}
        }
    }

    fn end(&self) -> Result<(), ParseError> {
        match self.words.get(self.pos) {
            None => Ok(()),
            Some(w) => Err(ParseError::Trailing {
                line: self.line,
                token: w.to_string(),
            }),
        }
    }

    fn register(&mut self) -> Result<Register, ParseError> {
        let name = self.next("a register name")?;
        name.parse().map_err(|_| ParseError::UnknownRegister {
            line: self.line,
            name: name.to_string(),
        })
    }

    fn amount(&mut self) -> Result<u16, ParseError> {
        let text = self.next("an integer")?;
        if !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidInteger {
                line: self.line,
                text: text.to_string(),
            });
        }
        match text.parse::<u32>() {
            Ok(v) if v <= MAX_VALUE as u32 => Ok(v as u16),
            _ => Err(ParseError::AmountOutOfRange {
                line: self.line,
                text: text.to_string(),
            }),
        }
    }

    /// The commands of one line, in chain order.
    fn commands(&mut self) -> Result<Vec<Op>, ParseError> {
        let mut chain = Vec::new();
        loop {
            match self.next("a command")? {
                "give" => {
                    let register = self.register()?;
                    let amount = self.amount()?;
                    chain.push(Op::Give { register, amount });
                    break;
                }
                "take" => {
                    let register = self.register()?;
                    let amount = self.amount()?;
                    chain.push(Op::Take { register, amount });
                    if self.at_end() {
                        break;
                    }
                    self.chained_sigil();
                }
                label => {
                    chain.push(Op::Jump {
                        label: label.to_string(),
                    });
                    break;
                }
            }
        }
        self.end()?;
        Ok(chain)
    }
}

pub fn parse(text: &str) -> Result<Parsed, ParseError> {
    let mut instructions = InstructionArena::new();
    let mut labels = LabelTable::default();
    let mut pending_labels: Vec<String> = Vec::new();
    // (first id, chain length) per command line.
    let mut lines: Vec<(InstrId, usize)> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if let Some(body) = line.strip_prefix(LABEL_SIGIL) {
            let mut words = Words::split(line_no, body)?;
            let label = words.next("a label name")?;
            words.end()?;
            if labels.contains_key(label) {
                return Err(ParseError::DuplicateLabel {
                    line: line_no,
                    label: label.to_string(),
                });
            }
            labels.insert(label.to_string(), None);
            pending_labels.push(label.to_string());
        } else if let Some(body) = line.strip_prefix(COMMAND_SIGIL) {
            let chain = Words::split(line_no, body)?.commands()?;
            let first = instructions.len() as InstrId;
            let len = chain.len();
            for op in chain {
                instructions.push(Instruction::new(op));
            }
            for label in pending_labels.drain(..) {
                labels.insert(label, Some(first));
            }
            lines.push((first, len));
        }
        // Anything else is a comment.
    }

    link(&mut instructions, &lines);
    check_jumps(&instructions, &labels)?;

    Ok(Parsed {
        instructions,
        labels,
    })
}

/// Sets next/else edges: every command on a line falls through to the next
/// line; a take's else goes to the command chained after it, or to the next
/// line when it is last.
fn link(instructions: &mut InstructionArena, lines: &[(InstrId, usize)]) {
    for (i, &(first, len)) in lines.iter().enumerate() {
        let next_line = lines.get(i + 1).map(|&(id, _)| id);
        for k in 0..len {
            let id = first + k as InstrId;
            let chained = if k + 1 < len { Some(id + 1) } else { None };
            if let Some(instr) = instructions.get_mut(id) {
                instr.next = next_line;
                if let Op::Take { .. } = instr.op {
                    instr.else_ = chained.or(next_line);
                }
            }
        }
    }
}

fn check_jumps(instructions: &InstructionArena, labels: &LabelTable) -> Result<(), ParseError> {
    let mut unresolved: Vec<String> = Vec::new();
    for instr in instructions.iter() {
        if let Op::Jump { label } = &instr.op {
            if !labels.contains_key(label) && !unresolved.contains(label) {
                unresolved.push(label.clone());
            }
        }
    }
    if unresolved.is_empty() {
        Ok(())
    } else {
        Err(ParseError::UnresolvedLabels(unresolved))
    }
}
