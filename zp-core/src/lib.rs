//! zp-core: register names, register sets, value limits and configuration.
//!
//! Every other zp crate speaks in terms of the five named registers defined here
//! and the 15-bit value range they hold.

pub mod config;
pub mod register;

pub use config::{Config, ConfigError, GenerateConfig, LoggingConfig, RunConfig};
pub use register::{Register, RegisterError, Registers};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of bits a register holds.
pub const VALUE_BITS: u32 = 15;

/// Registers hold values in `0..MODULUS`.
pub const MODULUS: u32 = 1 << VALUE_BITS;

/// Largest value a register can hold (32767).
pub const MAX_VALUE: u16 = (MODULUS - 1) as u16;

/// First character of a command line in program text.
pub const COMMAND_SIGIL: char = '#';

/// First character of a label declaration in program text.
pub const LABEL_SIGIL: char = ':';

/// Command words. A jump target can never be spelled like one of these.
pub const KEYWORDS: [&str; 2] = ["give", "take"];

/// True if `s` is `give` or `take`.
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// True if `s` is a non-empty run of `[A-Za-z0-9_]`, the only word shape program text allows.
pub fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_word_byte)
}

/// `[A-Za-z0-9_]`
pub fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
