//! zp-codegen: pseudorandom Feistel permutations compiled to counter-machine code.
//!
//! A [`Permutation`] is a sequence of [`Round`]s drawn from one random stream.
//! Compiled against a [`RegisterLayout`], it becomes a program that permutes
//! the 30-bit value held in two registers, using a third as scratch. The
//! program is a bijection no matter which rounds were drawn, since every
//! Feistel round can be undone.

pub mod emit;
pub mod error;
pub mod label;
pub mod permutation;
pub mod round;

pub use emit::wrapping_add_code;
pub use error::CodegenError;
pub use label::LabelMaker;
pub use permutation::{Permutation, RegisterLayout};
pub use round::Round;

use zp_rng::{RandomStream, Sampler};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Program text for a fresh `round_count`-round permutation.
///
/// `seed = None` seeds from OS entropy. Leaves `layout.temp` at 0 when it
/// starts at 0.
pub fn generate(
    round_count: u32,
    seed: Option<&[u8]>,
    layout: RegisterLayout,
    label_prefix: &str,
) -> Result<String, CodegenError> {
    let mut stream = RandomStream::new(seed);
    generate_with(round_count, &mut stream, layout, label_prefix)
}

/// Like [`generate`], drawing from a caller-owned source.
///
/// Arguments are checked before anything is drawn.
pub fn generate_with<S: Sampler>(
    round_count: u32,
    source: &mut S,
    layout: RegisterLayout,
    label_prefix: &str,
) -> Result<String, CodegenError> {
    if round_count == 0 {
        return Err(CodegenError::ZeroRounds);
    }
    layout.validate()?;
    label::validate_prefix(label_prefix)?;

    let permutation = Permutation::generate(round_count, source)?;
    let code = permutation.generate_code(&layout, label_prefix)?;
    zp_logging::debug_log(
        "zp-codegen::generate",
        "generated permutation",
        serde_json::json!({
            "rounds": round_count,
            "layout": layout,
            "label_prefix": label_prefix,
            "lines": code.lines().count(),
        }),
    );
    Ok(code)
}


#[cfg(test)]
mod permutation_tests;
