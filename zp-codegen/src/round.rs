//! One Feistel round: parameters, code emission and a native reference model.

use serde::Serialize;
use zp_core::{Register, MODULUS, VALUE_BITS};
use zp_rng::{RngError, Sampler};

use crate::emit::{bit_value, wrapping_add_code};
use crate::label::LabelMaker;

/// Bits per half.
pub const BITS: usize = VALUE_BITS as usize;

/// Round parameters, fixed once drawn.
///
/// - `constant` is added to the moving half before its bits are read.
/// - `patterns[b]` is the tabulation-hash contribution of source bit `b`
///   (7 or 8 ones each).
/// - `bit_permutation[b]` is where source bit `b` lands in the destination.
///   It is a single 15-cycle, so no bit stays in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    constant: u16,
    patterns: [u16; BITS],
    bit_permutation: [u8; BITS],
}

impl Round {
    /// Draws the constant, then the patterns, then the bit permutation.
    pub fn generate<S: Sampler>(source: &mut S) -> Result<Self, RngError> {
        let constant = source.draw(MODULUS as u64)? as u16;

        let mut patterns = [0u16; BITS];
        for (slot, p) in patterns
            .iter_mut()
            .zip(source.balanced_numbers(BITS, VALUE_BITS)?)
        {
            *slot = p as u16;
        }

        let positions: Vec<u8> = (0..BITS as u8).collect();
        let mut bit_permutation = [0u8; BITS];
        for (from, to) in source.cycle_map(&positions)? {
            bit_permutation[from as usize] = to;
        }

        Ok(Self {
            constant,
            patterns,
            bit_permutation,
        })
    }

    pub fn constant(&self) -> u16 {
        self.constant
    }

    pub fn patterns(&self) -> &[u16; BITS] {
        &self.patterns
    }

    pub fn bit_permutation(&self) -> &[u8; BITS] {
        &self.bit_permutation
    }

    /// Code that drains `source` into `destination` (bits permuted) and adds
    /// the tabulation hash of the drained value into `accumulator`.
    ///
    /// `destination` must be 0 on entry; `source` is 0 on exit.
    pub fn emit(
        &self,
        source: Register,
        destination: Register,
        accumulator: Register,
        labels: &mut LabelMaker,
    ) -> String {
        let mut code = wrapping_add_code(source, self.constant as u32);
        // High bits first: once the higher bits are gone, `take 2^b` succeeds
        // exactly when bit b is set.
        for bit in (0..BITS).rev() {
            let skip = labels.next_label();
            code.push_str(&format!("#take {} {} {}\n", source, bit_value(bit), skip));
            code.push_str(&format!(
                "#give {} {}\n",
                destination,
                bit_value(self.bit_permutation[bit] as usize)
            ));
            code.push_str(&wrapping_add_code(accumulator, self.patterns[bit] as u32));
            code.push_str(&format!(":{}\n", skip));
        }
        code
    }

    /// What [`Round::emit`]'s code computes: returns `(destination, accumulator)`
    /// for a destination that starts at 0.
    pub fn evaluate(&self, source: u16, accumulator: u16) -> (u16, u16) {
        let moving = (source as u32 + self.constant as u32) % MODULUS;
        let mut destination = 0u16;
        let mut acc = accumulator as u32 % MODULUS;
        for bit in 0..BITS {
            if moving & bit_value(bit) != 0 {
                destination |= 1 << self.bit_permutation[bit];
                acc = (acc + self.patterns[bit] as u32) % MODULUS;
            }
        }
        (destination, acc as u16)
    }
}
