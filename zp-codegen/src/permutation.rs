//! Multi-round Feistel permutation over two 15-bit registers.
//!
//! Three registers take part: two hold the live halves, one is empty. Each
//! round drains the first full register into the empty one and hashes it into
//! the second, then the roles rotate:
//!
//! ```text
//!   A:  x --+       +-> z       z --+
//!   B:  y   |   y --+       +-> x   |   x -- ...
//!   T:      +-> x       x --+       +-> z
//! ```
//!
//! Every three rounds the layout is back where it started. Otherwise a
//! fix-up tail moves the temporary register's value into the empty value
//! register, complementing each bit on the way (one line per bit instead of
//! two). The complement is assumed, not proven, to leave the permutation's
//! quality intact.

use serde::Serialize;
use zp_core::{Register, MAX_VALUE};
use zp_rng::Sampler;

use crate::emit::bit_value;
use crate::error::CodegenError;
use crate::label::LabelMaker;
use crate::round::{Round, BITS};

/// The three distinct registers a permutation is compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisterLayout {
    pub value_a: Register,
    pub value_b: Register,
    /// Must be 0 on entry; is 0 on exit.
    pub temp: Register,
}

impl RegisterLayout {
    pub fn new(value_a: Register, value_b: Register, temp: Register) -> Result<Self, CodegenError> {
        let layout = Self {
            value_a,
            value_b,
            temp,
        };
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), CodegenError> {
        if self.value_a == self.value_b || self.value_a == self.temp {
            return Err(CodegenError::DuplicateRegister(self.value_a));
        }
        if self.value_b == self.temp {
            return Err(CodegenError::DuplicateRegister(self.value_b));
        }
        Ok(())
    }
}

impl Default for RegisterLayout {
    fn default() -> Self {
        Self {
            value_a: Register::Ammo,
            value_b: Register::Gems,
            temp: Register::Score,
        }
    }
}

/// Role assignment between rounds.
#[derive(Debug, Clone, Copy)]
struct Braid<T: Copy> {
    full: [T; 2],
    empty: T,
}

impl<T: Copy> Braid<T> {
    fn new(a: T, b: T, temp: T) -> Self {
        Self {
            full: [a, b],
            empty: temp,
        }
    }

    /// (source, destination, accumulator) of the next round.
    fn roles(&self) -> (T, T, T) {
        (self.full[0], self.empty, self.full[1])
    }

    fn rotate(&mut self) {
        let drained = self.full[0];
        self.full = [self.full[1], self.empty];
        self.empty = drained;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permutation {
    rounds: Vec<Round>,
}

impl Permutation {
    /// `round_count` rounds drawn in order from one source.
    pub fn generate<S: Sampler>(round_count: u32, source: &mut S) -> Result<Self, CodegenError> {
        if round_count == 0 {
            return Err(CodegenError::ZeroRounds);
        }
        let mut rounds = Vec::with_capacity(round_count as usize);
        for _ in 0..round_count {
            rounds.push(Round::generate(source)?);
        }
        Ok(Self { rounds })
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Program text permuting the joint 30-bit value `(value_a, value_b)`.
    pub fn generate_code(&self, layout: &RegisterLayout, label_prefix: &str) -> Result<String, CodegenError> {
        layout.validate()?;
        let mut labels = LabelMaker::new(label_prefix)?;

        let mut code = String::new();
        let mut braid = Braid::new(layout.value_a, layout.value_b, layout.temp);
        for round in &self.rounds {
            let (source, destination, accumulator) = braid.roles();
            code.push_str(&round.emit(source, destination, accumulator, &mut labels));
            braid.rotate();
        }

        if braid.empty != layout.temp {
            for bit in (0..BITS).rev() {
                let value = bit_value(bit);
                code.push_str(&format!(
                    "#take {} {} give {} {}\n",
                    layout.temp, value, braid.empty, value
                ));
            }
        }
        Ok(code)
    }

    /// What [`Permutation::generate_code`]'s program computes, natively.
    pub fn evaluate(&self, a: u16, b: u16) -> (u16, u16) {
        const A: usize = 0;
        const B: usize = 1;
        const T: usize = 2;
        let mut values = [a & MAX_VALUE, b & MAX_VALUE, 0u16];

        let mut braid = Braid::new(A, B, T);
        for round in &self.rounds {
            let (source, destination, accumulator) = braid.roles();
            let (moved, hashed) = round.evaluate(values[source], values[accumulator]);
            values[source] = 0;
            values[destination] = moved;
            values[accumulator] = hashed;
            braid.rotate();
        }

        if braid.empty != T {
            values[braid.empty] = !values[T] & MAX_VALUE;
            values[T] = 0;
        }
        (values[A], values[B])
    }
}
