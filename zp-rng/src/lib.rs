//! zp-rng: seeded bounded draws and the combinatorial sampling built on them.
//!
//! Everything random in zp flows through one capability, [`BoundedSource::draw`].
//! [`RandomStream`] is the production source: draw `i` is BLAKE3 over
//! `(i, seed)`, so a seed fully determines every generated permutation.
//! [`Sampler`] layers shuffling, sampling, balanced-weight integers, cycle maps
//! and sum-preserving matrix shuffles on top of any source.

pub mod error;
pub mod sampler;
pub mod source;

pub use error::RngError;
pub use sampler::Sampler;
pub use source::{BoundedSource, RandomStream, SEED_LEN};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod source_tests;
