//! Counter-keyed random stream.
//!
//! Draws are defined by seed + draw index, not by evolving generator state:
//! draw `i` hashes `i` (u64, little-endian) followed by the seed with BLAKE3 and
//! reduces the 256-bit digest modulo `n`. The digest range dwarfs any `n` we
//! use, so the modulo bias is ignored.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::RngError;

/// Length of seeds taken from the OS when no seed is given.
pub const SEED_LEN: usize = 16;

/// A source of uniform integers in a bounded range.
pub trait BoundedSource {
    /// Uniform value in `[0, n)`. Fails if `n == 0`.
    fn draw(&mut self, n: u64) -> Result<u64, RngError>;
}

impl<S: BoundedSource + ?Sized> BoundedSource for &mut S {
    fn draw(&mut self, n: u64) -> Result<u64, RngError> {
        (**self).draw(n)
    }
}

/// Seed + monotonically increasing draw counter.
///
/// Not `Clone`: two copies would hand out the same counter values.
#[derive(Debug)]
pub struct RandomStream {
    seed: Vec<u8>,
    counter: u64,
}

impl RandomStream {
    pub fn from_seed(seed: impl Into<Vec<u8>>) -> Self {
        Self {
            seed: seed.into(),
            counter: 0,
        }
    }

    /// Fresh stream seeded with `SEED_LEN` bytes from the OS.
    pub fn from_entropy() -> Self {
        let mut seed = vec![0u8; SEED_LEN];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(seed)
    }

    /// Seeded if `seed` is given, otherwise from OS entropy.
    pub fn new(seed: Option<&[u8]>) -> Self {
        match seed {
            Some(s) => Self::from_seed(s),
            None => Self::from_entropy(),
        }
    }

    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// Number of draws that consumed a counter value.
    pub fn draws(&self) -> u64 {
        self.counter
    }

    fn digest(&self) -> blake3::Hash {
        let mut h = blake3::Hasher::new();
        h.update(&self.counter.to_le_bytes());
        h.update(&self.seed);
        h.finalize()
    }
}

impl BoundedSource for RandomStream {
    fn draw(&mut self, n: u64) -> Result<u64, RngError> {
        match n {
            0 => Err(RngError::ZeroModulus),
            1 => Ok(0),
            _ => {
                let digest = self.digest();
                self.counter += 1;
                Ok(reduce_be(digest.as_bytes(), n))
            }
        }
    }
}

/// `bytes` read as a big-endian unsigned integer, modulo `n`.
///
/// Folds one byte at a time, so the result is exact for any input length.
pub(crate) fn reduce_be(bytes: &[u8], n: u64) -> u64 {
    let n = n as u128;
    bytes
        .iter()
        .fold(0u128, |acc, &b| ((acc << 8) | b as u128) % n) as u64
}
