//! Combinatorial sampling on top of a [`BoundedSource`].
//!
//! Every operation validates its input before the first draw, so a failed call
//! never consumes randomness or touches caller data.

use std::collections::BTreeSet;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::RngError;
use crate::source::BoundedSource;

/// Pairwise row trades per matrix column in `matrix_shuffle`.
pub const TRADES_PER_COLUMN: usize = 10;

/// Sampling helpers, available on every bounded source.
pub trait Sampler: BoundedSource {
    /// Fisher-Yates over the first `k` positions of `items`, in place.
    ///
    /// Afterwards `items[..k]` is a uniform `k`-sample of the original slice.
    fn partial_shuffle<T>(&mut self, items: &mut [T], k: usize) -> Result<(), RngError> {
        let len = items.len();
        if k > len {
            return Err(RngError::SampleSize { k, len });
        }
        for i in 0..k {
            let j = i + self.draw((len - i) as u64)? as usize;
            items.swap(i, j);
        }
        Ok(())
    }

    /// `k` distinct positions of `items`, drawn without replacement.
    fn sample<T: Clone>(&mut self, items: &[T], k: usize) -> Result<Vec<T>, RngError> {
        if k > items.len() {
            return Err(RngError::SampleSize {
                k,
                len: items.len(),
            });
        }
        let mut out = items.to_vec();
        self.partial_shuffle(&mut out, k)?;
        out.truncate(k);
        Ok(out)
    }

    fn shuffle<T: Clone>(&mut self, items: &[T]) -> Result<Vec<T>, RngError> {
        self.sample(items, items.len())
    }

    /// Integer whose binary form has exactly `ones` 1-bits and `zeros` 0-bits
    /// (counting leading zeros), in shuffled order.
    fn constrained_number(&mut self, ones: u32, zeros: u32) -> Result<u64, RngError> {
        let bits = ones as u64 + zeros as u64;
        if bits > 64 {
            return Err(RngError::TooManyBits { bits });
        }
        let mut pattern = vec![1u64; ones as usize];
        pattern.resize(bits as usize, 0);
        let shuffled = self.shuffle(&pattern)?;
        Ok(shuffled.into_iter().fold(0u64, |acc, bit| (acc << 1) | bit))
    }

    /// `count` integers of `bits_per_number` bits with (near-)equal 1s and 0s.
    ///
    /// Even widths: every value has weight `bits/2`. Odd widths: weights come
    /// from shuffled (floor, ceil) pairs truncated to `count`, so the total
    /// weight is `floor` or `ceil` of `count * bits / 2`.
    fn balanced_numbers(&mut self, count: usize, bits_per_number: u32) -> Result<Vec<u64>, RngError> {
        if bits_per_number > 64 {
            return Err(RngError::TooManyBits {
                bits: bits_per_number as u64,
            });
        }
        let low = bits_per_number / 2;
        let weights = if bits_per_number % 2 == 0 {
            vec![low; count]
        } else {
            let pairs = count.div_ceil(2);
            let mut w = Vec::with_capacity(pairs * 2);
            for _ in 0..pairs {
                w.push(low);
                w.push(low + 1);
            }
            let mut w = self.shuffle(&w)?;
            w.truncate(count);
            w
        };
        weights
            .into_iter()
            .map(|weight| self.constrained_number(weight, bits_per_number - weight))
            .collect()
    }

    /// One cycle through every item: `item -> successor` in shuffled order,
    /// last wrapping to first. No fixed points when there are 2+ items.
    fn cycle_map<T: Clone + Eq + Hash>(&mut self, items: &[T]) -> Result<FxHashMap<T, T>, RngError> {
        let order = self.shuffle(items)?;
        let mut map = FxHashMap::default();
        for (i, item) in order.iter().enumerate() {
            let next = &order[(i + 1) % order.len()];
            map.insert(item.clone(), next.clone());
        }
        Ok(map)
    }

    /// Randomly rearranges the 1s of a 0/1 matrix, keeping every row sum and
    /// every column sum.
    ///
    /// Matrices with at most one row or column cannot change and are returned
    /// as-is. Tall matrices are shuffled through their transpose.
    fn matrix_shuffle(&mut self, matrix: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, RngError> {
        let width = validate_binary(matrix)?;
        let height = matrix.len();
        if height <= 1 || width <= 1 {
            return Ok(matrix.to_vec());
        }
        if height > width {
            let shuffled = self.matrix_shuffle(&transpose(matrix, width))?;
            return Ok(transpose(&shuffled, height));
        }

        // Row r = set of columns holding a 1.
        let mut rows: Vec<BTreeSet<usize>> = matrix
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &v)| v == 1)
                    .map(|(c, _)| c)
                    .collect()
            })
            .collect();
        let row_ids: Vec<usize> = (0..height).collect();

        for _ in 0..TRADES_PER_COLUMN * width {
            let pair = self.sample(&row_ids, 2)?;
            let (a, b) = (pair[0], pair[1]);
            let a_gives: Vec<usize> = rows[a].difference(&rows[b]).copied().collect();
            let b_gives: Vec<usize> = rows[b].difference(&rows[a]).copied().collect();
            let max = a_gives.len().min(b_gives.len());
            if max == 0 {
                continue;
            }
            let size = 1 + self.draw(max as u64)? as usize;
            let from_a = self.sample(&a_gives, size)?;
            let from_b = self.sample(&b_gives, size)?;
            for c in from_a {
                rows[a].remove(&c);
                rows[b].insert(c);
            }
            for c in from_b {
                rows[b].remove(&c);
                rows[a].insert(c);
            }
        }

        Ok(rows
            .iter()
            .map(|ones| (0..width).map(|c| u8::from(ones.contains(&c))).collect())
            .collect())
    }
}

impl<S: BoundedSource + ?Sized> Sampler for S {}

/// Checks the matrix is rectangular and 0/1; returns its width.
fn validate_binary(matrix: &[Vec<u8>]) -> Result<usize, RngError> {
    let width = matrix.first().map_or(0, Vec::len);
    for (row, cells) in matrix.iter().enumerate() {
        if cells.len() != width {
            return Err(RngError::Ragged {
                row,
                len: cells.len(),
                expected: width,
            });
        }
        if let Some((col, &value)) = cells.iter().enumerate().find(|&(_, &v)| v > 1) {
            return Err(RngError::NonBinary { row, col, value });
        }
    }
    Ok(width)
}

fn transpose(matrix: &[Vec<u8>], width: usize) -> Vec<Vec<u8>> {
    (0..width)
        .map(|c| matrix.iter().map(|row| row[c]).collect())
        .collect()
}
