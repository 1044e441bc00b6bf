use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RngError {
    #[error("bounded draw needs n >= 1")]
    ZeroModulus,
    #[error("sample size {k} is outside [0, {len}]")]
    SampleSize { k: usize, len: usize },
    #[error("constrained number needs {bits} bits, at most 64 fit")]
    TooManyBits { bits: u64 },
    #[error("matrix entry at ({row}, {col}) is {value}, expected 0 or 1")]
    NonBinary { row: usize, col: usize, value: u8 },
    #[error("matrix row {row} has {len} columns, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
}
