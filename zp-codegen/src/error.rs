use thiserror::Error;
use zp_core::Register;
use zp_rng::RngError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("randomness: {0}")]
    Rng(#[from] RngError),
    #[error("round count must be at least 1")]
    ZeroRounds,
    #[error("register {0} is used for more than one role")]
    DuplicateRegister(Register),
    #[error("label prefix {0:?} must consist of [A-Za-z0-9_]")]
    InvalidLabelPrefix(String),
}
