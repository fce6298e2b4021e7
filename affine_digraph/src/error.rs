//! Error types for key recovery

use thiserror::Error;

/// Failures of the modular arithmetic helpers.
///
/// None of these are fatal during a key search: each one only means the
/// candidate at hand is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModularError {
    #[error("{value} has no inverse modulo {modulus} (gcd = {gcd})")]
    NoInverse { value: i64, modulus: i64, gcd: i64 },

    #[error("{a}·x ≡ {b} (mod {modulus}) has no solution (gcd = {gcd} does not divide {b})")]
    NoSolution { a: i64, b: i64, modulus: i64, gcd: i64 },

    #[error("degenerate congruence: coefficient is 0 modulo {modulus}")]
    Degenerate { modulus: i64 },

    #[error("invalid modulus {0} (must be > 0)")]
    InvalidModulus(i64),
}

/// Errors surfaced to callers of the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrackError {
    #[error("symbol {symbol:?} at position {position} is not part of the alphabet")]
    UnknownSymbol { symbol: char, position: usize },

    #[error("text has odd length {0}; digraph blocks need an even number of symbols")]
    OddLength(usize),

    #[error("alphabet needs at least two symbols, got {0}")]
    AlphabetTooSmall(usize),

    #[error("duplicate symbol {0:?} in alphabet")]
    DuplicateSymbol(char),

    #[error("invalid digraph {0:?}: expected two alphabet symbols")]
    InvalidDigraph(String),

    #[error("invalid step (must be > 0)")]
    InvalidStep,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Modular(#[from] ModularError),
}

pub type Result<T> = std::result::Result<T, CrackError>;
