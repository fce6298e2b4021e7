//! # Affine Digraph Cryptanalysis Library
//!
//! This library recovers the key of an affine substitution cipher applied to
//! digraphs, given only the ciphertext.
//!
//! ## How it works
//!
//! - Every digraph `(s1, s2)` is an integer `X = index(s1)·A + index(s2)` in
//!   `[0, A²)` and encrypts to `Y = (a·X + b) mod A²`.
//! - The most frequent ciphertext digraphs are matched against digraphs
//!   assumed to be common in the plaintext language.
//! - Each matching of two pairs yields a linear congruence for `a`; `b`
//!   follows from either pair.
//! - Every candidate key decrypts the ciphertext, and the first text whose
//!   symbol and digraph entropy fall below the configured bounds wins.
//!
//! ## Usage
//!
//! ```rust
//! use affine_digraph::{encrypt, recover_key, AffineKey, Alphabet, CrackerConfig, SearchOutcome};
//!
//! let config = CrackerConfig::default();
//! let ciphertext = encrypt("нанана", AffineKey::new(7, 3), &Alphabet::russian())?;
//!
//! match recover_key(&ciphertext, &config)? {
//!     SearchOutcome::Found(recovery) => println!("Key = {}", recovery.key),
//!     SearchOutcome::Exhausted { candidates_tried } => {
//!         println!("no key found after {candidates_tried} candidates")
//!     }
//! }
//! # Ok::<(), affine_digraph::CrackError>(())
//! ```

// Public modules
pub mod alphabet;
pub mod cipher;
pub mod config;
pub mod error;
pub mod frequency;
pub mod key;
pub mod modular;
pub mod search;

// Re-exports for easy access
pub use alphabet::{Alphabet, Digraph, RUSSIAN};
pub use cipher::{decrypt, encrypt, AffineDigraphCipher};
pub use config::{CrackerConfig, PairingStrategy};
pub use error::{CrackError, ModularError, Result};
pub use frequency::{
    digraph_frequencies, entropy, is_plausible_plaintext, symbol_frequencies, EntropyProfile,
    FrequencyTable, PlausibilityThresholds,
};
pub use key::{AffineKey, KeyDeriver};
pub use modular::{extended_gcd, mod_inverse, solve_linear_congruence};
pub use search::{recover_key, Assumption, CandidateSearch, Recovery, SearchOutcome, SearchState};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
