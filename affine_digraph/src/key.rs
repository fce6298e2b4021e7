//! Affine keys and their derivation from assumed digraph correspondences
//!
//! If plaintext digraphs `X1, X2` encrypt to `Y1, Y2` under `(a, b)`, then
//! `Y1 − Y2 ≡ a·(X1 − X2) (mod A²)`. We solve `(Y1 − Y2)·t ≡ X1 − X2` for
//! `t = a⁻¹` and keep every `t` that inverts back to an `a`.

use std::fmt;

use tracing::trace;

use crate::alphabet::{Alphabet, Digraph};
use crate::error::{CrackError, Result};
use crate::modular::{mod_inverse, mul_mod, solve_linear_congruence};

/// Key `(a, b)` of the affine digraph cipher, both modulo `A²`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AffineKey {
    pub a: i64,
    pub b: i64,
}

impl AffineKey {
    pub fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    /// Both components reduced into `[0, modulus)`.
    pub fn normalized(self, modulus: i64) -> Self {
        Self { a: self.a.rem_euclid(modulus), b: self.b.rem_euclid(modulus) }
    }
}

impl fmt::Display for AffineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// Solves for key components from plaintext/ciphertext digraph pairs.
#[derive(Debug, Clone, Copy)]
pub struct KeyDeriver<'a> {
    alphabet: &'a Alphabet,
}

impl<'a> KeyDeriver<'a> {
    pub fn new(alphabet: &'a Alphabet) -> Self {
        Self { alphabet }
    }

    fn value(&self, digraph: Digraph) -> Result<i64> {
        self.alphabet
            .digraph_value(digraph)
            .ok_or_else(|| CrackError::InvalidDigraph(digraph.to_string()))
    }

    /// All invertible `a` consistent with `plain.0 -> cipher.0` and
    /// `plain.1 -> cipher.1`, in the order the congruence solver yields them.
    ///
    /// An unsolvable congruence gives an empty list rather than an error.
    ///
    /// # Errors
    ///
    /// [`CrackError::InvalidDigraph`] if a digraph is not over the alphabet.
    pub fn a_candidates(&self, plain: (Digraph, Digraph), cipher: (Digraph, Digraph)) -> Result<Vec<i64>> {
        let (x1, x2) = (self.value(plain.0)?, self.value(plain.1)?);
        let (y1, y2) = (self.value(cipher.0)?, self.value(cipher.1)?);
        let m = self.alphabet.modulus();

        let inverses = match solve_linear_congruence(y1 - y2, x1 - x2, m) {
            Ok(solutions) => solutions,
            Err(err) => {
                trace!(%err, "no a-candidates for {}{} -> {}{}", plain.0, plain.1, cipher.0, cipher.1);
                return Ok(Vec::new());
            }
        };

        Ok(inverses
            .into_iter()
            .filter_map(|t| match mod_inverse(t, m) {
                Ok(a) => Some(a),
                Err(err) => {
                    trace!(%err, "discarding t = {t}");
                    None
                }
            })
            .collect())
    }

    /// `b = (Y − a·X) mod A²` for one known pair `plain -> cipher`.
    pub fn b_component(&self, plain: Digraph, cipher: Digraph, a: i64) -> Result<i64> {
        let x = self.value(plain)?;
        let y = self.value(cipher)?;
        let m = self.alphabet.modulus();
        Ok((y - mul_mod(a, x, m)).rem_euclid(m))
    }

    /// Every full key consistent with both correspondences; `b` is taken
    /// from the first pair.
    pub fn derive_keys(&self, plain: (Digraph, Digraph), cipher: (Digraph, Digraph)) -> Result<Vec<AffineKey>> {
        self.a_candidates(plain, cipher)?
            .into_iter()
            .map(|a| self.b_component(plain.0, cipher.0, a).map(|b| AffineKey::new(a, b)))
            .collect()
    }
}
