//! Affine substitution over digraph blocks
//!
//! Each non-overlapping block `X` is mapped to `Y = (a·X + b) mod A²` and
//! back with `X = a⁻¹·(Y − b) mod A²`.

use crate::alphabet::{Alphabet, Digraph};
use crate::error::{CrackError, Result};
use crate::key::AffineKey;
use crate::modular::{mod_inverse, mul_mod};

/// An affine digraph cipher bound to an alphabet and a key.
///
/// Construction fails if `a` is not invertible modulo `A²`, so a live
/// instance can always decrypt.
#[derive(Debug, Clone)]
pub struct AffineDigraphCipher<'a> {
    alphabet: &'a Alphabet,
    key: AffineKey,
    a_inverse: i64,
}

impl<'a> AffineDigraphCipher<'a> {
    pub fn new(alphabet: &'a Alphabet, key: AffineKey) -> Result<Self> {
        let key = key.normalized(alphabet.modulus());
        let a_inverse = mod_inverse(key.a, alphabet.modulus())?;
        Ok(Self { alphabet, key, a_inverse })
    }

    /// The key, reduced into `[0, A²)`.
    pub fn key(&self) -> AffineKey {
        self.key
    }

    pub fn encrypt_value(&self, x: i64) -> i64 {
        let m = self.alphabet.modulus();
        (mul_mod(self.key.a, x, m) + self.key.b).rem_euclid(m)
    }

    pub fn decrypt_value(&self, y: i64) -> i64 {
        let m = self.alphabet.modulus();
        mul_mod(self.a_inverse, y - self.key.b, m)
    }

    pub fn encrypt_digraph(&self, digraph: Digraph) -> Option<Digraph> {
        let x = self.alphabet.digraph_value(digraph)?;
        Some(self.alphabet.digraph_from_value(self.encrypt_value(x)))
    }

    pub fn decrypt_digraph(&self, digraph: Digraph) -> Option<Digraph> {
        let y = self.alphabet.digraph_value(digraph)?;
        Some(self.alphabet.digraph_from_value(self.decrypt_value(y)))
    }

    /// Encrypts `plaintext` block by block.
    ///
    /// # Errors
    ///
    /// [`CrackError::UnknownSymbol`] or [`CrackError::OddLength`].
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        self.map_blocks(plaintext, |x| self.encrypt_value(x))
    }

    /// Decrypts `ciphertext` block by block.
    ///
    /// # Errors
    ///
    /// [`CrackError::UnknownSymbol`] or [`CrackError::OddLength`].
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        self.map_blocks(ciphertext, |y| self.decrypt_value(y))
    }

    fn map_blocks(&self, text: &str, transform: impl Fn(i64) -> i64) -> Result<String> {
        let indices = self.alphabet.encode(text)?;
        if indices.len() % 2 != 0 {
            return Err(CrackError::OddLength(indices.len()));
        }

        let size = self.alphabet.len();
        let mut output = String::with_capacity(text.len());

        for block in indices.chunks(2) {
            let value = transform((block[0] * size + block[1]) as i64);
            let digraph = self.alphabet.digraph_from_value(value);
            output.push(digraph.first());
            output.push(digraph.second());
        }

        Ok(output)
    }
}

/// Encrypts `plaintext` under `key`.
pub fn encrypt(plaintext: &str, key: AffineKey, alphabet: &Alphabet) -> Result<String> {
    AffineDigraphCipher::new(alphabet, key)?.encrypt(plaintext)
}

/// Decrypts `ciphertext` under `key`.
///
/// # Errors
///
/// Besides malformed text, fails with [`CrackError::Modular`] when `key.a`
/// has no inverse modulo `A²`.
pub fn decrypt(ciphertext: &str, key: AffineKey, alphabet: &Alphabet) -> Result<String> {
    AffineDigraphCipher::new(alphabet, key)?.decrypt(ciphertext)
}
