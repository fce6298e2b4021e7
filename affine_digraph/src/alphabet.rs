//! Alphabet and digraph encoding
//!
//! A digraph `(s1, s2)` over an alphabet of size `A` is encoded as the integer
//! `index(s1)·A + index(s2)` in `[0, A²)`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{CrackError, Result};

/// The 31-letter Russian alphabet used by the default configuration
/// (no `ё`, no `ъ`).
pub const RUSSIAN: &str = "абвгдежзийклмнопрстуфхцчшщьыэюя";

/// A block of two symbols, ordered by first then second symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digraph(pub char, pub char);

impl Digraph {
    pub fn new(first: char, second: char) -> Self {
        Self(first, second)
    }

    pub fn first(&self) -> char {
        self.0
    }

    pub fn second(&self) -> char {
        self.1
    }
}

impl fmt::Display for Digraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

impl FromStr for Digraph {
    type Err = CrackError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None) => Ok(Self(first, second)),
            _ => Err(CrackError::InvalidDigraph(s.to_string())),
        }
    }
}

/// Ordered set of unique symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    positions: HashMap<char, usize>,
}

impl Alphabet {
    /// Builds an alphabet from the symbols of `symbols`, in order.
    ///
    /// # Errors
    ///
    /// [`CrackError::AlphabetTooSmall`] for fewer than two symbols and
    /// [`CrackError::DuplicateSymbol`] when a symbol repeats.
    pub fn new(symbols: &str) -> Result<Self> {
        let symbols: Vec<char> = symbols.chars().collect();

        if symbols.len() < 2 {
            return Err(CrackError::AlphabetTooSmall(symbols.len()));
        }

        let mut positions = HashMap::with_capacity(symbols.len());
        for (index, &symbol) in symbols.iter().enumerate() {
            if positions.insert(symbol, index).is_some() {
                return Err(CrackError::DuplicateSymbol(symbol));
            }
        }

        Ok(Self { symbols, positions })
    }

    pub fn russian() -> Self {
        let symbols: Vec<char> = RUSSIAN.chars().collect();
        let positions = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { symbols, positions }
    }

    /// Number of symbols `A`.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The ring modulus `A²` used for digraph arithmetic.
    pub fn modulus(&self) -> i64 {
        let size = self.len() as i64;
        size * size
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.positions.contains_key(&symbol)
    }

    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.positions.get(&symbol).copied()
    }

    pub fn symbol_at(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Integer encoding of a digraph, or `None` if either symbol is foreign.
    pub fn digraph_value(&self, digraph: Digraph) -> Option<i64> {
        let first = self.index_of(digraph.0)?;
        let second = self.index_of(digraph.1)?;
        Some((first * self.len() + second) as i64)
    }

    /// Inverse of [`Alphabet::digraph_value`]; `value` is reduced modulo `A²`.
    pub fn digraph_from_value(&self, value: i64) -> Digraph {
        let value = value.rem_euclid(self.modulus()) as usize;
        let size = self.len();
        Digraph(self.symbols[value / size], self.symbols[value % size])
    }

    /// Maps every symbol of `text` to its index.
    ///
    /// # Errors
    ///
    /// [`CrackError::UnknownSymbol`] for the first symbol outside the alphabet.
    pub fn encode(&self, text: &str) -> Result<Vec<usize>> {
        text.chars()
            .enumerate()
            .map(|(position, symbol)| {
                self.index_of(symbol)
                    .ok_or(CrackError::UnknownSymbol { symbol, position })
            })
            .collect()
    }

    /// Checks that every digraph of `digraphs` belongs to the alphabet.
    pub fn check_digraphs(&self, digraphs: &[Digraph]) -> Result<()> {
        match digraphs.iter().find(|d| !self.contains(d.0) || !self.contains(d.1)) {
            Some(digraph) => Err(CrackError::InvalidConfig(format!(
                "digraph {digraph} uses symbols outside the alphabet"
            ))),
            None => Ok(()),
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::russian()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_russian_alphabet() {
        let alphabet = Alphabet::russian();
        assert_eq!(alphabet.len(), 31);
        assert_eq!(alphabet.modulus(), 961);
        assert_eq!(alphabet, Alphabet::new(RUSSIAN).unwrap());
    }

    #[test]
    fn test_digraph_encoding() {
        let alphabet = Alphabet::russian();
        let digraph: Digraph = "ст".parse().unwrap();
        // с = 17, т = 18
        assert_eq!(alphabet.digraph_value(digraph), Some(17 * 31 + 18));
        assert_eq!(alphabet.digraph_from_value(545), digraph);
        assert_eq!(alphabet.digraph_from_value(-1), Digraph('я', 'я'));
    }

    #[test]
    fn test_digraph_parse() {
        assert_eq!("ab".parse::<Digraph>(), Ok(Digraph('a', 'b')));
        assert!(matches!("abc".parse::<Digraph>(), Err(CrackError::InvalidDigraph(_))));
        assert!(matches!("a".parse::<Digraph>(), Err(CrackError::InvalidDigraph(_))));
        assert_eq!(Digraph('н', 'а').to_string(), "на");
    }

    #[test]
    fn test_alphabet_validation() {
        assert_eq!(Alphabet::new("a"), Err(CrackError::AlphabetTooSmall(1)));
        assert_eq!(Alphabet::new("abca"), Err(CrackError::DuplicateSymbol('a')));
    }

    #[test]
    fn test_encode_rejects_foreign_symbol() {
        let alphabet = Alphabet::new("abcd").unwrap();
        assert_eq!(alphabet.encode("dcba"), Ok(vec![3, 2, 1, 0]));
        assert_eq!(
            alphabet.encode("abxd"),
            Err(CrackError::UnknownSymbol { symbol: 'x', position: 2 })
        );
    }
}
