//! Symbol and digraph statistics, and the entropy plausibility test

use std::collections::BTreeMap;

use tracing::trace;

use crate::alphabet::Digraph;
use crate::error::{CrackError, Result};

/// Occurrence counts keyed by symbol or digraph, held in key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<K: Ord> {
    counts: BTreeMap<K, usize>,
}

impl<K: Ord + Copy> FrequencyTable<K> {
    pub fn new() -> Self {
        Self { counts: BTreeMap::new() }
    }

    pub fn add(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn count(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &usize)> {
        self.counts.iter()
    }

    /// Entries sorted by count descending, ties broken by key ascending.
    pub fn ranked(&self) -> Vec<(K, usize)> {
        let mut entries: Vec<(K, usize)> = self.counts.iter().map(|(&k, &c)| (k, c)).collect();
        entries.sort_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then(ka.cmp(kb)));
        entries
    }
}

impl<K: Ord + Copy> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Copy> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.add(key);
        }
        table
    }
}

/// Counts every symbol of `text`.
pub fn symbol_frequencies(text: &str) -> FrequencyTable<char> {
    text.chars().collect()
}

/// Counts the digraphs starting at positions `0, step, 2·step, ...`.
///
/// `step = 1` counts overlapping pairs (the statistical sample used for
/// ranking); `step = 2` counts the non-overlapping cipher blocks. Call
/// [`FrequencyTable::ranked`] on the result for the sorted view.
///
/// # Errors
///
/// [`CrackError::InvalidStep`] if `step == 0`.
pub fn digraph_frequencies(text: &str, step: usize) -> Result<FrequencyTable<Digraph>> {
    if step == 0 {
        return Err(CrackError::InvalidStep);
    }

    let symbols: Vec<char> = text.chars().collect();
    Ok(symbols
        .windows(2)
        .step_by(step)
        .map(|pair| Digraph(pair[0], pair[1]))
        .collect())
}

/// Shannon entropy (bits) of `count / sample_size` over the table, divided
/// by `block_length` to give a per-symbol figure for multi-symbol blocks.
///
/// `sample_size` must be at least [`FrequencyTable::total`]. Terms are summed
/// in key order, so equal tables always give bit-identical results. An empty
/// sample has entropy 0.
pub fn entropy<K: Ord + Copy>(
    table: &FrequencyTable<K>,
    sample_size: usize,
    block_length: usize,
) -> f64 {
    if sample_size == 0 || block_length == 0 {
        return 0.0;
    }

    debug_assert!(
        table.total() <= sample_size,
        "sample size {sample_size} is below the table total {}",
        table.total()
    );

    let n = sample_size as f64;
    let sum: f64 = table
        .iter()
        .map(|(_, &count)| {
            let p = count as f64 / n;
            p * p.log2()
        })
        .sum();

    if sum == 0.0 {
        return 0.0;
    }

    -sum / block_length as f64
}

/// Entropy bounds below which a text is taken to be natural language.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibilityThresholds {
    /// Upper bound on single-symbol entropy, in bits.
    pub symbol_entropy: f64,
    /// Upper bound on per-symbol digraph entropy, in bits.
    pub digraph_entropy: f64,
}

impl Default for PlausibilityThresholds {
    /// Calibrated for Russian text over the 31-letter alphabet.
    fn default() -> Self {
        Self { symbol_entropy: 4.5, digraph_entropy: 4.2 }
    }
}

/// Symbol and digraph entropy of one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyProfile {
    pub symbol: f64,
    pub digraph: f64,
}

impl EntropyProfile {
    /// Measures both entropies, using the text length as the sample size
    /// for each (the calibration the default thresholds assume).
    pub fn measure(text: &str) -> Self {
        let symbols: Vec<char> = text.chars().collect();
        let length = symbols.len();

        let singles: FrequencyTable<char> = symbols.iter().copied().collect();
        let pairs: FrequencyTable<Digraph> =
            symbols.windows(2).map(|pair| Digraph(pair[0], pair[1])).collect();

        Self {
            symbol: entropy(&singles, length, 1),
            digraph: entropy(&pairs, length, 2),
        }
    }

    pub fn is_plausible(&self, thresholds: &PlausibilityThresholds) -> bool {
        self.symbol < thresholds.symbol_entropy && self.digraph < thresholds.digraph_entropy
    }
}

/// True when `text` looks like natural language under `thresholds`.
pub fn is_plausible_plaintext(text: &str, thresholds: &PlausibilityThresholds) -> bool {
    let profile = EntropyProfile::measure(text);
    trace!(symbol = profile.symbol, digraph = profile.digraph, "entropy profile");
    profile.is_plausible(thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_digraph_frequencies_overlapping() {
        let table = digraph_frequencies("abcab", 1).unwrap();
        assert_eq!(table.total(), 4);
        assert_eq!(
            table.ranked(),
            vec![(Digraph('a', 'b'), 2), (Digraph('b', 'c'), 1), (Digraph('c', 'a'), 1)]
        );
    }

    #[test]
    fn test_digraph_frequencies_step() {
        let table = digraph_frequencies("abcab", 2).unwrap();
        assert_eq!(table.total(), 2);
        assert_eq!(table.count(&Digraph('a', 'b')), 1);
        assert_eq!(table.count(&Digraph('c', 'a')), 1);
        assert_eq!(table.count(&Digraph('b', 'c')), 0);

        assert!(matches!(digraph_frequencies("abc", 0), Err(CrackError::InvalidStep)));
    }

    #[test]
    fn test_digraph_frequencies_short_text() {
        assert!(digraph_frequencies("", 1).unwrap().is_empty());
        assert!(digraph_frequencies("a", 1).unwrap().is_empty());
    }

    #[test]
    fn test_ranked_tie_break() {
        let table = digraph_frequencies("zyxwzy", 1).unwrap();
        let ranked = table.ranked();
        assert_eq!(ranked[0], (Digraph('z', 'y'), 2));
        // Remaining ties come out in ascending key order
        let tail: Vec<Digraph> = ranked[1..].iter().map(|(d, _)| *d).collect();
        assert_eq!(tail, vec![Digraph('w', 'z'), Digraph('x', 'w'), Digraph('y', 'x')]);
    }

    #[test]
    fn test_entropy_of_constant_sample_is_zero() {
        let table = symbol_frequencies("aaaaaaa");
        assert_eq!(entropy(&table, 7, 1), 0.0);

        let pairs = digraph_frequencies("abababab", 2).unwrap();
        assert_eq!(entropy(&pairs, 4, 2), 0.0);
    }

    #[test]
    fn test_entropy_of_uniform_sample() {
        let table = symbol_frequencies("abcdefgh");
        assert!((entropy(&table, 8, 1) - 3.0).abs() < EPSILON);

        let table = symbol_frequencies("abcabcabc");
        assert!((entropy(&table, 9, 1) - 3f64.log2()).abs() < EPSILON);
        assert!((entropy(&table, 9, 2) - 3f64.log2() / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_entropy_is_reproducible() {
        let text = include_str!("../tests/fixtures/sample_plaintext.txt").trim();
        let first = EntropyProfile::measure(text);
        for _ in 0..200 {
            let again = EntropyProfile::measure(text);
            assert_eq!(again.symbol.to_bits(), first.symbol.to_bits());
            assert_eq!(again.digraph.to_bits(), first.digraph.to_bits());
        }
    }

    #[test]
    fn test_iter_is_in_key_order() {
        let table = symbol_frequencies("cabbca");
        let keys: Vec<char> = table.iter().map(|(&k, _)| k).collect();
        assert_eq!(keys, vec!['a', 'b', 'c']);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "below the table total")]
    fn test_entropy_rejects_short_sample_size() {
        let table = symbol_frequencies("aabb");
        entropy(&table, 2, 1);
    }

    #[test]
    fn test_entropy_of_empty_sample() {
        assert_eq!(entropy(&FrequencyTable::<char>::new(), 0, 1), 0.0);
    }

    #[test]
    fn test_plausibility_thresholds() {
        let thresholds = PlausibilityThresholds::default();
        assert!(is_plausible_plaintext("нанананана", &thresholds));

        let strict = PlausibilityThresholds { symbol_entropy: 0.5, digraph_entropy: 4.2 };
        assert!(!is_plausible_plaintext("абвгдежзийклмнопрстуфхцчшщьыэюя", &strict));
    }

    #[test]
    fn test_uniform_text_is_not_plausible() {
        let alphabet: String = crate::alphabet::RUSSIAN.chars().cycle().take(31 * 12).collect();
        let profile = EntropyProfile::measure(&alphabet);
        assert!((profile.symbol - 31f64.log2()).abs() < EPSILON);
        assert!(!profile.is_plausible(&PlausibilityThresholds::default()));
    }
}
