//! Search configuration

use crate::alphabet::{Alphabet, Digraph};
use crate::error::{CrackError, Result};
use crate::frequency::PlausibilityThresholds;

/// Most frequent Russian digraphs, in the order they are tried.
pub const RUSSIAN_REFERENCE_DIGRAPHS: [&str; 5] = ["ст", "но", "то", "на", "ен"];

/// Number of top ciphertext digraphs paired against the references.
pub const DEFAULT_TOP_DIGRAPHS: usize = 5;

/// Which entries of the truncated ciphertext frequency table are paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingStrategy {
    /// Neighbouring ranks only: `(j, j + 1)`.
    #[default]
    Adjacent,
    /// Every `(i, j)` with `i < j`.
    AllPairs,
}

impl PairingStrategy {
    /// Index pairs into a ranked table of `len` entries, in search order.
    pub fn index_pairs(&self, len: usize) -> Vec<(usize, usize)> {
        match self {
            Self::Adjacent => (1..len).map(|j| (j - 1, j)).collect(),
            Self::AllPairs => (0..len)
                .flat_map(|i| (i + 1..len).map(move |j| (i, j)))
                .collect(),
        }
    }
}

/// Everything the key search needs besides the ciphertext.
#[derive(Debug, Clone, PartialEq)]
pub struct CrackerConfig {
    pub alphabet: Alphabet,
    /// Plaintext digraphs assumed to be among the most common.
    pub reference_digraphs: Vec<Digraph>,
    /// How many top-ranked ciphertext digraphs are considered (F).
    pub top_digraphs: usize,
    pub thresholds: PlausibilityThresholds,
    pub pairing: PairingStrategy,
    /// Stop after this many decryptions have been tried.
    pub max_candidates: Option<usize>,
}

impl CrackerConfig {
    pub fn new(alphabet: Alphabet, reference_digraphs: Vec<Digraph>) -> Self {
        Self {
            alphabet,
            reference_digraphs,
            top_digraphs: DEFAULT_TOP_DIGRAPHS,
            thresholds: PlausibilityThresholds::default(),
            pairing: PairingStrategy::default(),
            max_candidates: None,
        }
    }

    pub fn with_top_digraphs(mut self, top_digraphs: usize) -> Self {
        self.top_digraphs = top_digraphs;
        self
    }

    pub fn with_thresholds(mut self, thresholds: PlausibilityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_pairing(mut self, pairing: PairingStrategy) -> Self {
        self.pairing = pairing;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: Option<usize>) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Ordered pairs of distinct reference digraphs (2-permutations), in
    /// reference order.
    pub fn reference_permutations(&self) -> Vec<(Digraph, Digraph)> {
        let refs = &self.reference_digraphs;
        (0..refs.len())
            .flat_map(|i| (0..refs.len()).filter(move |&j| j != i).map(move |j| (refs[i], refs[j])))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.reference_digraphs.len() < 2 {
            return Err(CrackError::InvalidConfig(
                "at least two reference digraphs are required".to_string(),
            ));
        }

        self.alphabet.check_digraphs(&self.reference_digraphs)?;

        for (i, digraph) in self.reference_digraphs.iter().enumerate() {
            if self.reference_digraphs[..i].contains(digraph) {
                return Err(CrackError::InvalidConfig(format!(
                    "reference digraph {digraph} is listed twice"
                )));
            }
        }

        if self.top_digraphs < 2 {
            return Err(CrackError::InvalidConfig(
                "top digraph count must be at least 2".to_string(),
            ));
        }

        let PlausibilityThresholds { symbol_entropy, digraph_entropy } = self.thresholds;
        for bound in [symbol_entropy, digraph_entropy] {
            if !bound.is_finite() || bound <= 0.0 {
                return Err(CrackError::InvalidConfig(format!(
                    "entropy threshold {bound} must be a positive number"
                )));
            }
        }

        if self.max_candidates == Some(0) {
            return Err(CrackError::InvalidConfig(
                "candidate limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CrackerConfig {
    /// Russian alphabet with the `ст, но, то, на, ен` references.
    fn default() -> Self {
        let references = RUSSIAN_REFERENCE_DIGRAPHS
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        Self::new(Alphabet::russian(), references)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CrackerConfig::default();
        assert_eq!(config.reference_digraphs.len(), 5);
        assert_eq!(config.top_digraphs, 5);
        assert_eq!(config.pairing, PairingStrategy::Adjacent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reference_permutations_order() {
        let config = CrackerConfig::default();
        let permutations = config.reference_permutations();
        assert_eq!(permutations.len(), 20);
        assert_eq!(permutations[0], (Digraph('с', 'т'), Digraph('н', 'о')));
        assert_eq!(permutations[4], (Digraph('н', 'о'), Digraph('с', 'т')));
        assert_eq!(permutations[19], (Digraph('е', 'н'), Digraph('н', 'а')));
    }

    #[test]
    fn test_index_pairs() {
        assert_eq!(PairingStrategy::Adjacent.index_pairs(4), vec![(0, 1), (1, 2), (2, 3)]);
        assert!(PairingStrategy::Adjacent.index_pairs(1).is_empty());
        assert_eq!(
            PairingStrategy::AllPairs.index_pairs(3),
            vec![(0, 1), (0, 2), (1, 2)]
        );
    }

    #[test]
    fn test_validation_failures() {
        let base = CrackerConfig::default();

        let mut config = base.clone();
        config.reference_digraphs.truncate(1);
        assert!(matches!(config.validate(), Err(CrackError::InvalidConfig(_))));

        let mut config = base.clone();
        config.reference_digraphs.push(Digraph('s', 't'));
        assert!(matches!(config.validate(), Err(CrackError::InvalidConfig(_))));

        let mut config = base.clone();
        config.reference_digraphs.push(Digraph('с', 'т'));
        assert!(matches!(config.validate(), Err(CrackError::InvalidConfig(_))));

        let config = base.clone().with_top_digraphs(1);
        assert!(matches!(config.validate(), Err(CrackError::InvalidConfig(_))));

        let config = base.clone().with_thresholds(PlausibilityThresholds {
            symbol_entropy: f64::NAN,
            digraph_entropy: 4.2,
        });
        assert!(matches!(config.validate(), Err(CrackError::InvalidConfig(_))));

        let config = base.with_max_candidates(Some(0));
        assert!(matches!(config.validate(), Err(CrackError::InvalidConfig(_))));
    }
}
