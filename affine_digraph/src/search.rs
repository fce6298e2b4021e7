//! Ciphertext-only key search
//!
//! The search walks a fixed, finite enumeration:
//!
//! 1. every ordered pair of distinct reference digraphs (outer),
//! 2. every paired entry of the truncated ciphertext frequency table,
//! 3. every key the [`KeyDeriver`] produces for that assumption (inner),
//!
//! decrypting the whole ciphertext under each key and stopping at the first
//! text that passes the entropy test. Given the same ciphertext and
//! configuration the first hit is always the same.

use std::collections::VecDeque;

use tracing::{debug, info, trace};

use crate::alphabet::Digraph;
use crate::cipher::AffineDigraphCipher;
use crate::config::CrackerConfig;
use crate::error::{CrackError, Result};
use crate::frequency::{digraph_frequencies, EntropyProfile};
use crate::key::{AffineKey, KeyDeriver};

/// Lifecycle of a [`CandidateSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Frequency table not computed yet.
    Init,
    Enumerating,
    /// The last call produced a plausible decryption; the search can resume.
    Found,
    Exhausted,
}

/// Plaintext digraphs assumed to encrypt to two ciphertext digraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assumption {
    pub plain: (Digraph, Digraph),
    pub cipher: (Digraph, Digraph),
}

/// A key together with the plausible plaintext it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Recovery {
    pub key: AffineKey,
    pub plaintext: String,
    /// The correspondence the key was derived from.
    pub assumption: Assumption,
    pub entropy: EntropyProfile,
}

impl Recovery {
    /// First `symbols` symbols of the plaintext.
    pub fn preview(&self, symbols: usize) -> String {
        self.plaintext.chars().take(symbols).collect()
    }
}

/// Result of running a search to completion.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Recovery),
    /// No plausible decryption among all candidates.
    Exhausted { candidates_tried: usize },
}

impl SearchOutcome {
    pub fn recovery(&self) -> Option<&Recovery> {
        match self {
            Self::Found(recovery) => Some(recovery),
            Self::Exhausted { .. } => None,
        }
    }
}

/// Lazy enumeration of plausible decryptions.
///
/// Iterating yields every plausible [`Recovery`] in enumeration order;
/// [`CandidateSearch::run`] keeps only the first.
#[derive(Debug)]
pub struct CandidateSearch<'a> {
    config: &'a CrackerConfig,
    ciphertext: &'a str,
    deriver: KeyDeriver<'a>,
    top_digraphs: Vec<(Digraph, usize)>,
    assumptions: Vec<Assumption>,
    next_assumption: usize,
    pending: VecDeque<(AffineKey, Assumption)>,
    candidates_tried: usize,
    state: SearchState,
}

impl<'a> CandidateSearch<'a> {
    /// Validates the configuration and the ciphertext.
    ///
    /// # Errors
    ///
    /// [`CrackError::InvalidConfig`], [`CrackError::UnknownSymbol`] or
    /// [`CrackError::OddLength`]; nothing is searched in that case.
    pub fn new(config: &'a CrackerConfig, ciphertext: &'a str) -> Result<Self> {
        config.validate()?;

        let length = config.alphabet.encode(ciphertext)?.len();
        if length % 2 != 0 {
            return Err(CrackError::OddLength(length));
        }

        Ok(Self {
            config,
            ciphertext,
            deriver: KeyDeriver::new(&config.alphabet),
            top_digraphs: Vec::new(),
            assumptions: Vec::new(),
            next_assumption: 0,
            pending: VecDeque::new(),
            candidates_tried: 0,
            state: SearchState::Init,
        })
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Number of keys whose decryption has been tested so far.
    pub fn candidates_tried(&self) -> usize {
        self.candidates_tried
    }

    /// The truncated ranked frequency table (empty before the first step).
    pub fn top_digraphs(&self) -> &[(Digraph, usize)] {
        &self.top_digraphs
    }

    fn prepare(&mut self) -> Result<()> {
        let mut ranked = digraph_frequencies(self.ciphertext, 1)?.ranked();
        ranked.truncate(self.config.top_digraphs);
        debug!(?ranked, "top ciphertext digraphs");

        let pairs = self.config.pairing.index_pairs(ranked.len());
        self.assumptions = self
            .config
            .reference_permutations()
            .into_iter()
            .flat_map(|plain| {
                pairs.iter().map(move |&(i, j)| (plain, (i, j)))
            })
            .map(|(plain, (i, j))| Assumption { plain, cipher: (ranked[i].0, ranked[j].0) })
            .collect();
        self.top_digraphs = ranked;

        debug!(assumptions = self.assumptions.len(), "search space prepared");
        Ok(())
    }

    /// Pulls keys until one decrypts to plausible text.
    ///
    /// Returns `None` once the enumeration (or the candidate limit) is
    /// exhausted.
    pub fn next_plausible(&mut self) -> Option<Recovery> {
        match self.state {
            SearchState::Exhausted => return None,
            SearchState::Init => {
                if let Err(err) = self.prepare() {
                    debug!(%err, "could not rank ciphertext digraphs");
                    self.state = SearchState::Exhausted;
                    return None;
                }
            }
            SearchState::Enumerating | SearchState::Found => {}
        }
        self.state = SearchState::Enumerating;

        loop {
            if self.config.max_candidates.is_some_and(|limit| self.candidates_tried >= limit) {
                info!(tried = self.candidates_tried, "candidate limit reached");
                self.state = SearchState::Exhausted;
                return None;
            }

            let Some((key, assumption)) = self.pending.pop_front() else {
                if !self.queue_next_assumption() {
                    info!(tried = self.candidates_tried, "search exhausted without a plausible key");
                    self.state = SearchState::Exhausted;
                    return None;
                }
                continue;
            };

            self.candidates_tried += 1;
            if let Some(recovery) = self.try_key(key, assumption) {
                info!(key = %recovery.key, tried = self.candidates_tried, "plausible decryption found");
                self.state = SearchState::Found;
                return Some(recovery);
            }
        }
    }

    /// Derives the keys of the next assumption; false when none are left.
    fn queue_next_assumption(&mut self) -> bool {
        let Some(&assumption) = self.assumptions.get(self.next_assumption) else {
            return false;
        };
        self.next_assumption += 1;

        let Assumption { plain, cipher } = assumption;
        debug!("assuming {}{} -> {}{}", plain.0, plain.1, cipher.0, cipher.1);

        match self.deriver.derive_keys(plain, cipher) {
            Ok(keys) => self.pending.extend(keys.into_iter().map(|key| (key, assumption))),
            Err(err) => trace!(%err, "skipping assumption"),
        }
        true
    }

    fn try_key(&self, key: AffineKey, assumption: Assumption) -> Option<Recovery> {
        let plaintext = AffineDigraphCipher::new(&self.config.alphabet, key)
            .and_then(|cipher| cipher.decrypt(self.ciphertext));

        let plaintext = match plaintext {
            Ok(plaintext) => plaintext,
            Err(err) => {
                trace!(%key, %err, "skipping key");
                return None;
            }
        };

        let entropy = EntropyProfile::measure(&plaintext);
        trace!(%key, symbol = entropy.symbol, digraph = entropy.digraph, "candidate entropy");

        entropy
            .is_plausible(&self.config.thresholds)
            .then(|| Recovery { key, plaintext, assumption, entropy })
    }

    /// Runs to the first plausible decryption.
    pub fn run(mut self) -> SearchOutcome {
        match self.next_plausible() {
            Some(recovery) => SearchOutcome::Found(recovery),
            None => SearchOutcome::Exhausted { candidates_tried: self.candidates_tried },
        }
    }
}

impl Iterator for CandidateSearch<'_> {
    type Item = Recovery;

    fn next(&mut self) -> Option<Recovery> {
        self.next_plausible()
    }
}

/// Recovers the key of `ciphertext`, returning the first plausible decryption.
///
/// # Errors
///
/// Only for malformed input or configuration; an unsuccessful search is
/// [`SearchOutcome::Exhausted`].
pub fn recover_key(ciphertext: &str, config: &CrackerConfig) -> Result<SearchOutcome> {
    Ok(CandidateSearch::new(config, ciphertext)?.run())
}
