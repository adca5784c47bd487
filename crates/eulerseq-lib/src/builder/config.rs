//! Assembly configuration
//!
//! Parameters shared by graph construction, traversal and reconstruction.

use crate::alphabet::Alphabet;
use crate::constants::{is_valid_k, DEFAULT_SEED, INFER_K};
use std::fmt;

/// What to do with a fragment that fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Reject the whole input with a `ConstructionError`
    #[default]
    Strict,
    /// Drop the fragment, log it, and keep building
    Permissive,
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::Strict => f.write_str("strict"),
            OverlapPolicy::Permissive => f.write_str("permissive"),
        }
    }
}

/// Configuration parameters for an assembly request
#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    /// Fragment length (0 = infer from the first fragment)
    pub k: usize,

    /// Gap between the two k-mers of a read pair
    pub gap: usize,

    /// Symbols allowed in fragments
    pub alphabet: Alphabet,

    /// Handling of malformed fragments
    pub policy: OverlapPolicy,

    /// Seed for random edge/start selection (`None` = always take the first candidate)
    pub seed: Option<u64>,

    /// Seed for the node-interning hasher
    pub hash_seed: u64,

    /// Log the full trail and every contig at info level
    pub verbose: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            k: INFER_K,
            gap: 0,
            alphabet: Alphabet::Dna,
            policy: OverlapPolicy::Strict,
            seed: None,
            hash_seed: DEFAULT_SEED,
            verbose: false,
        }
    }
}

impl AssemblyConfig {
    /// Create a configuration for fragments of length k
    pub fn new(k: usize) -> Result<Self, String> {
        let config = Self {
            k,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration for read pairs of length k separated by `gap`
    pub fn paired(k: usize, gap: usize) -> Result<Self, String> {
        let config = Self {
            k,
            gap,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Whether k is taken from the first fragment
    pub fn infers_k(&self) -> bool {
        self.k == INFER_K
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if !self.infers_k() && !is_valid_k(self.k) {
            return Err(format!("k must be positive, got k={}", self.k));
        }
        if self.gap > 0 && self.infers_k() {
            return Err(format!(
                "k must be given explicitly for paired input (gap={})",
                self.gap
            ));
        }
        Ok(())
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        tracing::info!("Assembly Configuration:");
        if self.infers_k() {
            tracing::info!("  k = inferred from input");
        } else {
            tracing::info!("  k = {}", self.k);
        }
        tracing::info!("  gap = {}", self.gap);
        tracing::info!("  alphabet = {}", self.alphabet);
        tracing::info!("  policy = {}", self.policy);
        match self.seed {
            Some(seed) => tracing::info!("  selection = seeded random (seed {})", seed),
            None => tracing::info!("  selection = first candidate"),
        }
        tracing::debug!("  hash_seed = {}", self.hash_seed);
        tracing::debug!("  verbose = {}", self.verbose);
    }
}
