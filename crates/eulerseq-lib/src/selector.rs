//! Candidate selection strategies
//!
//! Whenever a traversal has more than one unconsumed edge to leave a node by,
//! or a balanced graph has more than one valid start, the choice is delegated
//! to an [`EdgeSelector`]. Selection state is always owned by the caller, so a
//! run is reproducible from its inputs plus the selector's seed.

use crate::graph::{EdgeId, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks one candidate out of a non-empty list
pub trait EdgeSelector {
    /// Index into `candidates` of the edge to consume next
    ///
    /// `candidates` is never empty and lists the unconsumed outgoing edges of
    /// the current node in insertion order.
    fn select_edge(&mut self, candidates: &[EdgeId]) -> usize;

    /// Index into `candidates` of the node an Eulerian cycle starts from
    fn select_start(&mut self, candidates: &[NodeId]) -> usize {
        let _ = candidates;
        0
    }
}

/// Always takes the first candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl EdgeSelector for FirstCandidate {
    #[inline]
    fn select_edge(&mut self, _candidates: &[EdgeId]) -> usize {
        0
    }
}

/// Uniform random choice driven by a seeded `StdRng`
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: StdRng,
}

impl SeededRandom {
    /// Create a selector from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Get the seed value
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl EdgeSelector for SeededRandom {
    fn select_edge(&mut self, candidates: &[EdgeId]) -> usize {
        self.rng.gen_range(0..candidates.len())
    }

    fn select_start(&mut self, candidates: &[NodeId]) -> usize {
        self.rng.gen_range(0..candidates.len())
    }
}

impl<F> EdgeSelector for F
where
    F: FnMut(&[EdgeId]) -> usize,
{
    fn select_edge(&mut self, candidates: &[EdgeId]) -> usize {
        self(candidates)
    }
}

/// Selector picked from an optional seed: random when seeded, first candidate otherwise
#[derive(Debug, Clone)]
pub enum Selection {
    /// Deterministic first-candidate selection
    First(FirstCandidate),
    /// Seeded random selection
    Seeded(SeededRandom),
}

impl Selection {
    /// Build the selector matching an optional seed
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Selection::Seeded(SeededRandom::new(seed)),
            None => Selection::First(FirstCandidate),
        }
    }
}

impl EdgeSelector for Selection {
    fn select_edge(&mut self, candidates: &[EdgeId]) -> usize {
        match self {
            Selection::First(s) => s.select_edge(candidates),
            Selection::Seeded(s) => s.select_edge(candidates),
        }
    }

    fn select_start(&mut self, candidates: &[NodeId]) -> usize {
        match self {
            Selection::First(s) => s.select_start(candidates),
            Selection::Seeded(s) => s.select_start(candidates),
        }
    }
}
