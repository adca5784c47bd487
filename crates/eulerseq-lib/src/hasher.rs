//! Deterministic hashing for node interning using ahash.
//!
//! Graph nodes are interned through a hash map keyed by node content. The map
//! is built from an AHasher state with explicit seeds so hashing does not
//! depend on per-process random keys. Iteration order never leaks out of the
//! graph (nodes are also kept in first-seen order), but fixed seeds keep
//! profiles and debug dumps reproducible.

use ahash::RandomState;
use std::collections::HashMap;
use std::hash::Hash;

/// Hash map used to intern graph nodes
pub type NodeIndexMap<N, V> = HashMap<N, V, RandomState>;

/// A deterministic hasher factory with a seeded state
#[derive(Clone)]
pub struct DeterministicHasher {
    seed: u64,
    state: RandomState,
}

impl DeterministicHasher {
    /// Create a new deterministic hasher with the given seed
    pub fn new(seed: u64) -> Self {
        let state = RandomState::with_seeds(seed, !seed, seed, !seed);
        Self { seed, state }
    }

    /// Hash any hashable value with the seeded state
    #[inline]
    pub fn hash_one<T: Hash>(&self, value: &T) -> u64 {
        self.state.hash_one(value)
    }

    /// Create an empty interning map that shares this hasher's seeds
    pub fn node_map<N, V>(&self) -> NodeIndexMap<N, V> {
        HashMap::with_hasher(self.state.clone())
    }

    /// Get the seed value
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
