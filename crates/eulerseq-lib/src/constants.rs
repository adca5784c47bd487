//! Constants and configuration for eulerseq
//!
//! This module defines the defaults and limits shared by graph
//! construction, traversal and the universal-string generator.

/// Default seed for the node-interning hasher and the opt-in random selector
pub const DEFAULT_SEED: u64 = 1;

/// Fragment length meaning "infer k from the first fragment"
pub const INFER_K: usize = 0;

/// Smallest fragment length accepted by the graph builder
///
/// With k = 1 every node is the empty boundary and every edge is a self-loop,
/// which is still a valid (if degenerate) de Bruijn graph.
pub const MIN_K: usize = 1;

/// Largest k accepted by the universal circular string generator
///
/// The complete binary de Bruijn graph has 2^k edges, so this caps the
/// arena at 16M edges.
pub const MAX_UNIVERSAL_K: usize = 24;

/// Symbol separating the halves of a read pair in datasets and display output
pub const PAIR_SEPARATOR: char = '|';

/// Symbol joining nodes when a trail is printed
pub const TRAIL_SEPARATOR: &str = "->";

/// Version number
pub const VERSION: (u8, u8, u8) = (0, 1, 0);

/// Check if a fragment length is usable by the graph builder
#[inline]
pub const fn is_valid_k(k: usize) -> bool {
    k >= MIN_K
}

/// Number of edges in the complete binary de Bruijn graph of order k
#[inline]
pub const fn universal_edge_count(k: usize) -> usize {
    1usize << k
}
