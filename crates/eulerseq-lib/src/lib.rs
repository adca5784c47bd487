// eulerseq: sequence reconstruction over de Bruijn graphs
//
// Builds de Bruijn graphs from k-mers or read pairs, finds Eulerian trails
// through them, and spells the sequences those trails encode.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod alphabet;
pub mod assembler;
pub mod balance;
pub mod builder;
pub mod composition;
pub mod constants;
pub mod contigs;
pub mod error;
pub mod fragment;
pub mod graph;
pub mod hasher;
pub mod reconstruct;
pub mod selector;
pub mod traversal;

// Re-export common types at crate root
pub use alphabet::Alphabet;
pub use assembler::{universal_circular_string, Assembler, Assembly};
pub use balance::{analyze_balance, Balance, BalanceAnalyzer, InfeasibleGraphError};
pub use builder::{build_graph, AssemblyConfig, ConstructionError, GraphBuilder, OverlapPolicy};
pub use composition::{all_kmers, composition, paired_composition};
pub use contigs::{extract_contigs, Contig, ContigExtractor};
pub use error::AssemblyError;
pub use fragment::{Fragment, Kmer, PairNode, ReadPair};
pub use graph::{DeBruijnGraph, Graph};
pub use reconstruct::{reconstruct_cyclic, reconstruct_paired, reconstruct_single, InconsistentPairingError};
pub use selector::{EdgeSelector, FirstCandidate, SeededRandom, Selection};
pub use traversal::{traverse, EulerianTraversal, Trail, TraversalError};

/// Version information
pub fn version() -> (u8, u8, u8) {
    constants::VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let (major, minor, patch) = version();
        assert_eq!(major, 0);
        assert_eq!(minor, 1);
        assert_eq!(patch, 0);
    }
}
