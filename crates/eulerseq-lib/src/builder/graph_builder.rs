//! De Bruijn graph construction
//!
//! Turns an ordered collection of fragments into a [`DeBruijnGraph`]. Every
//! fragment is checked before it becomes an edge:
//! 1. length equals k (k may be inferred from the first fragment)
//! 2. both halves of a pair have the same length
//! 3. all symbols belong to the configured alphabet
//!
//! A fragment failing any check is either rejected with a
//! [`ConstructionError`] or dropped, depending on the [`OverlapPolicy`].
//! Prefix and suffix nodes are cut from the same token, so a fragment that
//! passes these checks always shifts by exactly one symbol per half.

use crate::alphabet::Alphabet;
use crate::builder::config::{AssemblyConfig, OverlapPolicy};
use crate::constants::{is_valid_k, INFER_K};
use crate::fragment::{Fragment, FragmentDefect};
use crate::graph::{DeBruijnGraph, Graph};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error raised while building a graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// A fragment failed validation under the strict policy
    #[error("fragment {index} ({fragment}) rejected: {defect}")]
    Rejected {
        /// Position of the fragment in the input
        index: usize,
        /// The fragment, rendered
        fragment: String,
        /// What was wrong with it
        defect: FragmentDefect,
    },
    /// k is zero, either configured or inferred from an empty first fragment
    #[error("fragment length must be positive, got k={0}")]
    InvalidK(usize),
}

/// Outcome of a build, for logging and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildReport {
    /// Fragment length used for validation
    pub k: usize,
    /// Fragments inserted as edges
    pub inserted: usize,
    /// Fragments dropped under the permissive policy
    pub dropped: usize,
}

/// Builds de Bruijn graphs from fragments
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    k: usize,
    alphabet: Alphabet,
    policy: OverlapPolicy,
    hash_seed: u64,
}

impl GraphBuilder {
    /// Create a builder from an assembly configuration
    pub fn new(config: &AssemblyConfig) -> Self {
        Self {
            k: config.k,
            alphabet: config.alphabet,
            policy: config.policy,
            hash_seed: config.hash_seed,
        }
    }

    /// Override the overlap policy
    pub fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the alphabet
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Build a graph from fragments
    ///
    /// # Errors
    /// Returns a `ConstructionError` for the first invalid fragment under the
    /// strict policy, or when k is zero
    pub fn build<F, I>(&self, fragments: I) -> Result<DeBruijnGraph<F>, ConstructionError>
    where
        F: Fragment,
        I: IntoIterator<Item = F>,
    {
        self.build_with_report(fragments).map(|(graph, _)| graph)
    }

    /// Build a graph from fragments and report how many were kept
    pub fn build_with_report<F, I>(
        &self,
        fragments: I,
    ) -> Result<(DeBruijnGraph<F>, BuildReport), ConstructionError>
    where
        F: Fragment,
        I: IntoIterator<Item = F>,
    {
        let mut graph: DeBruijnGraph<F> = Graph::with_seed(self.hash_seed);
        let mut report = BuildReport {
            k: self.k,
            ..BuildReport::default()
        };

        for (index, fragment) in fragments.into_iter().enumerate() {
            if report.k == INFER_K {
                report.k = fragment.span();
                debug!("Inferred k={} from fragment {}", report.k, fragment);
            }
            if !is_valid_k(report.k) {
                return Err(ConstructionError::InvalidK(report.k));
            }

            match fragment.validate(report.k, self.alphabet) {
                Ok(()) => {
                    graph.add_edge(fragment.prefix_node(), fragment.suffix_node(), fragment);
                    report.inserted += 1;
                }
                Err(defect) => match self.policy {
                    OverlapPolicy::Strict => {
                        return Err(ConstructionError::Rejected {
                            index,
                            fragment: fragment.to_string(),
                            defect,
                        });
                    }
                    OverlapPolicy::Permissive => {
                        warn!("Dropping fragment {} ({}): {}", index, fragment, defect);
                        report.dropped += 1;
                    }
                },
            }
        }

        if report.dropped > 0 {
            info!(
                "  Dropped {} of {} fragments",
                report.dropped,
                report.dropped + report.inserted
            );
        }
        debug!(
            "Built graph: {} nodes, {} edges (k={})",
            graph.num_nodes(),
            graph.num_edges(),
            report.k
        );

        Ok((graph, report))
    }
}

/// Build a graph with the default (strict, DNA, inferred k) configuration
pub fn build_graph<F, I>(fragments: I) -> Result<DeBruijnGraph<F>, ConstructionError>
where
    F: Fragment,
    I: IntoIterator<Item = F>,
{
    GraphBuilder::new(&AssemblyConfig::default()).build(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{drop_first, drop_last, Kmer, PairNode, PairedSymbols, ReadPair};

    fn kmers(tokens: &[&str]) -> Vec<Kmer> {
        tokens.iter().map(|t| Kmer::new(*t)).collect()
    }

    #[test]
    fn test_build_scenario_graph() {
        let graph = build_graph(kmers(&["ATG", "TGG", "GGC", "GCA"])).unwrap();

        let nodes: Vec<&str> = graph.nodes().map(|(_, n)| n.as_str()).collect();
        assert_eq!(nodes, vec!["AT", "TG", "GG", "GC", "CA"]);
        assert_eq!(graph.num_edges(), 4);
        for (id, edge) in graph.edges() {
            assert_eq!(edge.source, id);
            assert_eq!(edge.target, id + 1);
        }
    }

    #[test]
    fn test_repeated_kmers_become_parallel_edges() {
        let graph = build_graph(kmers(&["AAA", "AAA", "AAC"])).unwrap();
        assert_eq!(graph.num_nodes(), 2);
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.out_degree(0), 3);
    }

    #[test]
    fn test_strict_rejects_length_mismatch() {
        let err = build_graph(kmers(&["ATG", "TGGC"])).unwrap_err();
        match err {
            ConstructionError::Rejected { index, fragment, defect } => {
                assert_eq!(index, 1);
                assert_eq!(fragment, "TGGC");
                assert_eq!(defect, FragmentDefect::LengthMismatch { expected: 3, actual: 4 });
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_strict_rejects_invalid_symbol() {
        let err = build_graph(kmers(&["ATG", "TNG"])).unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::Rejected { index: 1, defect: FragmentDefect::Alphabet(_), .. }
        ));
    }

    #[test]
    fn test_permissive_drops_bad_fragments() {
        let config = AssemblyConfig {
            policy: OverlapPolicy::Permissive,
            ..AssemblyConfig::new(3).unwrap()
        };
        let (graph, report) = GraphBuilder::new(&config)
            .build_with_report(kmers(&["ATG", "TG", "TGG", "GNC"]))
            .unwrap();

        assert_eq!(report, BuildReport { k: 3, inserted: 2, dropped: 2 });
        assert_eq!(graph.num_edges(), 2);
    }

    #[test]
    fn test_zero_k_is_rejected() {
        assert_eq!(
            build_graph(kmers(&["", "A"])).unwrap_err(),
            ConstructionError::InvalidK(0)
        );
    }

    #[test]
    fn test_empty_input_builds_empty_graph() {
        let graph = build_graph(Vec::<Kmer>::new()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.num_edges(), 0);
    }

    #[test]
    fn test_build_paired_graph() {
        let pairs = vec![ReadPair::new("GAGA", "TTGA"), ReadPair::new("AGAT", "TGAG")];
        let graph = build_graph(pairs).unwrap();

        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.node(0), &PairNode::new("GAG", "TTG"));
        assert_eq!(graph.node(1), &PairNode::new("AGA", "TGA"));
        assert_eq!(graph.node(2), &PairNode::new("GAT", "GAG"));
        assert_eq!(graph.edge(1).source, 1);
    }

    #[test]
    fn test_paired_halves_must_match() {
        let err = build_graph(vec![ReadPair::new("GAGA", "TTG")]).unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::Rejected { defect: FragmentDefect::PairLengthMismatch { .. }, .. }
        ));
    }

    #[test]
    fn test_binary_alphabet_override() {
        let builder = GraphBuilder::new(&AssemblyConfig::default()).with_alphabet(Alphabet::Binary);
        let graph = builder.build(kmers(&["01", "10"])).unwrap();
        assert_eq!(graph.num_nodes(), 2);
        assert!(builder.build(kmers(&["AC"])).is_err());
    }

    #[test]
    fn test_every_edge_shifts_by_one_symbol() {
        let graph = build_graph(kmers(&["ACG", "CGT", "GTA", "ACG", "CGA"])).unwrap();
        for (_, edge) in graph.edges() {
            let (source, target) = (graph.node(edge.source), graph.node(edge.target));
            assert_eq!(drop_first(source), drop_last(target));
        }

        let pairs = vec![ReadPair::new("GAGA", "TTGA"), ReadPair::new("CCCT", "AGTA")];
        let graph = build_graph(pairs).unwrap();
        assert_eq!(graph.num_edges(), 2);
        for (_, edge) in graph.edges() {
            let (source, target) = (graph.node(edge.source), graph.node(edge.target));
            assert_eq!(drop_first(source.left()), drop_last(target.left()));
            assert_eq!(drop_first(source.right()), drop_last(target.right()));
        }
    }
}
