//! End-to-end assembly
//!
//! Coordinates the pipeline that turns fragments back into a sequence:
//! 1. Build the de Bruijn graph
//! 2. Classify degree balance and choose a start node
//! 3. Walk an Eulerian trail
//! 4. Spell the sequence from the trail's edge labels
//!
//! One [`Selection`] drives both the start choice and the edge choices of a
//! request, so a seeded assembly is reproducible end to end.

use crate::{
    alphabet::Alphabet,
    balance::{Balance, BalanceAnalyzer},
    builder::{
        config::AssemblyConfig,
        graph_builder::{BuildReport, GraphBuilder},
    },
    composition::all_kmers,
    constants::{universal_edge_count, MAX_UNIVERSAL_K, MIN_K},
    contigs::extract_contigs,
    error::AssemblyError,
    fragment::{Kmer, ReadPair},
    graph::Graph,
    reconstruct::{reconstruct_cyclic, reconstruct_paired, reconstruct_single},
    selector::{EdgeSelector, Selection},
    traversal::{traverse, Trail},
};
use std::fmt::Display;
use tracing::{debug, info};

/// Result of a successful assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// Reconstructed sequence
    pub sequence: String,
    /// Trail kind and endpoints
    pub balance: Balance,
    /// Number of edges the trail used
    pub trail_len: usize,
    /// Construction statistics
    pub report: BuildReport,
}

/// Runs assembly requests under one configuration
pub struct Assembler {
    config: AssemblyConfig,
    start: Option<String>,
}

impl Assembler {
    /// Create a new assembler with the given configuration
    pub fn new(config: AssemblyConfig) -> Result<Self, AssemblyError> {
        config.validate().map_err(AssemblyError::InvalidConfig)?;
        Ok(Self { config, start: None })
    }

    /// Start every trail at the node rendered as `node`
    ///
    /// Paired nodes render as `LEFT|RIGHT`.
    pub fn with_start(mut self, node: impl Into<String>) -> Self {
        self.start = Some(node.into());
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Reconstruct a sequence from single k-mers
    pub fn assemble_kmers<I>(&self, kmers: I) -> Result<Assembly, AssemblyError>
    where
        I: IntoIterator<Item = Kmer>,
    {
        self.config.print();
        info!("Assembling from k-mers");

        info!("Step 1: Building de Bruijn graph...");
        let (graph, report) = GraphBuilder::new(&self.config).build_with_report(kmers)?;
        info!("  {} nodes, {} edges (k={})", graph.num_nodes(), graph.num_edges(), report.k);

        let mut selector = Selection::from_seed(self.config.seed);
        let (balance, trail) = self.walk(&graph, &mut selector)?;

        info!("Step 4: Spelling sequence...");
        let sequence = reconstruct_single(&trail.edge_labels(&graph));
        info!("  Reconstructed {} symbols", sequence.chars().count());

        Ok(Assembly {
            sequence,
            balance,
            trail_len: trail.len(),
            report,
        })
    }

    /// Reconstruct a sequence from read pairs separated by the configured gap
    pub fn assemble_pairs<I>(&self, pairs: I) -> Result<Assembly, AssemblyError>
    where
        I: IntoIterator<Item = ReadPair>,
    {
        self.config.print();
        info!("Assembling from read pairs (gap {})", self.config.gap);

        info!("Step 1: Building paired de Bruijn graph...");
        let (graph, report) = GraphBuilder::new(&self.config).build_with_report(pairs)?;
        info!("  {} nodes, {} edges (k={})", graph.num_nodes(), graph.num_edges(), report.k);

        let mut selector = Selection::from_seed(self.config.seed);
        let (balance, trail) = self.walk(&graph, &mut selector)?;

        info!("Step 4: Spelling and reconciling paired halves...");
        let sequence = reconstruct_paired(&trail.edge_labels(&graph), report.k, self.config.gap)?;
        info!("  Reconstructed {} symbols", sequence.chars().count());

        Ok(Assembly {
            sequence,
            balance,
            trail_len: trail.len(),
            report,
        })
    }

    /// Spell every maximal non-branching path of the k-mer graph
    pub fn contigs<I>(&self, kmers: I) -> Result<Vec<String>, AssemblyError>
    where
        I: IntoIterator<Item = Kmer>,
    {
        info!("Step 1: Building de Bruijn graph...");
        let graph = GraphBuilder::new(&self.config).build(kmers)?;
        info!("Step 2: Extracting contigs...");
        let contigs = extract_contigs(&graph);
        info!("  {} contigs", contigs.len());
        if self.config.verbose {
            for (i, contig) in contigs.iter().enumerate() {
                info!("  contig {} ({} symbols): {}", i, contig.chars().count(), contig);
            }
        }
        Ok(contigs)
    }

    /// Eulerian trail through an arbitrary graph
    pub fn eulerian_trail<N, L>(&self, graph: &Graph<N, L>) -> Result<Trail, AssemblyError>
    where
        N: Display,
    {
        let mut selector = Selection::from_seed(self.config.seed);
        let (_, trail) = self.walk(graph, &mut selector)?;
        Ok(trail)
    }

    /// Steps 2 and 3: pick a start, then consume every edge
    fn walk<N, L>(
        &self,
        graph: &Graph<N, L>,
        selector: &mut Selection,
    ) -> Result<(Balance, Trail), AssemblyError>
    where
        N: Display,
    {
        info!("Step 2: Checking degree balance...");
        let analyzer = BalanceAnalyzer::new(graph);
        let balance = match &self.start {
            Some(rendered) => {
                let node = graph
                    .nodes()
                    .find(|(_, node)| node.to_string() == *rendered)
                    .map(|(id, _)| id)
                    .ok_or_else(|| AssemblyError::UnknownStartNode(rendered.clone()))?;
                analyzer.analyze_from(node)?
            }
            None => analyzer.analyze_with(selector)?,
        };
        match balance {
            Balance::Cycle { start } => info!("  Eulerian cycle from {}", graph.node(start)),
            Balance::Path { start, end } => {
                info!("  Eulerian path from {} to {}", graph.node(start), graph.node(end))
            }
        }

        info!("Step 3: Walking Eulerian trail...");
        let trail = traverse(graph, balance.start(), selector)?;
        debug!("  Trail uses {} edges", trail.len());
        if self.config.verbose {
            info!("  Trail: {}", trail.render(graph));
        }
        Ok((balance, trail))
    }
}

/// Circular binary string containing every binary k-mer exactly once
///
/// Built from an Eulerian cycle of the complete binary de Bruijn graph of
/// order k; the result has length 2^k.
///
/// # Errors
/// Returns `AssemblyError::InvalidConfig` unless `1 <= k <= MAX_UNIVERSAL_K`
pub fn universal_circular_string<S>(k: usize, selector: &mut S) -> Result<String, AssemblyError>
where
    S: EdgeSelector + ?Sized,
{
    if !(MIN_K..=MAX_UNIVERSAL_K).contains(&k) {
        return Err(AssemblyError::InvalidConfig(format!(
            "universal string order must be in {MIN_K}..={MAX_UNIVERSAL_K}, got k={k}"
        )));
    }

    let config = AssemblyConfig {
        k,
        alphabet: Alphabet::Binary,
        ..AssemblyConfig::default()
    };
    let symbols = Alphabet::Binary.symbols().unwrap_or(&['0', '1']);
    let graph = GraphBuilder::new(&config).build(all_kmers(symbols, k))?;
    debug!(
        "Complete binary graph of order {}: {} nodes, {} edges",
        k,
        graph.num_nodes(),
        graph.num_edges()
    );
    debug_assert_eq!(graph.num_edges(), universal_edge_count(k));

    let balance = BalanceAnalyzer::new(&graph).analyze_with(selector)?;
    let trail = traverse(&graph, balance.start(), selector)?;
    Ok(reconstruct_cyclic(&trail.edge_labels(&graph)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::InfeasibleGraphError;
    use crate::builder::graph_builder::ConstructionError;
    use crate::selector::{FirstCandidate, SeededRandom};

    fn kmers(tokens: &[&str]) -> Vec<Kmer> {
        tokens.iter().map(|t| Kmer::new(*t)).collect()
    }

    fn textbook_pairs() -> Vec<ReadPair> {
        [
            "GGG|TGT", "TAA|GCC", "CAT|GGA", "AAT|CCA", "ATG|CAT", "TGC|ATG", "GCC|TGG",
            "CCA|GGG", "ATG|GAT", "TGG|ATG", "GGA|GTT",
        ]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect()
    }

    #[test]
    fn test_assemble_scenario() {
        let assembler = Assembler::new(AssemblyConfig::default()).unwrap();
        let assembly = assembler.assemble_kmers(kmers(&["GCA", "ATG", "GGC", "TGG"])).unwrap();

        assert_eq!(assembly.sequence, "ATGGCA");
        assert_eq!(assembly.trail_len, 4);
        assert!(!assembly.balance.is_cycle());
        assert_eq!(assembly.report.k, 3);
    }

    #[test]
    fn test_assemble_cycle_with_start() {
        let assembler = Assembler::new(AssemblyConfig::new(3).unwrap())
            .unwrap()
            .with_start("CG");
        let assembly = assembler.assemble_kmers(kmers(&["ACG", "CGT", "GTA", "TAC"])).unwrap();
        assert!(assembly.balance.is_cycle());
        assert_eq!(assembly.sequence, "CGTACG");
    }

    #[test]
    fn test_unknown_start_node() {
        let assembler = Assembler::new(AssemblyConfig::default()).unwrap().with_start("GG");
        assert_eq!(
            assembler.assemble_kmers(kmers(&["ACG", "CGT"])),
            Err(AssemblyError::UnknownStartNode("GG".to_string()))
        );
    }

    #[test]
    fn test_assemble_pairs() {
        let config = AssemblyConfig::paired(3, 1).unwrap();
        for seed in [None, Some(3), Some(42)] {
            let assembler = Assembler::new(AssemblyConfig { seed, ..config.clone() }).unwrap();
            let assembly = assembler.assemble_pairs(textbook_pairs()).unwrap();
            assert_eq!(assembly.sequence, "TAATGCCATGGGATGTT");
        }
    }

    #[test]
    fn test_errors_are_tagged_by_stage() {
        let assembler = Assembler::new(AssemblyConfig::default()).unwrap();
        assert!(matches!(
            assembler.assemble_kmers(kmers(&["ATG", "TG"])),
            Err(AssemblyError::Construction(ConstructionError::Rejected { index: 1, .. }))
        ));
        assert_eq!(
            assembler.assemble_kmers(Vec::new()),
            Err(AssemblyError::Infeasible(InfeasibleGraphError::Empty))
        );
        assert!(matches!(
            Assembler::new(AssemblyConfig { k: 0, gap: 2, ..AssemblyConfig::default() }),
            Err(AssemblyError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_contigs() {
        let assembler = Assembler::new(AssemblyConfig::default()).unwrap();
        let mut contigs = assembler
            .contigs(kmers(&["ATG", "ATG", "TGT", "TGG", "CAT", "GGA", "GAT", "AGA"]))
            .unwrap();
        contigs.sort();
        assert_eq!(contigs, vec!["AGA", "ATG", "ATG", "CAT", "GAT", "TGGA", "TGT"]);
    }

    #[test]
    fn test_verbose_does_not_change_results() {
        let fragments = kmers(&["ATG", "TGG", "GGA", "GAT", "ATC"]);
        let quiet = Assembler::new(AssemblyConfig::default()).unwrap();
        let verbose = Assembler::new(AssemblyConfig { verbose: true, ..AssemblyConfig::default() }).unwrap();

        let assembly = verbose.assemble_kmers(fragments.clone()).unwrap();
        assert_eq!(assembly.sequence, "ATGGATC");
        assert_eq!(Ok(assembly), quiet.assemble_kmers(fragments.clone()));
        assert_eq!(verbose.contigs(fragments.clone()).unwrap(), quiet.contigs(fragments).unwrap());
    }

    #[test]
    fn test_eulerian_trail_on_integer_graph() {
        let mut graph: Graph<u32, ()> = Graph::new();
        for (u, v) in [(0, 3), (1, 0), (2, 1), (2, 6), (3, 2), (4, 2), (5, 4), (6, 5), (6, 8), (7, 9), (8, 7), (9, 6)] {
            graph.add_edge(u, v, ());
        }
        let trail = Assembler::new(AssemblyConfig::default())
            .unwrap()
            .eulerian_trail(&graph)
            .unwrap();
        assert_eq!(trail.len(), 12);
        assert!(trail.is_closed());
    }

    #[test]
    fn test_universal_string() {
        for k in 1..=6 {
            let text = universal_circular_string(k, &mut FirstCandidate).unwrap();
            assert_eq!(text.len(), 1 << k);
            let doubled: Vec<char> = text.chars().chain(text.chars()).collect();
            let mut seen: Vec<String> = (0..text.len())
                .map(|i| doubled[i..i + k].iter().collect())
                .collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), 1 << k);
        }
    }

    #[test]
    fn test_universal_string_bounds() {
        assert!(universal_circular_string(0, &mut FirstCandidate).is_err());
        assert!(universal_circular_string(MAX_UNIVERSAL_K + 1, &mut SeededRandom::new(1)).is_err());
        let a = universal_circular_string(4, &mut SeededRandom::new(5)).unwrap();
        let b = universal_circular_string(4, &mut SeededRandom::new(5)).unwrap();
        assert_eq!(a, b);
    }
}
