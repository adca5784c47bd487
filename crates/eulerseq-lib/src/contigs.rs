//! Maximal non-branching paths (contigs)
//!
//! A contig is a maximal run of edges whose inner nodes all have exactly one
//! incoming and one outgoing edge. Runs start at every outgoing edge of a
//! branching node (any node that is not 1-in-1-out) and stop at the next
//! branching node. Components made only of 1-in-1-out nodes are isolated
//! cycles and become one contig each, starting and ending at the same node.
//!
//! Every edge lands in exactly one contig, whether or not the graph as a whole
//! is Eulerian.

use crate::balance::DegreeTable;
use crate::graph::{EdgeId, Graph, NodeId};
use crate::reconstruct::reconstruct_single;
use tracing::debug;

/// One maximal non-branching run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    /// Nodes along the run, `edges.len() + 1` of them
    pub nodes: Vec<NodeId>,
    /// Edges along the run
    pub edges: Vec<EdgeId>,
    /// Whether the run is an isolated cycle
    pub is_cycle: bool,
}

impl Contig {
    fn starting_at(node: NodeId) -> Self {
        Self {
            nodes: vec![node],
            edges: Vec::new(),
            is_cycle: false,
        }
    }

    /// Number of edges in the contig
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the contig has no edges
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Spell the contig from its edge labels
    pub fn sequence<N, L: AsRef<str>>(&self, graph: &Graph<N, L>) -> String {
        let labels: Vec<&L> = self.edges.iter().map(|&e| &graph.edge(e).label).collect();
        reconstruct_single(&labels)
    }
}

/// Splits a graph into maximal non-branching paths
pub struct ContigExtractor<'g, N, L> {
    graph: &'g Graph<N, L>,
    degrees: DegreeTable,
}

impl<'g, N, L> ContigExtractor<'g, N, L> {
    /// Compute the degree table of a graph
    pub fn new(graph: &'g Graph<N, L>) -> Self {
        Self {
            graph,
            degrees: DegreeTable::from_graph(graph),
        }
    }

    /// All contigs, branch-bounded runs first, then isolated cycles
    pub fn extract(&self) -> Vec<Contig> {
        let mut used = vec![false; self.graph.num_edges()];
        let mut contigs = Vec::new();

        for node in 0..self.graph.num_nodes() {
            if self.degrees.is_one_in_one_out(node) || self.degrees.out_degree(node) == 0 {
                continue;
            }
            for &edge in self.graph.outgoing(node) {
                let mut contig = Contig::starting_at(node);
                self.extend(&mut contig, edge, &mut used, |target| {
                    !self.degrees.is_one_in_one_out(target)
                });
                contigs.push(contig);
            }
        }
        let num_runs = contigs.len();

        for node in 0..self.graph.num_nodes() {
            if !self.degrees.is_one_in_one_out(node) {
                continue;
            }
            let edge = self.graph.outgoing(node)[0];
            if used[edge] {
                continue;
            }
            let mut contig = Contig::starting_at(node);
            self.extend(&mut contig, edge, &mut used, |target| target == node);
            contig.is_cycle = true;
            contigs.push(contig);
        }

        debug!(
            "Extracted {} contigs ({} isolated cycles)",
            contigs.len(),
            contigs.len() - num_runs
        );
        contigs
    }

    /// Follow single-successor nodes from `edge` until `stop` holds
    fn extend<F>(&self, contig: &mut Contig, edge: EdgeId, used: &mut [bool], stop: F)
    where
        F: Fn(NodeId) -> bool,
    {
        let mut edge = edge;
        loop {
            used[edge] = true;
            contig.edges.push(edge);
            let target = self.graph.edge(edge).target;
            contig.nodes.push(target);
            if stop(target) {
                break;
            }
            edge = self.graph.outgoing(target)[0];
            if used[edge] {
                break;
            }
        }
    }
}

/// Spell every contig of a graph whose edges carry string labels
pub fn extract_contigs<N, L: AsRef<str>>(graph: &Graph<N, L>) -> Vec<String> {
    ContigExtractor::new(graph)
        .extract()
        .iter()
        .map(|contig| contig.sequence(graph))
        .collect()
}
