//! Degree balance and Eulerian feasibility
//!
//! In- and out-degrees are computed in a single pass over the edge arena.
//! A graph admits an Eulerian cycle when every node is balanced, and an
//! Eulerian path when exactly one node has one surplus outgoing edge, exactly
//! one has one surplus incoming edge, and all others are balanced. Anything
//! else is infeasible.

use crate::graph::{Graph, NodeId};
use crate::selector::{EdgeSelector, FirstCandidate};
use thiserror::Error;
use tracing::debug;

/// Error raised when no Eulerian trail can start where requested
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InfeasibleGraphError {
    /// The graph has no edges to traverse
    #[error("graph has no edges")]
    Empty,
    /// The degree distribution admits neither a cycle nor a path
    #[error(
        "no Eulerian path: {surplus} node(s) with out>in, {deficit} node(s) with in>out \
         (max imbalance {max_imbalance})"
    )]
    Unbalanced {
        /// Nodes with out-degree greater than in-degree
        surplus: usize,
        /// Nodes with in-degree greater than out-degree
        deficit: usize,
        /// Largest absolute out-in difference
        max_imbalance: usize,
    },
    /// A requested start node has no outgoing edges
    #[error("start node {node} has no outgoing edges")]
    StartWithoutEdges {
        /// Requested start
        node: NodeId,
    },
    /// A requested start differs from the only node a path can start at
    #[error("an Eulerian path must start at node {source_node}, not {node}")]
    StartNotSource {
        /// Requested start
        node: NodeId,
        /// The node with one surplus outgoing edge
        source_node: NodeId,
    },
    /// The selector picked a start outside the candidate list
    #[error("start selector returned index {index} for {candidates} candidate node(s)")]
    StartSelectorOutOfRange {
        /// Index returned by the selector
        index: usize,
        /// Number of candidate start nodes
        candidates: usize,
    },
}

/// Kind of Eulerian trail a graph admits, with its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    /// Every node is balanced; the trail returns to `start`
    Cycle {
        /// Chosen start (and end) node
        start: NodeId,
    },
    /// One source and one sink
    Path {
        /// Node with out - in = +1
        start: NodeId,
        /// Node with out - in = -1
        end: NodeId,
    },
}

impl Balance {
    /// Node the trail starts from
    pub fn start(&self) -> NodeId {
        match *self {
            Balance::Cycle { start } | Balance::Path { start, .. } => start,
        }
    }

    /// Returns `true` for an Eulerian cycle
    pub fn is_cycle(&self) -> bool {
        matches!(self, Balance::Cycle { .. })
    }
}

/// In- and out-degree of every node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreeTable {
    in_degree: Vec<usize>,
    out_degree: Vec<usize>,
}

impl DegreeTable {
    /// Count degrees in one pass over the edges
    pub fn from_graph<N, L>(graph: &Graph<N, L>) -> Self {
        let mut in_degree = vec![0usize; graph.num_nodes()];
        let mut out_degree = vec![0usize; graph.num_nodes()];
        for (_, edge) in graph.edges() {
            out_degree[edge.source] += 1;
            in_degree[edge.target] += 1;
        }
        Self { in_degree, out_degree }
    }

    /// Number of edges entering a node
    #[inline]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.in_degree[node]
    }

    /// Number of edges leaving a node
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_degree[node]
    }

    /// out - in for a node
    #[inline]
    pub fn balance(&self, node: NodeId) -> isize {
        self.out_degree[node] as isize - self.in_degree[node] as isize
    }

    /// Whether the node has exactly one incoming and one outgoing edge
    #[inline]
    pub fn is_one_in_one_out(&self, node: NodeId) -> bool {
        self.in_degree[node] == 1 && self.out_degree[node] == 1
    }

    /// Number of nodes in the table
    pub fn len(&self) -> usize {
        self.in_degree.len()
    }

    /// Returns `true` if the table has no nodes
    pub fn is_empty(&self) -> bool {
        self.in_degree.is_empty()
    }

    /// Sum of all in-degrees
    pub fn total_in(&self) -> usize {
        self.in_degree.iter().sum()
    }

    /// Sum of all out-degrees
    pub fn total_out(&self) -> usize {
        self.out_degree.iter().sum()
    }
}

/// Classifies a graph and chooses the start of its Eulerian trail
pub struct BalanceAnalyzer<'g, N, L> {
    graph: &'g Graph<N, L>,
    degrees: DegreeTable,
}

impl<'g, N, L> BalanceAnalyzer<'g, N, L> {
    /// Compute the degree table of a graph
    pub fn new(graph: &'g Graph<N, L>) -> Self {
        Self {
            graph,
            degrees: DegreeTable::from_graph(graph),
        }
    }

    /// The degree table
    pub fn degrees(&self) -> &DegreeTable {
        &self.degrees
    }

    /// Classify the graph, starting cycles at the first node with an outgoing edge
    pub fn analyze(&self) -> Result<Balance, InfeasibleGraphError> {
        self.analyze_with(&mut FirstCandidate)
    }

    /// Classify the graph, letting `selector` choose the start of a cycle
    ///
    /// # Errors
    /// Fails on an infeasible graph, or when the selector picks an index past
    /// the end of the candidate list
    pub fn analyze_with<S>(&self, selector: &mut S) -> Result<Balance, InfeasibleGraphError>
    where
        S: EdgeSelector + ?Sized,
    {
        match self.classify()? {
            Classification::Path { source, sink } => Ok(Balance::Path { start: source, end: sink }),
            Classification::Cycle => {
                let candidates: Vec<NodeId> = (0..self.degrees.len())
                    .filter(|&n| self.degrees.out_degree(n) > 0)
                    .collect();
                let pick = selector.select_start(&candidates);
                let start = *candidates.get(pick).ok_or(InfeasibleGraphError::StartSelectorOutOfRange {
                    index: pick,
                    candidates: candidates.len(),
                })?;
                debug!("Balanced graph, cycle starts at node {} ({} candidates)", start, candidates.len());
                Ok(Balance::Cycle { start })
            }
        }
    }

    /// Classify the graph with an explicit start node
    ///
    /// Any node with an outgoing edge may start a cycle. A path must start at
    /// its source, so any other request is rejected.
    pub fn analyze_from(&self, start: NodeId) -> Result<Balance, InfeasibleGraphError> {
        match self.classify()? {
            Classification::Path { source, sink } => {
                if start != source {
                    return Err(InfeasibleGraphError::StartNotSource { node: start, source_node: source });
                }
                Ok(Balance::Path { start, end: sink })
            }
            Classification::Cycle => {
                if start >= self.degrees.len() || self.degrees.out_degree(start) == 0 {
                    return Err(InfeasibleGraphError::StartWithoutEdges { node: start });
                }
                Ok(Balance::Cycle { start })
            }
        }
    }

    fn classify(&self) -> Result<Classification, InfeasibleGraphError> {
        if self.graph.num_edges() == 0 {
            return Err(InfeasibleGraphError::Empty);
        }

        let mut sources = Vec::new();
        let mut sinks = Vec::new();
        let mut surplus = 0;
        let mut deficit = 0;
        let mut max_imbalance = 0;
        for node in 0..self.degrees.len() {
            let delta = self.degrees.balance(node);
            max_imbalance = max_imbalance.max(delta.unsigned_abs());
            match delta {
                0 => {}
                1 => sources.push(node),
                -1 => sinks.push(node),
                d if d > 0 => surplus += 1,
                _ => deficit += 1,
            }
        }

        if sources.is_empty() && sinks.is_empty() && surplus == 0 && deficit == 0 {
            return Ok(Classification::Cycle);
        }
        if sources.len() == 1 && sinks.len() == 1 && surplus == 0 && deficit == 0 {
            return Ok(Classification::Path {
                source: sources[0],
                sink: sinks[0],
            });
        }
        Err(InfeasibleGraphError::Unbalanced {
            surplus: surplus + sources.len(),
            deficit: deficit + sinks.len(),
            max_imbalance,
        })
    }
}

enum Classification {
    Cycle,
    Path { source: NodeId, sink: NodeId },
}

/// Classify a graph with the default first-candidate start
pub fn analyze_balance<N, L>(graph: &Graph<N, L>) -> Result<Balance, InfeasibleGraphError> {
    BalanceAnalyzer::new(graph).analyze()
}
