//! Directed multigraph over overlap boundaries
//!
//! Nodes are interned by value and numbered in first-seen order. Edges live in
//! an index-based arena and keep the fragment (or any other label) that
//! produced them. Parallel edges between the same pair of nodes are distinct
//! arena entries.
//!
//! The graph is never mutated by traversal. Consumers that need to mark edges
//! as used (traversal, contig extraction) keep their own per-edge state, so a
//! graph can be analysed and walked any number of times.

use crate::constants::DEFAULT_SEED;
use crate::fragment::Fragment;
use crate::hasher::{DeterministicHasher, NodeIndexMap};
use std::hash::Hash;

/// Index of a node in its graph
pub type NodeId = usize;

/// Index of an edge in its graph
pub type EdgeId = usize;

/// A directed, labelled edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<L> {
    /// Node the edge leaves
    pub source: NodeId,
    /// Node the edge enters
    pub target: NodeId,
    /// Fragment (or other payload) carried by the edge
    pub label: L,
}

/// Directed multigraph with value-interned nodes and labelled edges
#[derive(Debug, Clone)]
pub struct Graph<N, L> {
    nodes: Vec<N>,
    index: NodeIndexMap<N, NodeId>,
    edges: Vec<Edge<L>>,
    outgoing: Vec<Vec<EdgeId>>,
}

/// De Bruijn graph built from fragments of type `F`
pub type DeBruijnGraph<F> = Graph<<F as Fragment>::Node, F>;

impl<N, L> Graph<N, L>
where
    N: Clone + Eq + Hash,
{
    /// Create an empty graph
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create an empty graph whose node index uses the given hash seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            nodes: Vec::new(),
            index: DeterministicHasher::new(seed).node_map(),
            edges: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    /// Intern a node, returning its id
    pub fn add_node(&mut self, node: N) -> NodeId {
        if let Some(&id) = self.index.get(&node) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(node.clone());
        self.outgoing.push(Vec::new());
        self.index.insert(node, id);
        id
    }

    /// Add an edge between two nodes, interning them as needed
    pub fn add_edge(&mut self, source: N, target: N, label: L) -> EdgeId {
        let source = self.add_node(source);
        let target = self.add_node(target);
        self.add_edge_between(source, target, label)
    }

    /// Add an edge between two already interned nodes
    ///
    /// # Panics
    /// Panics if either id does not belong to this graph
    pub fn add_edge_between(&mut self, source: NodeId, target: NodeId, label: L) -> EdgeId {
        assert!(
            source < self.nodes.len() && target < self.nodes.len(),
            "edge endpoints {}->{} out of range for {} nodes",
            source,
            target,
            self.nodes.len()
        );
        let id = self.edges.len();
        self.edges.push(Edge { source, target, label });
        self.outgoing[source].push(id);
        id
    }

    /// Look up the id of a node by value
    pub fn node_id(&self, node: &N) -> Option<NodeId> {
        self.index.get(node).copied()
    }
}

impl<N, L> Graph<N, L> {
    /// Number of distinct nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges (fragments)
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node content by id
    pub fn node(&self, id: NodeId) -> &N {
        &self.nodes[id]
    }

    /// Edge by id
    pub fn edge(&self, id: EdgeId) -> &Edge<L> {
        &self.edges[id]
    }

    /// Outgoing edges of a node, in insertion order
    pub fn outgoing(&self, id: NodeId) -> &[EdgeId] {
        &self.outgoing[id]
    }

    /// Out-degree of a single node
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.outgoing[id].len()
    }

    /// All nodes in first-seen order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> {
        self.nodes.iter().enumerate()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge<L>)> {
        self.edges.iter().enumerate()
    }

    /// Successor node ids of a node, one per outgoing edge
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing[id].iter().map(move |&e| self.edges[e].target)
    }
}

impl<N, L> Default for Graph<N, L>
where
    N: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
