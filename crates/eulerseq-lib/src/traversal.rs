//! Eulerian trail construction
//!
//! Stack-based Hierholzer traversal. The walk moves forward along unconsumed
//! edges while it can, pushing each node it leaves onto a working stack. When
//! the current node has no unconsumed edge left, the node (and the edge it was
//! reached by) is emitted to the circuit and the walk backtracks by popping
//! the stack. The circuit is complete once it holds E + 1 nodes, and
//! reversing it yields the trail in forward order.
//!
//! Each emitted edge must leave the node emitted right after it. A walk
//! started away from the source of a path-shaped graph gets stuck at the
//! wrong node and breaks that chain, which is reported as
//! [`TraversalError::BrokenTrail`].
//!
//! Edges are never removed from the graph. Consumption is tracked in a
//! per-edge bitset plus per-node lists of remaining candidates, both owned by
//! the [`EulerianTraversal`].

use crate::constants::TRAIL_SEPARATOR;
use crate::graph::{EdgeId, Graph, NodeId};
use crate::selector::EdgeSelector;
use std::fmt::Display;
use thiserror::Error;
use tracing::debug;

/// Error raised when a traversal cannot complete
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraversalError {
    /// The start node is not part of the graph
    #[error("start node {node} is not in the graph ({num_nodes} nodes)")]
    UnknownStart {
        /// Requested start
        node: NodeId,
        /// Number of nodes in the graph
        num_nodes: usize,
    },
    /// A selector picked an index outside the candidate list
    #[error("selector chose candidate {index} of {candidates}")]
    SelectorOutOfRange {
        /// Index returned by the selector
        index: usize,
        /// Number of candidates offered
        candidates: usize,
    },
    /// The walk got stuck at a node the previously emitted edge does not leave
    #[error("trail broken at node {node}: edge {edge} does not leave it")]
    BrokenTrail {
        /// Edge emitted just before the stuck node
        edge: EdgeId,
        /// Node the walk got stuck at
        node: NodeId,
    },
    /// The walk ran out of nodes to backtrack to before every edge was used
    #[error(
        "stack underflow after emitting {emitted} of {expected} trail nodes; \
         the graph is not connected from the start node"
    )]
    StackUnderflow {
        /// Nodes emitted before the stack ran dry
        emitted: usize,
        /// E + 1
        expected: usize,
    },
}

/// A trail visiting every edge exactly once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trail {
    /// Visited nodes, `edges.len() + 1` of them
    pub nodes: Vec<NodeId>,
    /// Edge joining `nodes[i]` to `nodes[i + 1]`
    pub edges: Vec<EdgeId>,
}

impl Trail {
    /// Number of edges in the trail
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the trail uses no edges
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Whether the trail returns to its start node
    pub fn is_closed(&self) -> bool {
        self.nodes.first() == self.nodes.last()
    }

    /// Node contents in trail order
    pub fn node_labels<'g, N, L>(&self, graph: &'g Graph<N, L>) -> Vec<&'g N> {
        self.nodes.iter().map(|&n| graph.node(n)).collect()
    }

    /// Edge labels (fragments) in trail order
    pub fn edge_labels<'g, N, L>(&self, graph: &'g Graph<N, L>) -> Vec<&'g L> {
        self.edges.iter().map(|&e| &graph.edge(e).label).collect()
    }

    /// Node contents joined by `->`
    pub fn render<N: Display, L>(&self, graph: &Graph<N, L>) -> String {
        self.nodes
            .iter()
            .map(|&n| graph.node(n).to_string())
            .collect::<Vec<_>>()
            .join(TRAIL_SEPARATOR)
    }
}

/// One edge-consuming walk over a borrowed graph
pub struct EulerianTraversal<'g, N, L> {
    graph: &'g Graph<N, L>,
    consumed: Vec<bool>,
    remaining: Vec<Vec<EdgeId>>,
}

impl<'g, N, L> EulerianTraversal<'g, N, L> {
    /// Prepare a traversal with every edge unconsumed
    pub fn new(graph: &'g Graph<N, L>) -> Self {
        let remaining = (0..graph.num_nodes())
            .map(|n| graph.outgoing(n).to_vec())
            .collect();
        Self {
            graph,
            consumed: vec![false; graph.num_edges()],
            remaining,
        }
    }

    /// Whether an edge has been used by this traversal
    pub fn is_consumed(&self, edge: EdgeId) -> bool {
        self.consumed[edge]
    }

    /// Number of edges used so far
    pub fn num_consumed(&self) -> usize {
        self.consumed.iter().filter(|&&c| c).count()
    }

    /// Walk from `start`, consuming edges chosen by `selector`
    ///
    /// A traversal runs once; afterwards `is_consumed` reports which edges
    /// the walk used.
    ///
    /// # Errors
    /// Returns a `TraversalError` if the start is unknown, the selector
    /// misbehaves, the start cannot begin an Eulerian trail, or some edge is
    /// unreachable from the start
    pub fn run<S>(&mut self, start: NodeId, selector: &mut S) -> Result<Trail, TraversalError>
    where
        S: EdgeSelector + ?Sized,
    {
        let num_nodes = self.graph.num_nodes();
        if start >= num_nodes {
            return Err(TraversalError::UnknownStart { node: start, num_nodes });
        }

        let expected = self.graph.num_edges() + 1;
        let mut stack: Vec<(NodeId, Option<EdgeId>)> = Vec::new();
        let mut circuit_nodes: Vec<NodeId> = Vec::with_capacity(expected);
        let mut circuit_edges: Vec<EdgeId> = Vec::with_capacity(expected - 1);

        let mut current = start;
        let mut arrived_by: Option<EdgeId> = None;
        let mut pending: Option<EdgeId> = None;

        while circuit_nodes.len() < expected {
            let candidates = &mut self.remaining[current];
            if candidates.is_empty() {
                if let Some(edge) = pending {
                    if self.graph.edge(edge).source != current {
                        return Err(TraversalError::BrokenTrail { edge, node: current });
                    }
                }
                circuit_nodes.push(current);
                if let Some(edge) = arrived_by {
                    circuit_edges.push(edge);
                }
                pending = arrived_by;
                if circuit_nodes.len() == expected {
                    break;
                }
                let (previous, previous_edge) = stack.pop().ok_or(TraversalError::StackUnderflow {
                    emitted: circuit_nodes.len(),
                    expected,
                })?;
                current = previous;
                arrived_by = previous_edge;
            } else {
                let index = selector.select_edge(candidates);
                if index >= candidates.len() {
                    return Err(TraversalError::SelectorOutOfRange {
                        index,
                        candidates: candidates.len(),
                    });
                }
                let edge = candidates.remove(index);
                self.consumed[edge] = true;
                stack.push((current, arrived_by));
                arrived_by = Some(edge);
                current = self.graph.edge(edge).target;
            }
        }

        circuit_nodes.reverse();
        circuit_edges.reverse();
        debug!(
            "Traversal complete: {} nodes, {} edges, {} consumed",
            circuit_nodes.len(),
            circuit_edges.len(),
            self.num_consumed()
        );

        Ok(Trail {
            nodes: circuit_nodes,
            edges: circuit_edges,
        })
    }
}

/// Find an Eulerian trail from `start`
pub fn traverse<N, L, S>(
    graph: &Graph<N, L>,
    start: NodeId,
    selector: &mut S,
) -> Result<Trail, TraversalError>
where
    S: EdgeSelector + ?Sized,
{
    EulerianTraversal::new(graph).run(start, selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::analyze_balance;
    use crate::selector::{FirstCandidate, SeededRandom};

    fn graph(edges: &[(&'static str, &'static str)]) -> Graph<&'static str, usize> {
        let mut graph = Graph::new();
        for (i, &(u, v)) in edges.iter().enumerate() {
            graph.add_edge(u, v, i);
        }
        graph
    }

    fn assert_valid_trail<N, L>(graph: &Graph<N, L>, trail: &Trail) {
        assert_eq!(trail.nodes.len(), graph.num_edges() + 1);
        assert_eq!(trail.edges.len(), graph.num_edges());
        for (i, &edge) in trail.edges.iter().enumerate() {
            assert_eq!(graph.edge(edge).source, trail.nodes[i]);
            assert_eq!(graph.edge(edge).target, trail.nodes[i + 1]);
        }
        let mut used = trail.edges.clone();
        used.sort_unstable();
        assert_eq!(used, (0..graph.num_edges()).collect::<Vec<_>>());
    }

    #[test]
    fn test_linear_path() {
        let g = graph(&[("AT", "TG"), ("TG", "GG"), ("GG", "GC"), ("GC", "CA")]);
        let start = analyze_balance(&g).unwrap().start();
        let trail = traverse(&g, start, &mut FirstCandidate).unwrap();

        assert_valid_trail(&g, &trail);
        let labels: Vec<&str> = trail.node_labels(&g).into_iter().copied().collect();
        assert_eq!(labels, vec!["AT", "TG", "GG", "GC", "CA"]);
        assert!(!trail.is_closed());
    }

    #[test]
    fn test_render() {
        let g = graph(&[("AT", "TG"), ("TG", "GG")]);
        let trail = traverse(&g, 0, &mut FirstCandidate).unwrap();
        assert_eq!(trail.render(&g), "AT->TG->GG");
        assert_eq!(Trail::default().render(&g), "");
    }

    #[test]
    fn test_cycle_with_detour() {
        // 0 -> 1 -> 2 -> 0 and 1 -> 3 -> 1: the walk must splice the detour in
        let g = graph(&[("0", "1"), ("1", "2"), ("2", "0"), ("1", "3"), ("3", "1")]);
        let trail = traverse(&g, 0, &mut FirstCandidate).unwrap();

        assert_valid_trail(&g, &trail);
        assert!(trail.is_closed());
        assert_eq!(trail.len(), 5);
    }

    #[test]
    fn test_parallel_edges_each_used_once() {
        let g = graph(&[("a", "a"), ("a", "a"), ("a", "b")]);
        let start = analyze_balance(&g).unwrap().start();
        let trail = traverse(&g, start, &mut FirstCandidate).unwrap();
        assert_valid_trail(&g, &trail);
        assert_eq!(*trail.edge_labels(&g).last().unwrap(), &2);
    }

    #[test]
    fn test_seeded_traversals_are_reproducible() {
        let g = graph(&[
            ("a", "b"), ("b", "a"), ("a", "c"), ("c", "a"), ("a", "d"), ("d", "a"),
        ]);
        let t1 = traverse(&g, 0, &mut SeededRandom::new(11)).unwrap();
        let t2 = traverse(&g, 0, &mut SeededRandom::new(11)).unwrap();
        assert_eq!(t1, t2);
        assert_valid_trail(&g, &t1);
    }

    #[test]
    fn test_graph_is_intact_after_traversal() {
        let g = graph(&[("a", "b"), ("b", "a")]);
        let mut traversal = EulerianTraversal::new(&g);
        assert!(!traversal.is_consumed(0));
        let trail = traversal.run(0, &mut FirstCandidate).unwrap();

        assert!(traversal.is_consumed(0) && traversal.is_consumed(1));
        assert_eq!(traversal.num_consumed(), 2);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.outgoing(0), &[0]);
        // a second walk over the same graph succeeds
        assert_eq!(traverse(&g, 0, &mut FirstCandidate).unwrap(), trail);
    }

    #[test]
    fn test_disconnected_graph_underflows() {
        let g = graph(&[("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")]);
        assert_eq!(
            traverse(&g, 0, &mut FirstCandidate),
            Err(TraversalError::StackUnderflow { emitted: 3, expected: 5 })
        );
    }

    #[test]
    fn test_start_away_from_path_source_is_reported() {
        // a -> b, b -> a, a -> c: only a can start the trail
        let g = graph(&[("a", "b"), ("b", "a"), ("a", "c")]);
        assert_eq!(
            traverse(&g, 1, &mut FirstCandidate),
            Err(TraversalError::BrokenTrail { edge: 0, node: 2 })
        );
        let trail = traverse(&g, 0, &mut FirstCandidate).unwrap();
        assert_valid_trail(&g, &trail);
    }

    #[test]
    fn test_bad_selector_is_reported() {
        let g = graph(&[("a", "b"), ("b", "a")]);
        let mut out_of_range = |candidates: &[EdgeId]| candidates.len();
        assert_eq!(
            traverse(&g, 0, &mut out_of_range),
            Err(TraversalError::SelectorOutOfRange { index: 1, candidates: 1 })
        );
    }

    #[test]
    fn test_unknown_start() {
        let g = graph(&[("a", "b")]);
        assert_eq!(
            traverse(&g, 5, &mut FirstCandidate),
            Err(TraversalError::UnknownStart { node: 5, num_nodes: 2 })
        );
    }
}
