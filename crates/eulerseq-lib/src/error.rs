//! Error type for end-to-end assembly requests

use crate::balance::InfeasibleGraphError;
use crate::builder::graph_builder::ConstructionError;
use crate::reconstruct::InconsistentPairingError;
use crate::traversal::TraversalError;
use thiserror::Error;

/// Any failure of an assembly request, tagged by the stage that raised it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// The configuration is unusable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Graph construction rejected a fragment
    #[error(transparent)]
    Construction(#[from] ConstructionError),
    /// The graph admits no Eulerian trail
    #[error(transparent)]
    Infeasible(#[from] InfeasibleGraphError),
    /// Traversal broke an internal invariant
    #[error(transparent)]
    Traversal(#[from] TraversalError),
    /// The halves of a paired reconstruction disagree
    #[error(transparent)]
    InconsistentPairing(#[from] InconsistentPairingError),
    /// A requested start node does not occur in the graph
    #[error("start node {0:?} does not occur in the graph")]
    UnknownStartNode(String),
}
