// ---------------------------------------------------------------------------
// EvacError: typed failures for graph construction, hazards and routing
// ---------------------------------------------------------------------------

use std::fmt;

use crate::graph::NodeId;

/// Why a node/edge list was rejected at graph construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// Two nodes share the same id.
    DuplicateNode(NodeId),
    /// An edge names a node that is not part of the graph.
    DanglingEdge { edge_index: usize, node: NodeId },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::DuplicateNode(id) => write!(f, "duplicate node id '{id}'"),
            TopologyError::DanglingEdge { edge_index, node } => {
                write!(f, "edge #{edge_index} references unknown node '{node}'")
            }
        }
    }
}

/// Errors surfaced by the evacuation core.
///
/// Only `InvalidTopology` is fatal (it aborts initialization). The others are
/// returned to the caller, which treats them as a no-op and waits for the next
/// user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvacError {
    InvalidTopology(TopologyError),
    UnknownNode(NodeId),
    /// Explicit hazard placement on a node that already hosts a hazard.
    NodeAlreadyHazardous(NodeId),
    /// A random node was requested from a graph with no nodes.
    EmptyGraph,
}

impl fmt::Display for EvacError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvacError::InvalidTopology(e) => write!(f, "Invalid topology: {e}"),
            EvacError::UnknownNode(id) => write!(f, "Unknown node: {id}"),
            EvacError::NodeAlreadyHazardous(id) => {
                write!(f, "Node {id} already hosts a hazard")
            }
            EvacError::EmptyGraph => write!(f, "Graph has no nodes"),
        }
    }
}

impl std::error::Error for EvacError {}

impl From<TopologyError> for EvacError {
    fn from(e: TopologyError) -> Self {
        EvacError::InvalidTopology(e)
    }
}
