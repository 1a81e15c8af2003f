use std::collections::HashMap;
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{EvacError, TopologyError};

/// Opaque node identity, e.g. `"A1"` or `"S3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NodeKind {
    #[default]
    Normal,
    Building,
    SafeZone,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Normal => "Junction",
            NodeKind::Building => "Building",
            NodeKind::SafeZone => "Safe Zone",
        }
    }
}

/// A location in the evacuation graph. `x`/`y` are normalized (0..1) display
/// coordinates and carry no meaning for routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: None,
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Display label: the name when present, otherwise the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Undirected weighted connection. Parallel edges are independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Traversal cost (minutes).
    pub weight: u32,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, weight: u32) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

/// Static evacuation topology. Immutable once built.
///
/// Adjacency is precomputed from the edge list in stored edge order, so
/// `neighbors` yields exactly what a scan over the edges would, in the same
/// order. That ordering is what makes route tie-breaking reproducible.
#[derive(Resource, Debug, Clone, Default)]
pub struct EvacuationGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<NodeId, usize>,
    /// adjacency[i] = (neighbor index, base weight), one entry per incident edge.
    adjacency: Vec<Vec<(usize, u32)>>,
}

impl EvacuationGraph {
    /// Validate and index a node/edge list.
    pub fn build(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, EvacError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(TopologyError::DuplicateNode(node.id.clone()).into());
            }
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        for (edge_index, edge) in edges.iter().enumerate() {
            let lookup = |id: &NodeId| {
                index.get(id).copied().ok_or_else(|| TopologyError::DanglingEdge {
                    edge_index,
                    node: id.clone(),
                })
            };
            let s = lookup(&edge.source)?;
            let t = lookup(&edge.target)?;
            adjacency[s].push((t, edge.weight));
            // A self-loop is listed once.
            if s != t {
                adjacency[t].push((s, edge.weight));
            }
        }

        Ok(Self {
            nodes,
            edges,
            index,
            adjacency,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn node_at(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub(crate) fn neighbor_indices(&self, idx: usize) -> &[(usize, u32)] {
        &self.adjacency[idx]
    }

    /// Neighbors of `id` with the connecting edge's base weight. Unknown ids
    /// have no neighbors.
    pub fn neighbors(&self, id: &NodeId) -> Vec<(&NodeId, u32)> {
        match self.index_of(id) {
            Some(idx) => self.adjacency[idx]
                .iter()
                .map(|&(n, w)| (&self.nodes[n].id, w))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Ids of all safe zones, in graph order.
    pub fn safe_zones(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::SafeZone)
            .map(|n| n.id.clone())
            .collect()
    }

    /// Sum of base weights along consecutive `path` nodes, taking the
    /// cheapest parallel edge for each hop. `None` if a hop has no edge.
    pub fn base_cost(&self, path: &[NodeId]) -> Option<u64> {
        let mut total = 0u64;
        for hop in path.windows(2) {
            let from = self.index_of(&hop[0])?;
            let to = self.index_of(&hop[1])?;
            let w = self.adjacency[from]
                .iter()
                .filter(|&&(n, _)| n == to)
                .map(|&(_, w)| w)
                .min()?;
            total += w as u64;
        }
        Some(total)
    }
}
