//! # TestSession: fixtures and a fluent builder for evacuation tests
//!
//! Small graphs with known optimal routes, a brute-force path oracle, and a
//! wrapper around [`Session`] with builder methods for setting up scenarios.

use crate::graph::{Edge, EvacuationGraph, Node, NodeId, NodeKind};
use crate::hazards::DisasterKind;
use crate::pathfinding_sys::RoutePlan;
use crate::propagation::TickReport;
use crate::session::Session;

// ---------------------------------------------------------------------------
// Fixture graphs
// ---------------------------------------------------------------------------

/// `A-B (1)`, `B-C (1)`, `A-C (5)`. A is a building, C a safe zone.
pub fn triangle_graph() -> EvacuationGraph {
    EvacuationGraph::build(
        vec![
            Node::new("A", NodeKind::Building),
            Node::new("B", NodeKind::Normal),
            Node::new("C", NodeKind::SafeZone),
        ],
        vec![
            Edge::new("A", "B", 1),
            Edge::new("B", "C", 1),
            Edge::new("A", "C", 5),
        ],
    )
    .expect("triangle fixture is valid")
}

/// `N0-N1-..-N{n-1}`, every edge weight 1. The last node is a safe zone.
pub fn line_graph(n: usize) -> EvacuationGraph {
    let nodes = (0..n)
        .map(|i| {
            let kind = if i + 1 == n {
                NodeKind::SafeZone
            } else {
                NodeKind::Normal
            };
            Node::new(format!("N{i}"), kind)
        })
        .collect();
    let edges = (1..n)
        .map(|i| Edge::new(format!("N{}", i - 1), format!("N{i}"), 1))
        .collect();
    EvacuationGraph::build(nodes, edges).expect("line fixture is valid")
}

/// `w × h` lattice of nodes `G{x}_{y}` with 4-neighbor edges. Weights vary
/// with position so most pairs have a unique optimum. Corners are safe zones.
pub fn grid_graph(w: usize, h: usize) -> EvacuationGraph {
    let name = |x: usize, y: usize| format!("G{x}_{y}");
    let mut nodes = Vec::with_capacity(w * h);
    let mut edges = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let corner = (x == 0 || x + 1 == w) && (y == 0 || y + 1 == h);
            let kind = if corner {
                NodeKind::SafeZone
            } else {
                NodeKind::Normal
            };
            nodes.push(
                Node::new(name(x, y), kind).at(x as f32 / w as f32, y as f32 / h as f32),
            );
            if x + 1 < w {
                edges.push(Edge::new(name(x, y), name(x + 1, y), 1 + ((x + 2 * y) % 4) as u32));
            }
            if y + 1 < h {
                edges.push(Edge::new(name(x, y), name(x, y + 1), 1 + ((3 * x + y) % 5) as u32));
            }
        }
    }
    EvacuationGraph::build(nodes, edges).expect("grid fixture is valid")
}

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

/// Every simple path from `from` to `to`. Exponential; small graphs only.
pub fn all_simple_paths(graph: &EvacuationGraph, from: &NodeId, to: &NodeId) -> Vec<Vec<NodeId>> {
    fn walk(
        graph: &EvacuationGraph,
        to: &NodeId,
        path: &mut Vec<NodeId>,
        out: &mut Vec<Vec<NodeId>>,
    ) {
        let Some(current) = path.last().cloned() else {
            return;
        };
        if &current == to {
            out.push(path.clone());
            return;
        }
        let mut next: Vec<NodeId> = graph
            .neighbors(&current)
            .into_iter()
            .map(|(n, _)| n.clone())
            .collect();
        next.sort();
        next.dedup();
        for n in next {
            if path.contains(&n) {
                continue;
            }
            path.push(n);
            walk(graph, to, path, out);
            path.pop();
        }
    }

    let mut out = Vec::new();
    if graph.contains(from) && graph.contains(to) {
        walk(graph, to, &mut vec![from.clone()], &mut out);
    }
    out
}

// ---------------------------------------------------------------------------
// TestSession
// ---------------------------------------------------------------------------

/// A [`Session`] with builder methods for test setup.
pub struct TestSession {
    session: Session,
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSession {
    /// Seed topology, default RNG seed, paused.
    pub fn new() -> Self {
        Self {
            session: Session::new(),
        }
    }

    pub fn with_graph(graph: EvacuationGraph) -> Self {
        Self {
            session: Session::with_graph(graph),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.session.reseed(seed);
        self
    }

    pub fn with_speed(mut self, speed: u8) -> Self {
        self.session.set_speed(speed);
        self
    }

    pub fn with_hazard(mut self, node: &str, kind: DisasterKind) -> Self {
        self.session
            .add_hazard(node, kind)
            .expect("test hazard placement");
        self
    }

    pub fn with_query(mut self, start: &str, end: &str) -> Self {
        self.session.set_query(start, end).expect("test query");
        self
    }

    pub fn running(mut self) -> Self {
        self.session.start();
        self
    }

    /// Run up to `n` ticks; fewer if the session is paused.
    pub fn tick(&mut self, n: u32) -> Vec<TickReport> {
        self.session.advance_by(n)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn path(&self) -> Vec<&str> {
        self.session
            .current_path()
            .iter()
            .map(NodeId::as_str)
            .collect()
    }

    pub fn route(&self) -> Option<&RoutePlan> {
        self.session.current_route()
    }

    pub fn hazard_count(&self) -> usize {
        self.session.hazards().len()
    }

    pub fn tick_count(&self) -> u64 {
        self.session.current_clock_tick()
    }
}
