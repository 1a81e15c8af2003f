// =============================================================================
// Seed world: the default campus topology every session starts from.
// Buildings, junctions and assembly points with walking-time edges.
// =============================================================================

use bevy::prelude::*;

use crate::graph::{Edge, EvacuationGraph, Node, NodeKind};

/// Nodes of the default campus, in display order.
pub fn seed_nodes() -> Vec<Node> {
    use NodeKind::*;
    vec![
        // Buildings
        Node::new("A1", Building).named("Admin Building").at(0.2, 0.2),
        Node::new("A2", Building).named("Science Hall").at(0.4, 0.25),
        Node::new("A3", Building).named("Library").at(0.3, 0.4),
        Node::new("A4", Building).named("Student Center").at(0.6, 0.3),
        Node::new("A5", Building).named("Engineering Building").at(0.7, 0.5),
        // Junctions
        Node::new("J1", Normal).named("Main Crossroad").at(0.4, 0.5),
        Node::new("J2", Normal).named("North Junction").at(0.2, 0.3),
        Node::new("J3", Normal).named("East Junction").at(0.6, 0.4),
        Node::new("J4", Normal).named("South Junction").at(0.5, 0.7),
        Node::new("J5", Normal).named("West Junction").at(0.3, 0.6),
        // Assembly points
        Node::new("S1", SafeZone).named("Emergency Assembly Point 1").at(0.1, 0.1),
        Node::new("S2", SafeZone).named("Emergency Assembly Point 2").at(0.8, 0.2),
        Node::new("S3", SafeZone).named("Emergency Assembly Point 3").at(0.9, 0.9),
        Node::new("S4", SafeZone).named("Emergency Assembly Point 4").at(0.1, 0.8),
    ]
}

/// Edges of the default campus. Weights are walking minutes.
pub fn seed_edges() -> Vec<Edge> {
    vec![
        // Building to junction
        Edge::new("A1", "J2", 3),
        Edge::new("A2", "J1", 4),
        Edge::new("A3", "J1", 2),
        Edge::new("A3", "J2", 3),
        Edge::new("A4", "J3", 2),
        Edge::new("A5", "J3", 3),
        Edge::new("A5", "J4", 4),
        // Junction to junction
        Edge::new("J1", "J2", 5),
        Edge::new("J1", "J3", 4),
        Edge::new("J1", "J4", 6),
        Edge::new("J1", "J5", 3),
        Edge::new("J2", "J5", 7),
        Edge::new("J3", "J4", 5),
        Edge::new("J4", "J5", 8),
        // Safe zone access
        Edge::new("S1", "J2", 5),
        Edge::new("S1", "A1", 4),
        Edge::new("S2", "J3", 7),
        Edge::new("S2", "A4", 5),
        Edge::new("S3", "J4", 10),
        Edge::new("S4", "J5", 6),
    ]
}

/// Build the default world. Deterministic: every call returns the same graph.
pub fn initialize_graph() -> EvacuationGraph {
    EvacuationGraph::build(seed_nodes(), seed_edges())
        .expect("seed edges only reference seed nodes")
}

/// Startup system: insert the seed graph unless the host already provided one.
pub fn init_world(mut commands: Commands, existing: Option<Res<EvacuationGraph>>) {
    if existing.is_some() {
        return;
    }
    let graph = initialize_graph();
    info!(
        "Seed graph loaded: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    commands.insert_resource(graph);
}
