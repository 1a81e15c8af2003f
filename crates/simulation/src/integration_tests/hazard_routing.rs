use crate::graph::{EvacuationGraph, NodeId};
use crate::hazards::{DisasterKind, HazardSet};
use crate::pathfinding_sys::{effective_weight, nearest_safe_zone, plan_route};
use crate::test_harness::{all_simple_paths, grid_graph};
use crate::world_init::initialize_graph;

/// Hazard-weighted cost of walking `path`, taking the cheapest parallel edge
/// at each step.
fn weighted_cost(graph: &EvacuationGraph, hazards: &HazardSet, path: &[NodeId]) -> u64 {
    path.windows(2)
        .map(|pair| {
            let touches = hazards.contains(&pair[0]) || hazards.contains(&pair[1]);
            graph
                .neighbors(&pair[0])
                .into_iter()
                .filter(|(n, _)| *n == &pair[1])
                .map(|(_, w)| effective_weight(w, touches))
                .min()
                .expect("consecutive path nodes are adjacent")
        })
        .sum()
}

fn hazards_at(graph: &EvacuationGraph, nodes: &[&NodeId]) -> HazardSet {
    let mut set = HazardSet::default();
    for node in nodes {
        set.add(graph, node, DisasterKind::Fire, 0)
            .expect("fixture hazard");
    }
    set
}

/// Every hazard placement of size 0..=2 over the graph's nodes.
fn placements(graph: &EvacuationGraph) -> Vec<Vec<&NodeId>> {
    let ids: Vec<&NodeId> = graph.nodes().iter().map(|n| &n.id).collect();
    let mut out = vec![Vec::new()];
    for (i, a) in ids.iter().enumerate() {
        out.push(vec![*a]);
        for b in &ids[i + 1..] {
            out.push(vec![*a, *b]);
        }
    }
    out
}

#[test]
fn weighted_route_matches_brute_force_on_grid() {
    let graph = grid_graph(3, 3);
    let from = NodeId::from("G0_0");
    let to = NodeId::from("G2_2");
    let candidates = all_simple_paths(&graph, &from, &to);
    assert!(!candidates.is_empty());

    for placed in placements(&graph) {
        let hazards = hazards_at(&graph, &placed);
        let best = candidates
            .iter()
            .map(|p| weighted_cost(&graph, &hazards, p))
            .min()
            .expect("grid is connected");
        let plan = plan_route(&graph, &hazards, &from, &to).expect("grid is connected");
        assert_eq!(plan.cost, best, "hazards at {placed:?}");
        assert_eq!(weighted_cost(&graph, &hazards, &plan.path), plan.cost);
    }
}

#[test]
fn hazard_free_route_preferred_when_one_exists() {
    let graph = initialize_graph();
    for placed in placements(&graph) {
        let hazards = hazards_at(&graph, &placed);
        for start in graph.nodes() {
            for end in graph.nodes() {
                if hazards.contains(&start.id) || hazards.contains(&end.id) {
                    continue;
                }
                let clean_exists = all_simple_paths(&graph, &start.id, &end.id)
                    .iter()
                    .any(|p| !hazards.contains_any(p));
                let Some(plan) = plan_route(&graph, &hazards, &start.id, &end.id) else {
                    continue;
                };
                // Seed weights are small, so any clean detour is under 100x.
                if clean_exists {
                    assert!(
                        !hazards.contains_any(&plan.path),
                        "{} -> {} crosses {placed:?}",
                        start.id,
                        end.id
                    );
                }
            }
        }
    }
}

#[test]
fn route_exists_even_when_every_route_is_hazardous() {
    let graph = initialize_graph();
    // J2 is the only link between S1 and the rest of the campus.
    let hazards = hazards_at(&graph, &[&NodeId::from("J2")]);
    let plan = plan_route(&graph, &hazards, &NodeId::from("A3"), &NodeId::from("S1"))
        .expect("hazards never make a route impassable");
    assert!(plan.path.contains(&NodeId::from("J2")));
    assert!(plan.cost >= 100);
}

#[test]
fn nearest_safe_zone_is_cheapest_zone_route() {
    let graph = initialize_graph();
    for placed in placements(&graph).into_iter().step_by(7) {
        let hazards = hazards_at(&graph, &placed);
        for start in graph.nodes() {
            let best = graph
                .safe_zones()
                .iter()
                .filter_map(|zone| plan_route(&graph, &hazards, &start.id, zone))
                .map(|p| p.cost)
                .min();
            let nearest = nearest_safe_zone(&graph, &hazards, &start.id);
            assert_eq!(nearest.map(|p| p.cost), best, "from {}", start.id);
        }
    }
}
