//! Hazard-aware routing over the evacuation graph.
//!
//! Edges touching a hazardous node cost `HAZARD_WEIGHT_MULTIPLIER` times their
//! base weight: strongly disfavored but never impassable, so a route still
//! exists when every route crosses a hazard.

use pathfinding::prelude::dijkstra;
use serde::{Deserialize, Serialize};

use crate::config::{HAZARD_WEIGHT_MULTIPLIER, WALK_MINUTES_PER_NODE};
use crate::graph::{EvacuationGraph, NodeId, NodeKind};
use crate::hazards::HazardSet;

/// A computed route and its hazard-weighted cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Node ids from start to end, inclusive.
    pub path: Vec<NodeId>,
    pub cost: u64,
}

impl RoutePlan {
    /// Walking-time estimate shown to evacuees.
    pub fn estimated_walk_minutes(&self) -> u32 {
        self.path.len() as u32 * WALK_MINUTES_PER_NODE
    }

    pub fn destination(&self) -> Option<&NodeId> {
        self.path.last()
    }
}

/// Effective cost of an edge with base weight `weight` between two nodes,
/// given whether either endpoint is hazardous.
#[inline]
pub fn effective_weight(weight: u32, touches_hazard: bool) -> u64 {
    if touches_hazard {
        weight as u64 * HAZARD_WEIGHT_MULTIPLIER
    } else {
        weight as u64
    }
}

/// Per-node hazard flags in graph order.
fn hazard_mask(graph: &EvacuationGraph, hazards: &HazardSet) -> Vec<bool> {
    graph.nodes().iter().map(|n| hazards.contains(&n.id)).collect()
}

/// Lowest-cost path from `start` to `end`, or an empty vec when either id is
/// unknown or `end` is unreachable.
pub fn find_path(
    graph: &EvacuationGraph,
    hazards: &HazardSet,
    start: &NodeId,
    end: &NodeId,
) -> Vec<NodeId> {
    plan_route(graph, hazards, start, end)
        .map(|plan| plan.path)
        .unwrap_or_default()
}

/// Dijkstra with a linear minimum scan, O(V^2).
///
/// Ties go to the node stored first, and a neighbor's predecessor only
/// changes on a strictly shorter distance, so results are stable for a fixed
/// graph and hazard set.
pub fn plan_route(
    graph: &EvacuationGraph,
    hazards: &HazardSet,
    start: &NodeId,
    end: &NodeId,
) -> Option<RoutePlan> {
    let start_idx = graph.index_of(start)?;
    let end_idx = graph.index_of(end)?;

    let n = graph.node_count();
    let hazardous = hazard_mask(graph, hazards);
    let mut dist: Vec<Option<u64>> = vec![None; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    dist[start_idx] = Some(0);

    loop {
        let mut current: Option<(usize, u64)> = None;
        for (i, d) in dist.iter().enumerate() {
            if visited[i] {
                continue;
            }
            if let Some(d) = *d {
                if current.is_none_or(|(_, best)| d < best) {
                    current = Some((i, d));
                }
            }
        }

        // Remaining nodes are unreachable from start.
        let Some((cur, cur_dist)) = current else {
            break;
        };
        if cur == end_idx {
            break;
        }
        visited[cur] = true;

        for &(next, weight) in graph.neighbor_indices(cur) {
            if visited[next] {
                continue;
            }
            let w = effective_weight(weight, hazardous[cur] || hazardous[next]);
            let candidate = cur_dist + w;
            if dist[next].is_none_or(|d| candidate < d) {
                dist[next] = Some(candidate);
                prev[next] = Some(cur);
            }
        }
    }

    let cost = dist[end_idx]?;
    let mut path = vec![graph.node_at(end_idx).id.clone()];
    let mut at = end_idx;
    while at != start_idx {
        at = prev[at]?;
        path.push(graph.node_at(at).id.clone());
    }
    path.reverse();
    Some(RoutePlan { path, cost })
}

/// Cheapest hazard-weighted route from `start` to any safe zone.
pub fn nearest_safe_zone(
    graph: &EvacuationGraph,
    hazards: &HazardSet,
    start: &NodeId,
) -> Option<RoutePlan> {
    let start_idx = graph.index_of(start)?;
    let mask = hazard_mask(graph, hazards);
    let hazardous = &mask;

    let (indices, cost) = dijkstra(
        &start_idx,
        move |&cur| {
            graph.neighbor_indices(cur).iter().map(move |&(next, w)| {
                (next, effective_weight(w, hazardous[cur] || hazardous[next]))
            })
        },
        |&idx| graph.node_at(idx).kind == NodeKind::SafeZone,
    )?;

    Some(RoutePlan {
        path: indices
            .into_iter()
            .map(|i| graph.node_at(i).id.clone())
            .collect(),
        cost,
    })
}
