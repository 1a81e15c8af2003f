use rand::Rng;

use crate::config::{SPREAD_BASE_CHANCE, SPREAD_INTENSITY_DECAY};
use crate::graph::{EvacuationGraph, NodeId};
use crate::hazards::{DisasterKind, HazardSet};

/// Probability that a hazard of `intensity` jumps along one edge in one tick
/// at simulation `speed`.
#[inline]
pub fn spread_chance(intensity: f64, speed: u8) -> f64 {
    (intensity * (f64::from(speed) / 10.0) * SPREAD_BASE_CHANCE).clamp(0.0, 1.0)
}

/// One tick of probabilistic spread. Returns the newly affected nodes.
///
/// Only hazards that existed when the tick began act as sources; hazards
/// created during this call do not spread again until the next tick. Each
/// incident edge of a source is one independent Bernoulli trial, drawn only
/// when the neighbor is still unaffected, so the number of draws (and thus
/// the RNG stream) depends only on the inputs.
pub fn spread_hazards<R: Rng + ?Sized>(
    graph: &EvacuationGraph,
    hazards: &mut HazardSet,
    speed: u8,
    tick: u64,
    rng: &mut R,
) -> Vec<NodeId> {
    let sources: Vec<(NodeId, DisasterKind, f64)> = hazards
        .iter()
        .map(|h| (h.node.clone(), h.kind, h.intensity))
        .collect();

    let mut spread = Vec::new();
    for (origin, kind, intensity) in &sources {
        let chance = spread_chance(*intensity, speed);
        for (neighbor, _) in graph.neighbors(origin) {
            if hazards.contains(neighbor) {
                continue;
            }
            if rng.gen_bool(chance) {
                let child = intensity * SPREAD_INTENSITY_DECAY;
                if hazards.spread_to(neighbor, *kind, child, tick).is_some() {
                    spread.push(neighbor.clone());
                }
            }
        }
    }
    spread
}

/// True if `path` touches any hazardous node.
pub fn path_invalidated(path: &[NodeId], hazards: &HazardSet) -> bool {
    !path.is_empty() && hazards.contains_any(path)
}
