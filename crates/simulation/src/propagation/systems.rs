use bevy::prelude::*;

use crate::clock::SimulationClock;
use crate::graph::{EvacuationGraph, NodeId};
use crate::hazards::HazardSet;
use crate::route::RouteState;
use crate::sim_rng::SimRng;

use super::resources::TickReport;
use super::spread::{path_invalidated, spread_hazards};

/// Spreads hazards for the tick the clock just entered and flags the shown
/// route when it now touches a hazard.
pub fn propagate_hazards(
    graph: Res<EvacuationGraph>,
    clock: Res<SimulationClock>,
    mut hazards: ResMut<HazardSet>,
    mut rng: ResMut<SimRng>,
    route: Res<RouteState>,
    mut report: ResMut<TickReport>,
) {
    let spread = spread_hazards(&graph, &mut hazards, clock.speed(), clock.tick, &mut rng.0);

    if !spread.is_empty() {
        debug!(
            "Tick {}: hazards spread to {:?} ({} active)",
            clock.tick,
            spread.iter().map(NodeId::as_str).collect::<Vec<_>>(),
            hazards.len()
        );
    }

    *report = TickReport {
        tick: clock.tick,
        path_invalidated: path_invalidated(route.path(), &hazards),
        spread,
        route_changed: false,
    };
}
