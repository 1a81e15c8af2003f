use bevy::ecs::schedule::SystemConfigs;
use bevy::prelude::*;

pub mod clock;
pub mod config;
pub mod error;
pub mod graph;
pub mod hazards;
pub mod pathfinding_sys;
pub mod propagation;
pub mod route;
pub mod session;
pub mod sim_rng;
pub mod simulation_sets;
pub mod world_init;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use clock::SimulationClock;
pub use error::{EvacError, TopologyError};
pub use graph::{Edge, EvacuationGraph, Node, NodeId, NodeKind};
pub use hazards::{DisasterKind, Hazard, HazardId, HazardSet};
pub use pathfinding_sys::{find_path, nearest_safe_zone, plan_route, RoutePlan};
pub use propagation::TickReport;
pub use route::{RouteQuery, RouteState};
pub use session::{
    ActiveDisasterKind, CommandLog, CommandOutcome, CommandQueue, CurrentThreat, Session,
    SessionCommand, SessionSnapshot, SharedSession, ThreatLevel,
};
pub use sim_rng::SimRng;
pub use simulation_sets::SimulationSet;

/// One tick, in order: advance the clock, spread hazards, refresh the route.
///
/// Shared by [`Session`]'s own schedule and [`EvacuationPlugin`].
pub fn tick_systems() -> SystemConfigs {
    (
        clock::advance_clock,
        propagation::propagate_hazards,
        route::refresh_route,
    )
        .chain()
}

/// Runs the evacuation session inside a hosting `App`: ticks on
/// `FixedUpdate` at the speed-derived cadence while the clock is running,
/// and applies `CommandQueue` entries just before each tick.
pub struct EvacuationPlugin;

impl Plugin for EvacuationPlugin {
    fn build(&self, app: &mut App) {
        session::init_session_resources(app.world_mut());
        app.init_resource::<CommandQueue>()
            .init_resource::<CommandLog>()
            .init_resource::<CurrentThreat>()
            .add_systems(Startup, world_init::init_world)
            .add_systems(Update, clock::sync_fixed_timestep);

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::PreSim,
                SimulationSet::Simulation,
                SimulationSet::PostSim,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                session::execute_queued_commands.in_set(SimulationSet::PreSim),
                tick_systems()
                    .run_if(clock::simulation_running)
                    .in_set(SimulationSet::Simulation),
                session::track_threat_level.in_set(SimulationSet::PostSim),
            ),
        );
    }
}
