//! # Session: the single owner of all mutable evacuation state
//!
//! A [`Session`] holds its own bevy `World` with every session resource and a
//! single-threaded `Schedule` running [`tick_systems`](crate::tick_systems).
//! Operator commands and ticks are both `&mut self` calls, so they can never
//! interleave; wrap the session in a [`SharedSession`] to drive it from more
//! than one thread.

use std::time::Duration;

use bevy::ecs::schedule::ExecutorKind;
use bevy::ecs::system::SystemState;
use bevy::prelude::*;

use crate::clock::SimulationClock;
use crate::error::EvacError;
use crate::graph::{EvacuationGraph, NodeId};
use crate::hazards::{DisasterKind, Hazard, HazardSet};
use crate::pathfinding_sys::{self, RoutePlan};
use crate::propagation::TickReport;
use crate::route::{RouteQuery, RouteState};
use crate::sim_rng::SimRng;
use crate::world_init::initialize_graph;

mod commands;
mod queue;
mod shared;
mod snapshot;

pub use commands::{apply_command, ActiveDisasterKind, CommandOutcome, SessionCommand, SessionParams};
pub use queue::{execute_queued_commands, CommandLog, CommandQueue};
pub use shared::SharedSession;
pub use snapshot::{track_threat_level, CurrentThreat, SessionSnapshot, ThreatLevel};

/// Insert every resource a session needs, keeping any already present.
pub(crate) fn init_session_resources(world: &mut World) {
    world.init_resource::<HazardSet>();
    world.init_resource::<RouteState>();
    world.init_resource::<SimulationClock>();
    world.init_resource::<SimRng>();
    world.init_resource::<ActiveDisasterKind>();
    world.init_resource::<TickReport>();
}

pub struct Session {
    world: World,
    tick_schedule: Schedule,
    command_state: SystemState<SessionParams<'static>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// A paused session over the seed topology.
    pub fn new() -> Self {
        Self::with_graph(initialize_graph())
    }

    pub fn with_graph(graph: EvacuationGraph) -> Self {
        let mut world = World::new();
        world.insert_resource(graph);
        init_session_resources(&mut world);

        let mut tick_schedule = Schedule::default();
        tick_schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        tick_schedule.add_systems(crate::tick_systems());

        let command_state = SystemState::new(&mut world);
        Self {
            world,
            tick_schedule,
            command_state,
        }
    }

    /// Builder: replace the spread RNG with one seeded from `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    /// Rewind the spread RNG to a fresh stream. `reset` leaves the stream alone.
    pub fn reseed(&mut self, seed: u64) {
        self.world.insert_resource(SimRng::from_seed_u64(seed));
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Apply one command. Every mutation outside `advance` goes through here.
    pub fn execute(&mut self, command: &SessionCommand) -> Result<CommandOutcome, EvacError> {
        self.with_params(|params| params.apply(command))
    }

    fn with_params<T>(&mut self, f: impl FnOnce(&mut SessionParams) -> T) -> T {
        let out = {
            let mut params = self.command_state.get_mut(&mut self.world);
            f(&mut params)
        };
        self.command_state.apply(&mut self.world);
        out
    }

    pub fn start(&mut self) {
        self.with_params(|p| p.start());
    }

    /// Takes effect immediately: no tick runs after this returns until
    /// `start` is called again.
    pub fn pause(&mut self) {
        self.with_params(|p| p.pause());
    }

    pub fn reset(&mut self) {
        self.with_params(|p| p.reset());
    }

    /// Returns the applied speed after clamping to `1..=10`.
    pub fn set_speed(&mut self, speed: u8) -> u8 {
        self.with_params(|p| p.set_speed(speed))
    }

    /// Feed one node-selection event into the start/end state machine.
    pub fn select_node(&mut self, node: impl Into<NodeId>) -> Result<RouteQuery, EvacError> {
        let node = node.into();
        self.with_params(|p| p.select_node(&node))
    }

    pub fn set_query(
        &mut self,
        start: impl Into<NodeId>,
        end: impl Into<NodeId>,
    ) -> Result<Option<RoutePlan>, EvacError> {
        let (start, end) = (start.into(), end.into());
        self.with_params(|p| p.set_query(&start, &end))
    }

    pub fn clear_query(&mut self) {
        self.with_params(|p| p.route.clear());
    }

    /// Place a hazard at the current tick, rerouting if it lands on the
    /// shown path.
    pub fn add_hazard(&mut self, node: impl Into<NodeId>, kind: DisasterKind) -> Result<Hazard, EvacError> {
        let node = node.into();
        self.with_params(|p| p.add_hazard(&node, kind))
            .map(|(hazard, _)| hazard)
    }

    pub fn add_random_hazard(&mut self, kind: Option<DisasterKind>) -> Result<Hazard, EvacError> {
        self.with_params(|p| p.add_random_hazard(kind))
            .map(|(hazard, _)| hazard)
    }

    pub fn set_disaster_kind(&mut self, kind: DisasterKind) {
        self.with_params(|p| p.kind.0 = kind);
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run exactly one tick. Returns `None` (and changes nothing) while paused.
    pub fn advance(&mut self) -> Option<TickReport> {
        if !self.is_running() {
            return None;
        }
        self.tick_schedule.run(&mut self.world);
        Some(self.world.resource::<TickReport>().clone())
    }

    /// Run up to `n` ticks, stopping early if the session is paused.
    pub fn advance_by(&mut self, n: u32) -> Vec<TickReport> {
        (0..n).map_while(|_| self.advance()).collect()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn graph(&self) -> &EvacuationGraph {
        self.world.resource::<EvacuationGraph>()
    }

    pub fn hazards(&self) -> &HazardSet {
        self.world.resource::<HazardSet>()
    }

    pub fn current_hazards(&self) -> Vec<Hazard> {
        self.hazards().snapshot()
    }

    pub fn current_path(&self) -> &[NodeId] {
        self.route_state().path()
    }

    pub fn current_route(&self) -> Option<&RoutePlan> {
        self.route_state().plan()
    }

    pub fn route_query(&self) -> &RouteQuery {
        self.route_state().query()
    }

    fn route_state(&self) -> &RouteState {
        self.world.resource::<RouteState>()
    }

    fn clock(&self) -> &SimulationClock {
        self.world.resource::<SimulationClock>()
    }

    pub fn current_clock_tick(&self) -> u64 {
        self.clock().tick
    }

    pub fn is_running(&self) -> bool {
        self.clock().running
    }

    pub fn speed(&self) -> u8 {
        self.clock().speed()
    }

    /// How long a host should wait between `advance` calls at the current speed.
    pub fn tick_interval(&self) -> Duration {
        self.clock().tick_interval()
    }

    pub fn disaster_kind(&self) -> DisasterKind {
        self.world.resource::<ActiveDisasterKind>().0
    }

    pub fn last_report(&self) -> &TickReport {
        self.world.resource::<TickReport>()
    }

    pub fn safe_zones(&self) -> Vec<NodeId> {
        self.graph().safe_zones()
    }

    /// Cheapest hazard-weighted route from `start` to any safe zone.
    pub fn nearest_safe_zone(&self, start: &NodeId) -> Option<RoutePlan> {
        pathfinding_sys::nearest_safe_zone(self.graph(), self.hazards(), start)
    }

    pub fn threat_level(&self) -> ThreatLevel {
        ThreatLevel::from_hazard_count(self.hazards().len())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self.clock(), self.hazards(), self.route_state())
    }

    /// Direct world access for tests and embedding hosts.
    pub fn world(&self) -> &World {
        &self.world
    }
}
