//! Operator intents and the single entry point that applies them.
//!
//! Every mutation of session state outside a tick goes through
//! [`SessionParams::apply`], whether it comes from a [`Session`](super::Session)
//! method call or from the [`CommandQueue`](super::CommandQueue) drained by a
//! hosting `App`.

use bevy::ecs::system::{SystemParam, SystemState};
use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::SimulationClock;
use crate::error::EvacError;
use crate::graph::{EvacuationGraph, NodeId};
use crate::hazards::{DisasterKind, Hazard, HazardSet};
use crate::pathfinding_sys::RoutePlan;
use crate::propagation::TickReport;
use crate::route::{RouteQuery, RouteState};
use crate::sim_rng::SimRng;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCommand {
    Start,
    Pause,
    Reset,
    SetSpeed(u8),
    SelectNode(NodeId),
    SetQuery { start: NodeId, end: NodeId },
    ClearQuery,
    AddHazard { node: NodeId, kind: DisasterKind },
    /// Place a hazard on a random node; `None` uses the selected disaster kind.
    AddRandomHazard { kind: Option<DisasterKind> },
    SetDisasterKind(DisasterKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Started,
    Paused,
    Reset,
    /// Speed after clamping.
    SpeedSet(u8),
    Selected(RouteQuery),
    Routed(Option<RoutePlan>),
    QueryCleared,
    HazardAdded { hazard: Hazard, rerouted: bool },
    DisasterKindSet(DisasterKind),
}

/// Disaster kind the operator currently has selected for placement.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveDisasterKind(pub DisasterKind);

/// Every resource an operator command may touch.
#[derive(SystemParam)]
pub struct SessionParams<'w> {
    pub graph: Res<'w, EvacuationGraph>,
    pub hazards: ResMut<'w, HazardSet>,
    pub route: ResMut<'w, RouteState>,
    pub clock: ResMut<'w, SimulationClock>,
    pub rng: ResMut<'w, SimRng>,
    pub kind: ResMut<'w, ActiveDisasterKind>,
    pub report: ResMut<'w, TickReport>,
}

impl SessionParams<'_> {
    pub fn apply(&mut self, command: &SessionCommand) -> Result<CommandOutcome, EvacError> {
        match command {
            SessionCommand::Start => {
                self.start();
                Ok(CommandOutcome::Started)
            }
            SessionCommand::Pause => {
                self.pause();
                Ok(CommandOutcome::Paused)
            }
            SessionCommand::Reset => {
                self.reset();
                Ok(CommandOutcome::Reset)
            }
            SessionCommand::SetSpeed(speed) => Ok(CommandOutcome::SpeedSet(self.set_speed(*speed))),
            SessionCommand::SelectNode(node) => self.select_node(node).map(CommandOutcome::Selected),
            SessionCommand::SetQuery { start, end } => {
                self.set_query(start, end).map(CommandOutcome::Routed)
            }
            SessionCommand::ClearQuery => {
                self.route.clear();
                Ok(CommandOutcome::QueryCleared)
            }
            SessionCommand::AddHazard { node, kind } => self
                .add_hazard(node, *kind)
                .map(|(hazard, rerouted)| CommandOutcome::HazardAdded { hazard, rerouted }),
            SessionCommand::AddRandomHazard { kind } => self
                .add_random_hazard(*kind)
                .map(|(hazard, rerouted)| CommandOutcome::HazardAdded { hazard, rerouted }),
            SessionCommand::SetDisasterKind(kind) => {
                self.kind.0 = *kind;
                Ok(CommandOutcome::DisasterKindSet(*kind))
            }
        }
    }

    pub fn start(&mut self) {
        if !self.clock.running {
            info!("Simulation started at tick {}", self.clock.tick);
        }
        self.clock.running = true;
    }

    pub fn pause(&mut self) {
        if self.clock.running {
            info!("Simulation paused at tick {}", self.clock.tick);
        }
        self.clock.running = false;
    }

    /// Stop, zero the clock, clear hazards, query and path. Speed, disaster
    /// kind and the RNG stream carry over.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.hazards.clear();
        self.route.clear();
        *self.report = TickReport::default();
        info!("Simulation reset");
    }

    pub fn set_speed(&mut self, speed: u8) -> u8 {
        self.clock.set_speed(speed)
    }

    pub fn select_node(&mut self, node: &NodeId) -> Result<RouteQuery, EvacError> {
        self.route
            .select_node(&self.graph, &self.hazards, node)
            .cloned()
    }

    pub fn set_query(&mut self, start: &NodeId, end: &NodeId) -> Result<Option<RoutePlan>, EvacError> {
        self.route
            .set_query(&self.graph, &self.hazards, start, end)?;
        Ok(self.route.plan().cloned())
    }

    /// Place a hazard at the current tick and reroute if it sits on the
    /// shown path. Returns the hazard and whether the route changed.
    pub fn add_hazard(&mut self, node: &NodeId, kind: DisasterKind) -> Result<(Hazard, bool), EvacError> {
        let hazard = self
            .hazards
            .add(&self.graph, node, kind, self.clock.tick)?;
        info!(
            "{} placed at {} (tick {})",
            kind.name(),
            node,
            hazard.created_at
        );

        let rerouted = if self.route.path().contains(node) {
            self.route.recompute(&self.graph, &self.hazards)
        } else {
            false
        };
        Ok((hazard, rerouted))
    }

    /// Place a hazard on a node drawn from the session RNG. `None` uses the
    /// selected disaster kind.
    pub fn add_random_hazard(&mut self, kind: Option<DisasterKind>) -> Result<(Hazard, bool), EvacError> {
        let count = self.graph.node_count();
        if count == 0 {
            return Err(EvacError::EmptyGraph);
        }
        let idx = self.rng.0.gen_range(0..count);
        let node = self.graph.nodes()[idx].id.clone();
        self.add_hazard(&node, kind.unwrap_or(self.kind.0))
    }
}

/// Apply one command directly to a world holding the session resources.
///
/// Builds a fresh `SystemState` each call; [`Session`](super::Session) keeps a
/// cached one instead.
pub fn apply_command(world: &mut World, command: &SessionCommand) -> Result<CommandOutcome, EvacError> {
    let mut state = SystemState::<SessionParams<'static>>::new(world);
    let outcome = state.get_mut(world).apply(command);
    state.apply(world);
    outcome
}
