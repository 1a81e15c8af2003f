use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clock::SimulationClock;
use crate::config::{THREAT_CRITICAL_ABOVE, THREAT_WARNING_ABOVE};
use crate::graph::NodeId;
use crate::hazards::{Hazard, HazardSet};
use crate::pathfinding_sys::RoutePlan;
use crate::propagation::TickReport;
use crate::route::{RouteQuery, RouteState};

/// Coarse alert level derived from how many hazards are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ThreatLevel {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl ThreatLevel {
    pub fn from_hazard_count(count: usize) -> Self {
        if count > THREAT_CRITICAL_ABOVE {
            ThreatLevel::Critical
        } else if count > THREAT_WARNING_ABOVE {
            ThreatLevel::Warning
        } else {
            ThreatLevel::Normal
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ThreatLevel::Normal => "Normal",
            ThreatLevel::Warning => "Warning",
            ThreatLevel::Critical => "Critical",
        }
    }
}

/// Threat level as of the last `PostSim` pass of a hosting `App`.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentThreat(pub ThreatLevel);

/// Keeps [`CurrentThreat`] in step with the hazard set and logs level changes.
/// Not gated on the clock, so a reset between ticks lowers the level too.
pub fn track_threat_level(
    report: Res<TickReport>,
    hazards: Res<HazardSet>,
    mut threat: ResMut<CurrentThreat>,
) {
    let level = ThreatLevel::from_hazard_count(hazards.len());
    if level == threat.0 {
        return;
    }
    if level > threat.0 {
        warn!(
            "Threat level raised to {} at tick {} ({} hazards)",
            level.name(),
            report.tick,
            hazards.len()
        );
    } else {
        info!("Threat level lowered to {}", level.name());
    }
    threat.0 = level;
}

/// Everything a presentation layer polls after a tick or a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub running: bool,
    pub speed: u8,
    pub tick_interval_ms: u64,
    pub hazards: Vec<Hazard>,
    pub query: RouteQuery,
    pub path: Vec<NodeId>,
    /// Hazard-weighted cost of `path`; `None` without a route.
    pub cost: Option<u64>,
    pub walk_minutes: Option<u32>,
    pub threat: ThreatLevel,
}

impl SessionSnapshot {
    pub fn capture(clock: &SimulationClock, hazards: &HazardSet, route: &RouteState) -> Self {
        let plan = route.plan();
        Self {
            tick: clock.tick,
            running: clock.running,
            speed: clock.speed(),
            tick_interval_ms: clock.tick_interval().as_millis() as u64,
            hazards: hazards.snapshot(),
            query: route.query().clone(),
            path: route.path().to_vec(),
            cost: plan.map(|p| p.cost),
            walk_minutes: plan.map(RoutePlan::estimated_walk_minutes),
            threat: ThreatLevel::from_hazard_count(hazards.len()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
