use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// Outcome of the most recent tick, written by `propagate_hazards` and
/// `refresh_route`.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Clock value after the tick.
    pub tick: u64,
    /// Nodes that became hazardous during the tick, in spread order.
    pub spread: Vec<NodeId>,
    /// The shown route touches a hazardous node.
    pub path_invalidated: bool,
    /// The route was recomputed and differs from the one shown before.
    pub route_changed: bool,
}
