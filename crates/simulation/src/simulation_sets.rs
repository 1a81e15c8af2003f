//! Ordering for the evacuation systems inside a hosting `App`.
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – drain queued operator commands so they land before the tick.
//! * **Simulation** – the tick chain: clock, hazard spread, route refresh.
//! * **PostSim** – read-only consumers of the finished tick (threat level).

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain by `EvacuationPlugin`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    PreSim,
    Simulation,
    PostSim,
}
