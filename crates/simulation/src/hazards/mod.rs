mod resources;

pub use resources::{DisasterKind, Hazard, HazardId, HazardSet};
