mod resources;
mod spread;
mod systems;

pub use resources::TickReport;
pub use spread::{path_invalidated, spread_chance, spread_hazards};
pub use systems::propagate_hazards;
