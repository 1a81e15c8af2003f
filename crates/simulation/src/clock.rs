use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{BASE_TICK_INTERVAL, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};

/// Simulation time: a tick counter plus the Running/Paused state and the
/// operator-selected speed.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationClock {
    pub tick: u64,
    pub running: bool,
    speed: u8,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            tick: 0,
            running: false,
            speed: DEFAULT_SPEED,
        }
    }
}

impl SimulationClock {
    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Set the speed, clamped to `MIN_SPEED..=MAX_SPEED`. Returns the applied value.
    pub fn set_speed(&mut self, speed: u8) -> u8 {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.speed
    }

    /// Advance by one tick. Frozen while paused.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.tick += 1;
    }

    /// Stop and rewind to tick 0. Speed is an operator preference and survives.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.running = false;
    }

    /// Real-time interval between ticks at the current speed.
    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.speed)
    }
}

/// Real-time interval between ticks for a speed in `MIN_SPEED..=MAX_SPEED`.
/// Higher speed, shorter interval.
pub fn tick_interval(speed: u8) -> Duration {
    BASE_TICK_INTERVAL / u32::from(speed.clamp(MIN_SPEED, MAX_SPEED))
}

/// Run condition: only tick while the clock is running.
pub fn simulation_running(clock: Res<SimulationClock>) -> bool {
    clock.running
}

pub fn advance_clock(mut clock: ResMut<SimulationClock>) {
    clock.tick();
}

/// Scales the FixedUpdate timestep to the clock speed, so a hosting `App`
/// ticks at the same cadence the speed implies.
pub fn sync_fixed_timestep(clock: Res<SimulationClock>, mut time: ResMut<Time<Fixed>>) {
    if !clock.is_changed() {
        return;
    }
    time.set_timestep(clock.tick_interval());
}
